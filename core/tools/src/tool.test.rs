use lace_protocol::ToolOutput;

use super::*;

struct DummyTool;

#[async_trait]
impl Tool for DummyTool {
    fn name(&self) -> &str {
        "dummy"
    }

    fn description(&self) -> &str {
        "a dummy tool for testing"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {"message": {"type": "string"}},
            "required": ["message"],
        })
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::readonly()
    }

    async fn execute(
        &self,
        input: Value,
        _ctx: &mut ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        let message = input["message"].as_str().unwrap_or_default();
        Ok(ToolOutput::text(format!("received: {message}")))
    }
}

fn ctx() -> ToolContext {
    ToolContext::new("call-1", "session-1")
}

#[tokio::test]
async fn test_validate_passes_with_required_field() {
    let tool = DummyTool;
    let input = serde_json::json!({"message": "hi"});
    assert!(tool.validate(&input).await.is_valid());
}

#[tokio::test]
async fn test_validate_fails_without_required_field() {
    let tool = DummyTool;
    let input = serde_json::json!({});
    let result = tool.validate(&input).await;
    assert!(!result.is_valid());
}

#[tokio::test]
async fn test_execute_and_default_post_process() {
    let tool = DummyTool;
    let mut context = ctx();
    let input = serde_json::json!({"message": "hi"});
    let output = tool.execute(input, &mut context).await.unwrap();
    let output = tool.post_process(output, &context).await;
    assert!(!output.is_error);
}

#[test]
fn test_readonly_annotations_not_destructive() {
    let annotations = ToolAnnotations::readonly();
    assert!(!annotations.destructive);
    assert!(annotations.readonly);
}

#[test]
fn test_destructive_annotations_default() {
    let tool = DummyToolDefaultAnnotations;
    assert!(tool.annotations().destructive);
}

struct DummyToolDefaultAnnotations;

#[async_trait]
impl Tool for DummyToolDefaultAnnotations {
    fn name(&self) -> &str {
        "default"
    }

    fn description(&self) -> &str {
        "uses default annotations"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({})
    }

    async fn execute(
        &self,
        _input: Value,
        _ctx: &mut ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(""))
    }
}
