use async_trait::async_trait;
use lace_protocol::ToolOutput;
use serde_json::Value;

use super::*;
use crate::context::ToolContext;
use crate::error::ToolError;
use crate::tool::ToolAnnotations;

struct TestTool {
    name: String,
}

#[async_trait]
impl Tool for TestTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "a test tool"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::readonly()
    }

    async fn execute(
        &self,
        _input: Value,
        _ctx: &mut ToolContext,
    ) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text("ok"))
    }
}

#[test]
fn test_register_and_get() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool {
        name: "test".to_string(),
    });

    assert!(registry.has("test"));
    assert!(registry.get("test").is_some());
    assert!(registry.get("nonexistent").is_none());
}

#[test]
fn test_tool_names_sorted() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool {
        name: "beta".to_string(),
    });
    registry.register(TestTool {
        name: "alpha".to_string(),
    });

    assert_eq!(registry.tool_names(), vec!["alpha", "beta"]);
}

#[test]
fn test_to_specs_reflects_registered_tools() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool {
        name: "test".to_string(),
    });

    let specs = registry.to_specs();
    assert_eq!(specs.len(), 1);
    assert_eq!(specs[0].name, "test");
}

#[test]
fn test_re_register_replaces() {
    let mut registry = ToolRegistry::new();
    registry.register(TestTool {
        name: "test".to_string(),
    });
    registry.register(TestTool {
        name: "test".to_string(),
    });
    assert_eq!(registry.tool_names().len(), 1);
}
