//! The [`Tool`] trait: a capability exposed to the model, executed
//! through a fixed five-stage pipeline (validate, check permission,
//! execute, post-process, cleanup).

use async_trait::async_trait;
use lace_protocol::ToolOutput;
use lace_protocol::ValidationError;
use lace_protocol::ValidationResult;
use serde_json::Value;

use crate::context::ToolContext;
use crate::error::ToolError;

/// Design-level hints the executor and risk classifier use to decide
/// whether a call needs approval. Not a security boundary: the tool body
/// itself must be safe regardless of how it declares these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolAnnotations {
    /// The call can cause irreversible or destructive side effects.
    pub destructive: bool,
    /// The call has no side effects at all.
    pub readonly: bool,
    /// Calling twice with the same input has the same effect as once.
    pub idempotent: bool,
}

impl ToolAnnotations {
    /// Annotations for a read-only, side-effect-free tool.
    pub fn readonly() -> Self {
        Self {
            destructive: false,
            readonly: true,
            idempotent: true,
        }
    }

    /// Annotations for a tool that mutates state destructively.
    pub fn destructive() -> Self {
        Self {
            destructive: true,
            readonly: false,
            idempotent: false,
        }
    }
}

/// A capability exposed to the model: `(name, description, inputSchema,
/// annotations, execute)`.
///
/// Tools run through a fixed pipeline driven by [`crate::ToolExecutor`]:
/// 1. **validate** — check input against the schema
/// 2. (approval arbitration happens in the executor, not here)
/// 3. **execute** — perform the work
/// 4. **post_process** — transform output
/// 5. **cleanup** — release resources, always called
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model calls this tool by.
    fn name(&self) -> &str;

    /// Description shown to the model alongside the schema.
    fn description(&self) -> &str;

    /// JSON Schema the call's `arguments` are validated against.
    fn input_schema(&self) -> Value;

    /// Design-level risk/safety hints. Default is the most cautious
    /// (destructive, not readonly, not idempotent); read-only tools
    /// should override this.
    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::destructive()
    }

    /// Validate `input` before execution. Default implementation checks
    /// only that the schema's `required` fields are present; tools with
    /// richer constraints should override.
    async fn validate(&self, input: &Value) -> ValidationResult {
        let schema = self.input_schema();
        if let Some(required) = schema.get("required").and_then(|r| r.as_array()) {
            for field in required {
                if let Some(field_name) = field.as_str() {
                    if input.get(field_name).is_none() {
                        return ValidationResult::Invalid {
                            errors: vec![ValidationError::with_path(
                                format!("missing required field: {field_name}"),
                                field_name,
                            )],
                        };
                    }
                }
            }
        }
        ValidationResult::Valid
    }

    /// Perform the tool's work. The only stage a tool is required to
    /// implement.
    ///
    /// A tool body may propagate failures with `?`; the executor catches
    /// every [`ToolError`] except [`ToolError::UserStopped`]/
    /// [`ToolError::Cancelled`] and converts it into a failed output.
    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError>;

    /// Transform output after execution. Default is the identity.
    async fn post_process(&self, output: ToolOutput, _ctx: &ToolContext) -> ToolOutput {
        output
    }

    /// Release resources after execution, run whether or not execution
    /// succeeded. Default does nothing.
    async fn cleanup(&self, _ctx: &ToolContext) {}
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
