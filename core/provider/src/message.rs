//! The message shape a [`crate::Provider`] is prompted with: a flattened
//! user/assistant/tool-result transcript, independent of how the thread
//! that produced it is stored.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Who authored a message in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// One turn of the flattened prompt handed to [`crate::Provider::complete`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message.
    pub role: Role,
    /// Text content. Empty for a pure tool-call assistant turn.
    pub content: String,
    /// Set on a `Role::Tool` message: which call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Build a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_call_id: None,
        }
    }

    /// Build an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_call_id: None,
        }
    }

    /// Build a tool-result message answering `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// The subset of a tool's definition a provider needs to offer it to the
/// model: name, description, and input schema. Execution machinery lives
/// in `core/tools`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name as the model will reference it in a call.
    pub name: String,
    /// Description shown to the model.
    pub description: String,
    /// JSON Schema for valid input.
    pub input_schema: Value,
}

#[cfg(test)]
#[path = "message.test.rs"]
mod tests;
