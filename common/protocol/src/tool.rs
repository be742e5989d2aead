//! Types shared between the tool executor and the persisted event log:
//! call results, validation outcomes, and risk classification.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// One typed content block carried by a `TOOL_RESULT` event. A result's
/// `content` is a list of these, not a single value, so a tool can
/// return e.g. a text summary alongside a structured payload in one
/// result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultContent {
    /// Plain text output.
    Text(String),
    /// Structured JSON output, for tools whose result is consumed
    /// programmatically rather than read by the model as prose.
    Structured(Value),
    /// A reference to content that lives elsewhere (a file path, a data
    /// URL, an external resource) rather than being inlined.
    Uri(String),
}

impl ToolResultContent {
    /// Build a text content block.
    pub fn text(content: impl Into<String>) -> Self {
        ToolResultContent::Text(content.into())
    }

    /// Build a URI content block.
    pub fn uri(uri: impl Into<String>) -> Self {
        ToolResultContent::Uri(uri.into())
    }
}

/// Terminal status of a single tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// The tool ran to completion, successfully or not (`isError` on the
    /// surrounding `TOOL_RESULT` carries success/failure).
    Completed,
    /// The tool's body raised an error before producing output.
    Failed,
    /// Execution was cancelled before it produced output.
    Cancelled,
}

/// Output of one tool execution, destined for a `TOOL_RESULT` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Result content blocks shown to the model.
    pub content: Vec<ToolResultContent>,
    /// Whether `content` represents an error rather than a normal result.
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    /// A successful text result.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::text(content)],
            is_error: false,
        }
    }

    /// An error result surfaced to the model, not raised to the caller.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::text(message)],
            is_error: true,
        }
    }

    /// A structured (JSON) result.
    pub fn structured(value: Value) -> Self {
        Self {
            content: vec![ToolResultContent::Structured(value)],
            is_error: false,
        }
    }

    /// A result pointing at content that lives elsewhere.
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            content: vec![ToolResultContent::uri(uri)],
            is_error: false,
        }
    }
}

/// Outcome of validating a tool call's input against its declared schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum ValidationResult {
    /// Input matches the schema.
    Valid,
    /// Input failed validation; the call never reaches `execute`.
    Invalid {
        /// One entry per violated constraint.
        errors: Vec<ValidationError>,
    },
}

impl ValidationResult {
    /// Whether validation passed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Build an invalid result from a single message, unattached to a field.
    pub fn error(message: impl Into<String>) -> Self {
        ValidationResult::Invalid {
            errors: vec![ValidationError::new(message)],
        }
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description of the violation.
    pub message: String,
    /// JSON path to the offending field, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ValidationError {
    /// Build an error with no field path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Build an error attached to a specific field path.
    pub fn with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Design-level risk classification used to decide whether a call needs
/// approval. Not a security boundary: the tool body must be safe regardless
/// of how it is classified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Read-only or side-effect-free.
    Low,
    /// Writes or mutates state, but reversibly.
    Medium,
    /// Destructive, irreversible, or escalates privilege.
    High,
}

#[cfg(test)]
#[path = "tool.test.rs"]
mod tests;
