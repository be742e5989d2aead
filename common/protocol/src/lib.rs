//! Wire and storage types shared across the lace workspace: thread
//! identifiers, the persisted event taxonomy, token usage, and the tool
//! and approval types the event log and the tool executor both speak.
//!
//! Nothing in this crate depends on how a thread is stored, how a provider
//! is reached, or how a tool runs; it only fixes the shapes those crates
//! exchange.

pub mod agent_state;
pub mod approval;
pub mod event;
pub mod thread_id;
pub mod token_usage;
pub mod tool;

pub use agent_state::AgentState;
pub use approval::ApprovalDecision;
pub use approval::ApprovalRequest;
pub use event::Event;
pub use event::EventData;
pub use thread_id::ThreadId;
pub use token_usage::TokenUsage;
pub use tool::RiskLevel;
pub use tool::ToolOutput;
pub use tool::ToolResultContent;
pub use tool::ToolStatus;
pub use tool::ValidationError;
pub use tool::ValidationResult;
