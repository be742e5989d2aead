//! Tool definition, inventory, and execution: validation, approval
//! arbitration, and the executor that runs calls under a timeout.

mod arbitration;
mod context;
mod error;
mod executor;
mod registry;
mod risk;
mod sandbox;
mod sensitive_files;
mod tool;

pub use arbitration::ArbitrationOutcome;
pub use arbitration::Arbitrator;
pub use context::FileTracker;
pub use context::ToolContext;
pub use error::ToolError;
pub use executor::ApprovalCallback;
pub use executor::ApprovalRecord;
pub use executor::DenyAllApprovals;
pub use executor::ExecutionOutcome;
pub use executor::ToolCall;
pub use executor::ToolExecutor;
pub use registry::ToolRegistry;
pub use risk::classify_risk;
pub use sandbox::PathSandbox;
pub use sandbox::SandboxOutcome;
pub use sensitive_files::is_locked_directory;
pub use sensitive_files::is_outside_cwd;
pub use sensitive_files::is_sensitive_directory;
pub use sensitive_files::is_sensitive_file;
pub use tool::Tool;
pub use tool::ToolAnnotations;
