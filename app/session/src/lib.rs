//! Session: the owning scope for a tree of agents, sharing one tool
//! inventory and one approval policy.
//!
//! This crate composes `lace-loop` (the turn loop), `lace-subagent`
//! (delegation), `lace-tools` (execution and approval), and `lace-config`
//! (resolved settings) into the thing an embedder actually starts: call
//! [`Session::new`], then [`Session::send_message`] per turn.

pub mod approval;
pub mod error;
pub mod logging;
pub mod session;

pub use approval::SessionApprovalCallback;
pub use error::SessionError;
pub use session::Session;
pub use session::ToolRegistryFactory;
