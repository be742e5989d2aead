//! The agent turn loop: wires a thread store, a provider, and a tool
//! executor into one state machine that drives `sendMessage` to
//! completion.
//!
//! No transport and no session/delegation policy lives here; see
//! `lace-session` and `lace-subagent` for what wraps an [`Agent`] into a
//! running process.

pub mod agent;
pub mod compaction;
pub mod error;
pub mod event;

pub use agent::Agent;
pub use agent::TurnOutcome;
pub use compaction::CompactionStrategy;
pub use compaction::SummarizeWithModel;
pub use error::LoopError;
pub use event::LoopEvent;
