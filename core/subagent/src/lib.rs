//! Delegation: spawning a child agent from within a parent's tool call.
//!
//! Delegation is modeled as a first-class tool ([`DelegateTool`]) rather
//! than a special agent API, so the turn loop in `lace-loop` stays
//! uniform: a delegated child is just another [`lace_loop::Agent`]
//! running under its own thread id.

pub mod allocator;
pub mod delegate;

pub use allocator::ChildThreadAllocator;
pub use delegate::DelegateInput;
pub use delegate::DelegateTool;
pub use delegate::EventSink;
pub use delegate::ExecutorFactory;
pub use delegate::empty_event_sink;
