//! Turns a thread's event log into the flattened prompt a provider is
//! completed against. No provider wire logic and no tool execution lives
//! here; see `lace-provider` and `lace-tools`.

pub mod assemble;

pub use assemble::assemble_prompt;
pub use assemble::AssembleOptions;
