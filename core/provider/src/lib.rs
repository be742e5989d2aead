//! The provider capability boundary. Turns a flattened prompt into a
//! stream of events; carries no concrete vendor wire client. See
//! [`Provider`] and the scripted test double in [`scripted`].

pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod scripted;

pub use error::ProviderError;
pub use event::FinishReason;
pub use event::ProviderEvent;
pub use message::Message;
pub use message::Role;
pub use message::ToolSpec;
pub use provider::CompleteOptions;
pub use provider::EventStream;
pub use provider::Provider;
pub use scripted::ScriptedProvider;
pub use scripted::ScriptedTurn;
