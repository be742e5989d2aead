//! Shared error classification for the lace workspace.
//!
//! Every crate that can fail defines its own `snafu`-derived error enum, but
//! all of them classify themselves through the same [`StatusCode`] taxonomy
//! and implement [`ErrorExt`]. That lets a caller sitting above several
//! crates (the agent loop, the session) decide whether to retry or log an
//! error generically, without matching on each crate's concrete enum.

pub mod ext;
pub mod status_code;

pub use ext::ErrorExt;
pub use ext::PlainError;
pub use ext::boxed;
pub use status_code::StatusCategory;
pub use status_code::StatusCode;
pub use status_code::StatusMeta;

/// Source location captured by `#[snafu(implicit)] location: Location` in
/// every crate-local error variant.
pub type Location = snafu::Location;
