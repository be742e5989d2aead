//! Thread identifiers.
//!
//! A [`ThreadId`] names one append-only event log. Root threads are minted
//! as `lace_<YYYYMMDD>_<6 lowercase base36>`; a thread spawned by delegation
//! (see `core/subagent`) extends its parent with a `.N` segment, so the
//! dotted prefix alone encodes the parent/child relation without a separate
//! lookup.

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;

/// Opaque identifier for a thread.
///
/// Cheap to clone and compare; threads are looked up by this value in the
/// thread store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    /// Mint a new root thread id for "today", e.g. `lace_20250101_ab3f9k`.
    pub fn new_root() -> Self {
        let date = Utc::now().format("%Y%m%d");
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| {
                let idx = rng.random_range(0..BASE36_ALPHABET.len());
                BASE36_ALPHABET[idx] as char
            })
            .collect();
        Self(format!("lace_{date}_{suffix}"))
    }

    /// Wrap an already-formatted id, e.g. one loaded back from storage.
    ///
    /// Does not validate the `lace_<date>_<suffix>` shape; callers that need
    /// that guarantee should validate at the storage boundary.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a plain string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mint the `n`th child of this thread: `<self>.<n>`.
    ///
    /// Used by delegation to allocate a thread id for a spawned sub-agent.
    pub fn child(&self, n: u32) -> Self {
        Self(format!("{}.{n}", self.0))
    }

    /// The parent thread id, if this is a child (contains a `.` segment).
    ///
    /// Only the immediate parent is returned; call repeatedly to walk to
    /// the root.
    pub fn parent(&self) -> Option<ThreadId> {
        self.0.rfind('.').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Whether this is a root thread (no dotted child segments).
    pub fn is_root(&self) -> bool {
        !self.0.contains('.')
    }

    /// Depth below the root: 0 for a root thread, 1 for its direct children, ...
    pub fn depth(&self) -> u32 {
        self.0.matches('.').count() as u32
    }

    /// Whether `self` is `other`, or a descendant of `other` through any
    /// number of `.N` segments.
    pub fn is_descendant_of(&self, other: &ThreadId) -> bool {
        self.0 == other.0 || self.0.starts_with(&format!("{}.", other.0))
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ThreadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "thread_id.test.rs"]
mod tests;
