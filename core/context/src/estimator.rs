//! Pure, synchronous token estimation used before a provider round-trip
//! reports real usage (e.g. to decide whether to trigger compaction
//! before opening a stream).

/// Default characters-per-token ratio. A rough approximation that holds
/// across most tokenizers closely enough to gate compaction decisions;
/// real usage always comes from the provider once a request completes.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Estimate the token count of `text` using a fixed chars-per-token ratio.
pub fn estimate_tokens(text: &str) -> u64 {
    estimate_tokens_with_ratio(text, DEFAULT_CHARS_PER_TOKEN)
}

/// Estimate with an explicit ratio, for callers tuning to a specific
/// provider's tokenizer.
pub fn estimate_tokens_with_ratio(text: &str, chars_per_token: f64) -> u64 {
    if text.is_empty() {
        return 0;
    }
    (text.chars().count() as f64 / chars_per_token).ceil() as u64
}

#[cfg(test)]
#[path = "estimator.test.rs"]
mod tests;
