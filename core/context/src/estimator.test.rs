use super::*;

#[test]
fn test_empty_text_is_zero() {
    assert_eq!(estimate_tokens(""), 0);
}

#[test]
fn test_rounds_up() {
    // 5 chars / 4 chars-per-token = 1.25, ceil to 2.
    assert_eq!(estimate_tokens("hello"), 2);
}

#[test]
fn test_exact_multiple() {
    assert_eq!(estimate_tokens("abcdefgh"), 2);
}

#[test]
fn test_custom_ratio() {
    assert_eq!(estimate_tokens_with_ratio("abcd", 2.0), 2);
}
