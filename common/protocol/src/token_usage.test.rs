use super::*;

#[test]
fn test_new_clamps_negative() {
    let usage = TokenUsage::new(-5, -1, -6);
    assert_eq!(usage, TokenUsage::default());
}

#[test]
fn test_new_normal() {
    let usage = TokenUsage::new(10, 2, 12);
    assert_eq!(usage.prompt, 10);
    assert_eq!(usage.completion, 2);
    assert_eq!(usage.total, 12);
}

#[test]
fn test_add() {
    let a = TokenUsage::new(10, 2, 12);
    let b = TokenUsage::new(5, 1, 6);
    let sum = a.add(b);
    assert_eq!(sum, TokenUsage::new(15, 3, 18));
}

#[test]
fn test_sum_iterator() {
    let usages = vec![
        TokenUsage::new(10, 2, 12),
        TokenUsage::new(5, 1, 6),
        TokenUsage::new(0, 0, 0),
    ];
    let total: TokenUsage = usages.into_iter().sum();
    assert_eq!(total, TokenUsage::new(15, 3, 18));
}

#[test]
fn test_serde_roundtrip() {
    let usage = TokenUsage::new(10, 2, 12);
    let json = serde_json::to_string(&usage).unwrap();
    let parsed: TokenUsage = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, usage);
}
