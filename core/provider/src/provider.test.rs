use super::*;

#[test]
fn test_complete_options_default_is_unconstrained() {
    let options = CompleteOptions::default();
    assert_eq!(options.max_tokens, None);
    assert_eq!(options.temperature, None);
}
