use super::*;

#[test]
fn test_init_does_not_panic_when_called_twice() {
    init();
    init();
}
