use super::*;

#[test]
fn test_new_root_shape() {
    let id = ThreadId::new_root();
    let s = id.as_str();
    assert!(s.starts_with("lace_"));
    let rest = &s["lace_".len()..];
    let (date, suffix) = rest.split_once('_').expect("date/suffix separator");
    assert_eq!(date.len(), 8);
    assert!(date.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(suffix.len(), 6);
    assert!(
        suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    );
}

#[test]
fn test_root_has_no_parent() {
    let id = ThreadId::new_root();
    assert!(id.is_root());
    assert_eq!(id.parent(), None);
    assert_eq!(id.depth(), 0);
}

#[test]
fn test_child_extends_with_dot() {
    let root = ThreadId::from_string("lace_20250101_abcdef");
    let child = root.child(1);
    assert_eq!(child.as_str(), "lace_20250101_abcdef.1");
    assert!(!child.is_root());
    assert_eq!(child.depth(), 1);
    assert_eq!(child.parent(), Some(root.clone()));
}

#[test]
fn test_grandchild_depth_and_parent() {
    let root = ThreadId::from_string("lace_20250101_abcdef");
    let child = root.child(1);
    let grandchild = child.child(2);
    assert_eq!(grandchild.as_str(), "lace_20250101_abcdef.1.2");
    assert_eq!(grandchild.depth(), 2);
    assert_eq!(grandchild.parent(), Some(child));
}

#[test]
fn test_is_descendant_of() {
    let root = ThreadId::from_string("lace_20250101_abcdef");
    let child = root.child(1);
    let grandchild = child.child(2);
    let unrelated = ThreadId::from_string("lace_20250101_zzzzzz");

    assert!(root.is_descendant_of(&root));
    assert!(child.is_descendant_of(&root));
    assert!(grandchild.is_descendant_of(&root));
    assert!(grandchild.is_descendant_of(&child));
    assert!(!unrelated.is_descendant_of(&root));
    assert!(!root.is_descendant_of(&child));
}

#[test]
fn test_two_new_roots_differ() {
    let a = ThreadId::new_root();
    let b = ThreadId::new_root();
    // Vanishingly unlikely to collide; guards against a stubbed-out
    // suffix generator that always returns the same value.
    assert_ne!(a, b);
}
