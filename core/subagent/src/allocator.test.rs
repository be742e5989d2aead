use lace_protocol::ThreadId;

use super::*;

fn parent() -> ThreadId {
    ThreadId::from_string("lace_20260101_parent")
}

#[test]
fn test_allocates_sequential_children() {
    let allocator = ChildThreadAllocator::new();

    let first = allocator.allocate(&parent());
    let second = allocator.allocate(&parent());

    assert_eq!(first.as_str(), "lace_20260101_parent.1");
    assert_eq!(second.as_str(), "lace_20260101_parent.2");
}

#[test]
fn test_children_of_lists_allocated_children_in_order() {
    let allocator = ChildThreadAllocator::new();

    assert!(allocator.children_of(&parent()).is_empty());

    allocator.allocate(&parent());
    allocator.allocate(&parent());

    assert_eq!(
        allocator.children_of(&parent()),
        vec![parent().child(1), parent().child(2)]
    );
}

#[test]
fn test_separate_parents_have_independent_counters() {
    let allocator = ChildThreadAllocator::new();
    let other = ThreadId::from_string("lace_20260101_other");

    let a = allocator.allocate(&parent());
    let b = allocator.allocate(&other);

    assert_eq!(a.as_str(), "lace_20260101_parent.1");
    assert_eq!(b.as_str(), "lace_20260101_other.1");
}
