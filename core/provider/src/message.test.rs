use super::*;

#[test]
fn test_constructors_set_role() {
    assert_eq!(Message::user("hi").role, Role::User);
    assert_eq!(Message::assistant("hi").role, Role::Assistant);
    let tool = Message::tool_result("t1", "done");
    assert_eq!(tool.role, Role::Tool);
    assert_eq!(tool.tool_call_id.as_deref(), Some("t1"));
}

#[test]
fn test_non_tool_message_has_no_call_id() {
    assert_eq!(Message::user("hi").tool_call_id, None);
}
