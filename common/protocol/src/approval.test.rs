use super::*;

#[test]
fn test_allow_variants_are_allowed() {
    assert!(ApprovalDecision::AllowOnce.is_allowed());
    assert!(ApprovalDecision::AllowSession.is_allowed());
    assert!(!ApprovalDecision::Deny.is_allowed());
    assert!(!ApprovalDecision::Stop.is_allowed());
}

#[test]
fn test_stop_halts_the_loop() {
    assert!(ApprovalDecision::Stop.is_stop());
    assert!(!ApprovalDecision::Deny.is_stop());
}

#[test]
fn test_decision_serde_tag() {
    let json = serde_json::to_value(ApprovalDecision::AllowSession).unwrap();
    assert_eq!(json["decision"], "allow_session");
    let parsed: ApprovalDecision = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, ApprovalDecision::AllowSession);
}

#[test]
fn test_approval_request_roundtrip() {
    let request = ApprovalRequest::new("t1", "bash", RiskLevel::High, "run rm -rf /");
    let json = serde_json::to_string(&request).unwrap();
    let parsed: ApprovalRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.call_id, "t1");
    assert_eq!(parsed.risk, RiskLevel::High);
}
