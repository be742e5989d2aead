use super::*;

#[test]
fn test_deny_list_takes_precedence_over_allow() {
    let arbitrator = Arbitrator::new(vec!["bash".to_string()], vec!["bash".to_string()]);
    assert_eq!(
        arbitrator.arbitrate("bash", true, RiskLevel::High),
        ArbitrationOutcome::Deny
    );
}

#[test]
fn test_auto_approve_exact_match() {
    let arbitrator = Arbitrator::new(vec!["file_read".to_string()], vec![]);
    assert_eq!(
        arbitrator.arbitrate("file_read", true, RiskLevel::High),
        ArbitrationOutcome::Allow
    );
}

#[test]
fn test_wildcard_pattern_matches_prefix() {
    let arbitrator = Arbitrator::new(vec!["file_*".to_string()], vec![]);
    assert_eq!(
        arbitrator.arbitrate("file_read_many", true, RiskLevel::High),
        ArbitrationOutcome::Allow
    );
}

#[test]
fn test_nondestructive_low_risk_auto_allows() {
    let arbitrator = Arbitrator::new(vec![], vec![]);
    assert_eq!(
        arbitrator.arbitrate("file_read", false, RiskLevel::Low),
        ArbitrationOutcome::Allow
    );
}

#[test]
fn test_destructive_needs_approval_by_default() {
    let arbitrator = Arbitrator::new(vec![], vec![]);
    assert_eq!(
        arbitrator.arbitrate("bash", true, RiskLevel::Medium),
        ArbitrationOutcome::NeedsApproval
    );
}

#[test]
fn test_nondestructive_high_risk_needs_approval() {
    let arbitrator = Arbitrator::new(vec![], vec![]);
    assert_eq!(
        arbitrator.arbitrate("bash", false, RiskLevel::High),
        ArbitrationOutcome::NeedsApproval
    );
}
