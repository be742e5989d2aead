use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use lace_protocol::RiskLevel;

use super::*;

struct CountingInner {
    calls: AtomicUsize,
    decision: ApprovalDecision,
}

#[async_trait]
impl ApprovalCallback for CountingInner {
    async fn request_approval(&self, _request: ApprovalRequest) -> ApprovalDecision {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.decision
    }
}

fn request(tool_name: &str) -> ApprovalRequest {
    ApprovalRequest::new("call-1", tool_name, RiskLevel::Medium, "needs approval")
}

#[tokio::test]
async fn test_allow_session_decision_is_cached_across_calls() {
    let inner = Arc::new(CountingInner {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowSession,
    });
    let callback = SessionApprovalCallback::new(inner.clone());

    let first = callback.request_approval(request("write_file")).await;
    let second = callback.request_approval(request("write_file")).await;

    assert_eq!(first, ApprovalDecision::AllowSession);
    assert_eq!(second, ApprovalDecision::AllowSession);
    assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_session_decisions_are_not_cached() {
    let inner = Arc::new(CountingInner {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowOnce,
    });
    let callback = SessionApprovalCallback::new(inner.clone());

    callback.request_approval(request("write_file")).await;
    callback.request_approval(request("write_file")).await;

    assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cache_is_scoped_per_tool_name() {
    let inner = Arc::new(CountingInner {
        calls: AtomicUsize::new(0),
        decision: ApprovalDecision::AllowSession,
    });
    let callback = SessionApprovalCallback::new(inner.clone());

    callback.request_approval(request("write_file")).await;
    callback.request_approval(request("run_shell")).await;

    assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
}
