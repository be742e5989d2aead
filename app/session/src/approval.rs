//! Session-wide approval routing.
//!
//! A [`ToolExecutor`](lace_tools::ToolExecutor) only caches `allow_session`
//! decisions for itself, but a session builds one executor per thread (see
//! [`crate::session::Session`]), so that per-executor cache alone wouldn't
//! actually hold for the whole session: a child thread delegated from the
//! root would prompt again for a tool the root already cleared. This
//! wraps whatever callback is actually resolving approvals (a human, a UI,
//! an automated policy) with a cache shared by every agent in the tree.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use lace_protocol::ApprovalDecision;
use lace_protocol::ApprovalRequest;
use lace_tools::ApprovalCallback;

/// Routes approval requests from any agent in a session's tree to one
/// inner callback, short-circuiting calls already approved for the
/// session without round-tripping to it again.
pub struct SessionApprovalCallback {
    inner: Arc<dyn ApprovalCallback>,
    allowed_for_session: DashSet<String>,
}

impl SessionApprovalCallback {
    /// Wrap `inner`, the callback that actually resolves a pending
    /// approval (prompts a human, consults a policy, ...).
    pub fn new(inner: Arc<dyn ApprovalCallback>) -> Self {
        Self {
            inner,
            allowed_for_session: DashSet::new(),
        }
    }
}

#[async_trait]
impl ApprovalCallback for SessionApprovalCallback {
    async fn request_approval(&self, request: ApprovalRequest) -> ApprovalDecision {
        if self.allowed_for_session.contains(&request.tool_name) {
            return ApprovalDecision::AllowSession;
        }

        let decision = self.inner.request_approval(request.clone()).await;
        if decision == ApprovalDecision::AllowSession {
            self.allowed_for_session.insert(request.tool_name);
        }
        decision
    }
}

#[cfg(test)]
#[path = "approval.test.rs"]
mod tests;
