//! Per-call execution context handed to a [`crate::Tool`].

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use lace_protocol::ApprovalRequest;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Tracks files a tool has read or modified during one execution, so
/// later stages (post-process, sandbox checks) can inspect what happened
/// without re-deriving it from arguments.
#[derive(Debug, Clone, Default)]
pub struct FileTracker {
    read_files: HashSet<PathBuf>,
    modified_files: HashSet<PathBuf>,
}

impl FileTracker {
    /// Record a file read.
    pub fn record_read(&mut self, path: impl Into<PathBuf>) {
        self.read_files.insert(path.into());
    }

    /// Record a file modification.
    pub fn record_modified(&mut self, path: impl Into<PathBuf>) {
        self.modified_files.insert(path.into());
    }

    /// Whether `path` was read during this execution.
    pub fn was_read(&self, path: &Path) -> bool {
        self.read_files.contains(path)
    }

    /// Whether `path` was modified during this execution.
    pub fn was_modified(&self, path: &Path) -> bool {
        self.modified_files.contains(path)
    }
}

/// Everything a tool needs while it runs: identity, working directory,
/// and cancellation.
#[derive(Clone)]
pub struct ToolContext {
    /// Id of the call this context belongs to, unique within its thread.
    pub call_id: String,
    /// Owning session id.
    pub session_id: String,
    /// Working directory paths are resolved relative to.
    pub cwd: PathBuf,
    /// Fires when the session or the agent loop cancels the in-flight
    /// call (distinct from a user `stop` approval decision).
    pub cancel_token: CancellationToken,
    /// Files touched during this execution.
    pub file_tracker: Arc<Mutex<FileTracker>>,
    /// Notified with the request just before the executor hands it to the
    /// [`crate::ApprovalCallback`], so a subscriber can surface a pending
    /// approval before it's resolved rather than only after. `None` when
    /// nothing is subscribed.
    pub approval_notifier: Option<Arc<dyn Fn(ApprovalRequest) + Send + Sync>>,
}

impl ToolContext {
    /// Build a context rooted at the process's current directory.
    pub fn new(call_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self::with_cwd(
            call_id,
            session_id,
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/")),
        )
    }

    /// Build a context rooted at a specific working directory.
    pub fn with_cwd(
        call_id: impl Into<String>,
        session_id: impl Into<String>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            session_id: session_id.into(),
            cwd: cwd.into(),
            cancel_token: CancellationToken::new(),
            file_tracker: Arc::new(Mutex::new(FileTracker::default())),
            approval_notifier: None,
        }
    }

    /// Attach an existing cancellation token, e.g. one derived from the
    /// agent's and the session's tokens.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Attach a callback fired with each approval request this context's
    /// call raises, before it's resolved.
    pub fn with_approval_notifier(
        mut self,
        notifier: Arc<dyn Fn(ApprovalRequest) + Send + Sync>,
    ) -> Self {
        self.approval_notifier = Some(notifier);
        self
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Notify the attached subscriber, if any, that `request` is about to
    /// be resolved.
    pub fn notify_approval_requested(&self, request: &ApprovalRequest) {
        if let Some(notifier) = &self.approval_notifier {
            notifier(request.clone());
        }
    }

    /// Resolve `path` against `cwd` if it isn't already absolute.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        }
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("call_id", &self.call_id)
            .field("session_id", &self.session_id)
            .field("cwd", &self.cwd)
            .field("is_cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "context.test.rs"]
mod tests;
