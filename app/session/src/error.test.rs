use std::sync::Arc;
use std::time::Duration;

use lace_config::RetryConfig;
use lace_context::BudgetManager;
use lace_error::StatusCode;
use lace_loop::Agent;
use lace_loop::SummarizeWithModel;
use lace_protocol::ThreadId;
use lace_provider::ScriptedProvider;
use lace_store::InMemoryThreadStore;
use lace_tools::DenyAllApprovals;
use lace_tools::ToolExecutor;
use lace_tools::ToolRegistry;
use snafu::ResultExt;

use super::*;

#[tokio::test]
async fn test_turn_error_forwards_busy_status_code() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let store = Arc::new(InMemoryThreadStore::new());
    let compaction = Arc::new(SummarizeWithModel::new(provider.clone()));
    let executor = Arc::new(ToolExecutor::new(
        ToolRegistry::new(),
        Vec::new(),
        Vec::new(),
        Duration::from_secs(5),
        Arc::new(DenyAllApprovals),
    ));
    let mut agent = Agent::new(
        ThreadId::from_string("lace_20260101_abcdef"),
        "session-1",
        store,
        provider,
        executor,
        compaction,
        BudgetManager::new(128_000, 0.85, 4_096),
        RetryConfig::default(),
    );
    agent.shutdown();

    let result: Result<_, SessionError> =
        agent.send_message("hello").await.context(session_error::TurnSnafu);

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidRequest);
}
