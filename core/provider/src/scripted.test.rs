use tokio_stream::StreamExt;

use super::*;
use crate::event::FinishReason;

#[tokio::test]
async fn test_replays_events_in_order() {
    let provider = ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("hi".to_string()),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]);

    let mut stream = provider
        .complete(vec![Message::user("hello")], vec![], CompleteOptions::default())
        .await
        .unwrap();

    let first = stream.next().await.unwrap();
    assert!(matches!(first, ProviderEvent::TextDelta(ref s) if s == "hi"));
    let second = stream.next().await.unwrap();
    assert!(matches!(second, ProviderEvent::Finish(FinishReason::EndTurn)));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_consumes_one_turn_per_call() {
    let provider = ScriptedProvider::new(vec![
        vec![ProviderEvent::Finish(FinishReason::EndTurn)],
        vec![ProviderEvent::Finish(FinishReason::ToolUse)],
    ]);

    let mut first = provider
        .complete(vec![], vec![], CompleteOptions::default())
        .await
        .unwrap();
    assert!(matches!(
        first.next().await.unwrap(),
        ProviderEvent::Finish(FinishReason::EndTurn)
    ));

    let mut second = provider
        .complete(vec![], vec![], CompleteOptions::default())
        .await
        .unwrap();
    assert!(matches!(
        second.next().await.unwrap(),
        ProviderEvent::Finish(FinishReason::ToolUse)
    ));
}

#[tokio::test]
async fn test_errors_when_script_exhausted() {
    let provider = ScriptedProvider::new(vec![]);
    let result = provider
        .complete(vec![], vec![], CompleteOptions::default())
        .await;
    assert!(result.is_err());
    assert!(!result.unwrap_err().is_retryable());
}

#[tokio::test]
async fn test_records_calls() {
    let provider = ScriptedProvider::new(vec![vec![ProviderEvent::Finish(FinishReason::EndTurn)]]);
    let _ = provider
        .complete(vec![Message::user("hi")], vec![], CompleteOptions::default())
        .await
        .unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
}
