use std::sync::Arc;

use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::ThreadId;
use lace_protocol::TokenUsage;
use lace_provider::FinishReason;
use lace_provider::ProviderEvent;
use lace_provider::ScriptedProvider;

use super::*;

fn thread_id() -> ThreadId {
    ThreadId::from_string("lace_20260101_aaaaaa")
}

#[tokio::test]
async fn test_summarize_produces_single_agent_message_with_usage() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        ProviderEvent::TextDelta("the user asked about".to_string()),
        ProviderEvent::TextDelta(" widgets".to_string()),
        ProviderEvent::Usage(TokenUsage::new(500, 200, 700)),
        ProviderEvent::Finish(FinishReason::EndTurn),
    ]]));
    let strategy = SummarizeWithModel::new(provider.clone());

    let events = vec![
        Event::new(
            thread_id(),
            0,
            EventData::UserMessage {
                text: "tell me about widgets".to_string(),
            },
        ),
        Event::new(
            thread_id(),
            1,
            EventData::AgentMessage {
                text: "widgets are small".to_string(),
                usage: TokenUsage::new(10, 5, 15),
                truncated: false,
            },
        ),
    ];

    let replacement = strategy.compact(&events).await.unwrap();

    assert_eq!(replacement.len(), 1);
    match &replacement[0] {
        EventData::AgentMessage {
            text,
            usage,
            truncated,
        } => {
            assert_eq!(text, "the user asked about widgets");
            assert_eq!(*usage, TokenUsage::new(500, 200, 700));
            assert!(!truncated);
        }
        other => panic!("expected AgentMessage, got {other:?}"),
    }

    // the prompt sent to the provider included the transcript being summarized
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let joined: String = calls[0]
        .iter()
        .map(|m| m.content.clone())
        .collect::<Vec<_>>()
        .join(" ");
    assert!(joined.contains("widgets"));
}

#[test]
fn test_strategy_id_is_stable() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let strategy = SummarizeWithModel::new(provider);
    assert_eq!(strategy.strategy_id(), "summarize-with-model");
}
