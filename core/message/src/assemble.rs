//! Turns a thread's persisted events into the flattened transcript a
//! [`lace_provider::Provider`] is prompted with.

use lace_protocol::Event;
use lace_protocol::EventData;
use lace_protocol::ToolResultContent;
use lace_provider::Message;

/// Tuning knobs for [`assemble_prompt`].
#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    /// Merge consecutive messages from the same role into one, so a run
    /// of tool results doesn't fragment into many single-line turns.
    pub merge_consecutive: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            merge_consecutive: true,
        }
    }
}

/// Replay a thread's events into a flattened prompt.
///
/// Transient events ([`EventData::is_transient`]) are skipped; callers
/// pulling events straight from a [`lace_store::ThreadStore`] will never
/// see one, since the store never persists them, but the check is kept
/// here too so a caller assembling from a live buffer gets the same
/// result either way. [`EventData::Compaction`] is expanded in place
/// by recursing into its `replacement`, so a compacted thread produces
/// the same prompt shape as the thread it replaced.
pub fn assemble_prompt(events: &[Event], options: &AssembleOptions) -> Vec<Message> {
    let mut messages = Vec::new();
    for event in events {
        if event.data.is_transient() {
            continue;
        }
        push_event_data(&event.data, &mut messages);
    }

    if options.merge_consecutive {
        merge_consecutive(messages)
    } else {
        messages
    }
}

fn push_event_data(data: &EventData, out: &mut Vec<Message>) {
    match data {
        EventData::UserMessage { text } => out.push(Message::user(text.clone())),

        EventData::AgentMessage { text, .. } => {
            if !text.is_empty() {
                out.push(Message::assistant(text.clone()));
            }
        }

        EventData::AgentToken { .. } | EventData::AgentThinking { .. } => {
            // Incremental/reasoning spans aren't replayed back to the
            // provider; the persisted AgentMessage is the source of truth.
        }

        EventData::ToolCall {
            call_id,
            name,
            arguments,
        } => out.push(Message::assistant(format!(
            "[tool_call {name} {call_id}] {arguments}"
        ))),

        EventData::ToolResult {
            call_id, content, ..
        } => out.push(Message::tool_result(
            call_id.clone(),
            tool_result_blocks_to_text(content),
        )),

        EventData::ToolApprovalRequest { .. } | EventData::ToolApprovalResponse { .. } => {
            // Approval bookkeeping is not part of the model-facing prompt.
        }

        EventData::LocalSystemMessage { .. } => {
            // Operator-visible diagnostics, not sent back to the provider.
        }

        EventData::Compaction { replacement, .. } => {
            for item in replacement {
                push_event_data(item, out);
            }
        }
    }
}

fn tool_result_blocks_to_text(blocks: &[ToolResultContent]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            ToolResultContent::Text(text) => text.clone(),
            ToolResultContent::Structured(value) => value.to_string(),
            ToolResultContent::Uri(uri) => uri.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn merge_consecutive(messages: Vec<Message>) -> Vec<Message> {
    let mut merged: Vec<Message> = Vec::with_capacity(messages.len());
    for message in messages {
        let can_merge = matches!(
            (merged.last(), message.tool_call_id.as_ref()),
            (Some(last), None) if last.role == message.role && last.tool_call_id.is_none()
        );
        if can_merge {
            #[allow(clippy::unwrap_used)]
            let last = merged.last_mut().unwrap();
            last.content.push('\n');
            last.content.push_str(&message.content);
        } else {
            merged.push(message);
        }
    }
    merged
}

#[cfg(test)]
#[path = "assemble.test.rs"]
mod tests;
