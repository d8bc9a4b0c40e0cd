//! Shared types for Pantry events, prompt variants, and recipe history.

mod history;

pub use history::{HistoryEntry, OutcomeKind};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recipe request.
pub type RequestId = Uuid;

/// Extra instruction appended to the ingredient payload of every request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PromptVariant {
    /// Ask for a recipe that differs from earlier answers.
    DifferentFromBefore,
    /// Ask for something new and creative.
    SomethingNew,
}

impl PromptVariant {
    /// Every variant, in selection order.
    pub const ALL: [PromptVariant; 2] = [
        PromptVariant::DifferentFromBefore,
        PromptVariant::SomethingNew,
    ];

    /// Instruction text sent as a trailing pseudo-ingredient.
    pub fn instruction(&self) -> &'static str {
        match self {
            PromptVariant::DifferentFromBefore => {
                "Make sure this is a different recipe from before."
            }
            PromptVariant::SomethingNew => {
                "Suggest something new and creative with these ingredients."
            }
        }
    }
}

/// Wrapper for events emitted by the recipe orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMsg {
    /// Unique id for the event.
    pub id: Uuid,
    /// Timestamp when the event was created.
    pub created_at: DateTime<Utc>,
    /// Event payload content.
    pub payload: EventPayload,
}

impl EventMsg {
    /// Wrap a payload with a fresh id and the current time.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            payload,
        }
    }
}

/// All events emitted during recipe generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type", content = "payload")]
pub enum EventPayload {
    /// A request was dispatched to the inference client.
    GenerationStarted {
        request_id: RequestId,
        ingredient_count: usize,
        variant: PromptVariant,
    },
    /// A request resolved and was appended to history.
    GenerationCompleted {
        request_id: RequestId,
        outcome: OutcomeKind,
        history_len: usize,
    },
}

/// Sink interface for orchestrator events.
pub trait EventSink: Send + Sync {
    /// Emit an event to downstream listeners.
    fn emit(&self, event: EventMsg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn prompt_variants_have_distinct_instructions() {
        let [first, second] = PromptVariant::ALL;
        assert!(first.instruction() != second.instruction());
        assert_eq!(
            first.instruction(),
            "Make sure this is a different recipe from before."
        );
    }

    #[test]
    fn event_payload_uses_tagged_encoding() {
        let request_id = Uuid::nil();
        let payload = EventPayload::GenerationCompleted {
            request_id,
            outcome: OutcomeKind::NoContent,
            history_len: 3,
        };
        let encoded = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(
            encoded,
            json!({
                "type": "generation_completed",
                "payload": {
                    "request_id": "00000000-0000-0000-0000-000000000000",
                    "outcome": "no_content",
                    "history_len": 3
                }
            })
        );
    }
}
