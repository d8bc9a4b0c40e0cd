//! Recipe history records shared by the core and the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a recipe request resolved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The model returned recipe text.
    Generated,
    /// The model answered without any content.
    NoContent,
    /// Transport, API, or decoding failure.
    Failed,
}

impl OutcomeKind {
    /// Return the outcome as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Generated => "generated",
            OutcomeKind::NoContent => "no_content",
            OutcomeKind::Failed => "failed",
        }
    }
}

/// One completed recipe request.
///
/// Entries are created once per completed request and never modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Request identifier that produced this entry.
    pub id: Uuid,
    /// Ingredient list as it stood when the request was issued.
    pub ingredients: Vec<String>,
    /// Display text: the recipe Markdown or a fallback message.
    pub recipe: String,
    /// How the request resolved.
    pub outcome: OutcomeKind,
    /// Completion time.
    pub timestamp: DateTime<Utc>,
}
