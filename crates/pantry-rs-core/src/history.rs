//! Append-only history of completed recipe requests.

use pantry_rs_protocol::HistoryEntry;

/// Session-scoped recipe history, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RecipeHistory {
    entries: Vec<HistoryEntry>,
}

impl RecipeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its index.
    pub fn push(&mut self, entry: HistoryEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recently appended entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
