//! Ordered, duplicate-free ingredient list.

use crate::error::CoreError;
use log::{debug, info};
use pantry_rs_storage::KeyValueStore;

/// Storage key for the saved ingredient list.
pub const INGREDIENTS_KEY: &str = "ingredients";

/// Ingredients in insertion order.
///
/// Entries are trimmed, non-empty, and unique under exact comparison.
/// Rejected mutations are silent no-ops that return `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientStore {
    items: Vec<String>,
}

impl IngredientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store by adding each item in order.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for item in items {
            store.add(item.as_ref());
        }
        store
    }

    /// Append `text` unless it is blank or already present.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.contains(text) {
            return false;
        }
        self.items.push(text.to_string());
        true
    }

    /// Replace the entry at `index`.
    ///
    /// Blank text deletes the entry. A value held by another entry, or an
    /// out-of-range index, leaves the store unchanged.
    pub fn edit(&mut self, index: usize, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return self.delete(index);
        }
        if index >= self.items.len() {
            return false;
        }
        if self
            .items
            .iter()
            .enumerate()
            .any(|(other, item)| other != index && item == text)
        {
            debug!("rejected duplicate ingredient edit (index={index})");
            return false;
        }
        self.items[index] = text.to_string();
        true
    }

    /// Remove the entry at `index`, shifting later entries down.
    pub fn delete(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.items.iter().any(|item| item == text)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Owned copy of the current list.
    pub fn snapshot(&self) -> Vec<String> {
        self.items.clone()
    }

    /// Persist the full list as a JSON array under [`INGREDIENTS_KEY`].
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), CoreError> {
        let encoded = serde_json::to_string(&self.items)?;
        store.set(INGREDIENTS_KEY, &encoded)?;
        info!("saved ingredients (count={})", self.items.len());
        Ok(())
    }

    /// Replace the list with the saved one.
    ///
    /// Returns `false` and leaves the list untouched when nothing is saved.
    /// Saved entries go through the same rules as [`IngredientStore::add`].
    pub fn load(&mut self, store: &dyn KeyValueStore) -> Result<bool, CoreError> {
        let Some(encoded) = store.get(INGREDIENTS_KEY)? else {
            debug!("no saved ingredients");
            return Ok(false);
        };
        let saved: Vec<String> = serde_json::from_str(&encoded)?;
        *self = Self::from_items(&saved);
        info!(
            "loaded ingredients (saved={}, kept={})",
            saved.len(),
            self.items.len()
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_rs_storage::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;

    fn store(items: &[&str]) -> IngredientStore {
        IngredientStore::from_items(items)
    }

    #[test]
    fn add_trims_and_rejects_blank_and_duplicates() {
        let mut ingredients = IngredientStore::new();
        assert!(ingredients.add("  egg "));
        assert!(!ingredients.add(""));
        assert!(!ingredients.add("   "));
        assert!(!ingredients.add("egg"));
        assert!(ingredients.add("Egg"));
        assert_eq!(ingredients.as_slice(), ["egg", "Egg"]);
    }

    #[test]
    fn add_preserves_first_insertion_order() {
        let mut ingredients = IngredientStore::new();
        for item in ["b", "a", "b", "c", "a"] {
            ingredients.add(item);
        }
        assert_eq!(ingredients.as_slice(), ["b", "a", "c"]);
    }

    #[test]
    fn edit_with_blank_text_deletes() {
        let mut edited = store(&["egg", "flour", "milk"]);
        let mut deleted = edited.clone();
        assert!(edited.edit(1, "  "));
        assert!(deleted.delete(1));
        assert_eq!(edited, deleted);
        assert_eq!(edited.as_slice(), ["egg", "milk"]);
    }

    #[test]
    fn edit_rejects_value_held_elsewhere() {
        let mut ingredients = store(&["egg", "flour", "milk"]);
        assert!(!ingredients.edit(0, "milk"));
        assert_eq!(ingredients.as_slice(), ["egg", "flour", "milk"]);
    }

    #[test]
    fn edit_to_same_value_is_allowed() {
        let mut ingredients = store(&["egg", "flour"]);
        assert!(ingredients.edit(1, " flour "));
        assert_eq!(ingredients.as_slice(), ["egg", "flour"]);
    }

    #[test]
    fn edit_replaces_in_place() {
        let mut ingredients = store(&["egg", "flour", "milk"]);
        assert!(ingredients.edit(1, "rye flour"));
        assert_eq!(ingredients.as_slice(), ["egg", "rye flour", "milk"]);
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let mut ingredients = store(&["egg"]);
        assert!(!ingredients.edit(3, "milk"));
        assert!(!ingredients.edit(3, ""));
        assert!(!ingredients.delete(1));
        assert_eq!(ingredients.as_slice(), ["egg"]);
    }

    #[test]
    fn clear_empties_the_list() {
        let mut ingredients = store(&["egg", "flour"]);
        ingredients.clear();
        assert!(ingredients.is_empty());
    }

    #[test]
    fn load_without_saved_value_keeps_list() {
        let kv = MemoryKeyValueStore::new();
        let mut ingredients = store(&["egg"]);
        assert!(!ingredients.load(&kv).expect("load"));
        assert_eq!(ingredients.as_slice(), ["egg"]);
    }

    #[test]
    fn save_then_load_replaces_list() {
        let kv = MemoryKeyValueStore::new();
        store(&["egg", "flour", "milk"]).save(&kv).expect("save");
        assert_eq!(
            kv.get(INGREDIENTS_KEY).expect("get").as_deref(),
            Some(r#"["egg","flour","milk"]"#)
        );

        let mut ingredients = store(&["rice"]);
        assert!(ingredients.load(&kv).expect("load"));
        assert_eq!(ingredients.as_slice(), ["egg", "flour", "milk"]);
    }

    #[test]
    fn load_normalizes_saved_entries() {
        let kv = MemoryKeyValueStore::new();
        kv.set(INGREDIENTS_KEY, r#"[" egg ", "", "egg", "milk"]"#)
            .expect("set");
        let mut ingredients = IngredientStore::new();
        assert!(ingredients.load(&kv).expect("load"));
        assert_eq!(ingredients.as_slice(), ["egg", "milk"]);
    }

    #[test]
    fn load_rejects_malformed_value() {
        let kv = MemoryKeyValueStore::new();
        kv.set(INGREDIENTS_KEY, "{not json").expect("set");
        let mut ingredients = store(&["egg"]);
        let err = ingredients.load(&kv).unwrap_err();
        assert!(matches!(err, CoreError::Decode(_)));
        assert_eq!(ingredients.as_slice(), ["egg"]);
    }
}
