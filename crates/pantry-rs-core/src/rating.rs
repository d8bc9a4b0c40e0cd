//! Star ratings keyed by exact recipe text.

use crate::error::CoreError;
use log::{debug, warn};
use pantry_rs_storage::KeyValueStore;
use std::sync::Arc;

/// Prefix of every rating key; the recipe text follows verbatim.
pub const RATING_KEY_PREFIX: &str = "recipe-rating-";
/// Highest selectable rating.
pub const MAX_STARS: u8 = 5;

/// Rating persistence over a key-value store.
///
/// `0` means unrated and is never written.
#[derive(Clone)]
pub struct RecipeRatings {
    store: Arc<dyn KeyValueStore>,
}

impl RecipeRatings {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Storage key for `recipe`.
    pub fn key_for(recipe: &str) -> String {
        format!("{RATING_KEY_PREFIX}{recipe}")
    }

    /// Stored rating for `recipe`, or `0` when none is stored.
    ///
    /// Values that do not parse as `1..=5` read as unrated.
    pub fn rating_for(&self, recipe: &str) -> Result<u8, CoreError> {
        let Some(raw) = self.store.get(&Self::key_for(recipe))? else {
            return Ok(0);
        };
        match raw.trim().parse::<u8>() {
            Ok(stars) if (1..=MAX_STARS).contains(&stars) => Ok(stars),
            _ => {
                warn!("ignoring invalid stored rating (value={raw})");
                Ok(0)
            }
        }
    }

    /// Persist `stars` for `recipe`. Values outside `1..=5` are ignored.
    pub fn rate(&self, recipe: &str, stars: u8) -> Result<bool, CoreError> {
        if !(1..=MAX_STARS).contains(&stars) {
            return Ok(false);
        }
        self.store
            .set(&Self::key_for(recipe), &stars.to_string())?;
        debug!("stored recipe rating (stars={stars}, recipe_len={})", recipe.len());
        Ok(true)
    }
}

impl std::fmt::Debug for RecipeRatings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeRatings").finish_non_exhaustive()
    }
}

/// View state of the rating control under the current recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingWidget {
    recipe: Option<String>,
    stars: u8,
}

impl RatingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display the widget for `recipe`.
    ///
    /// The stored rating is read the first time a given text is shown;
    /// showing the same text again keeps the current selection.
    pub fn show(&mut self, ratings: &RecipeRatings, recipe: &str) -> Result<u8, CoreError> {
        if self.recipe.as_deref() != Some(recipe) {
            let stars = ratings.rating_for(recipe)?;
            self.recipe = Some(recipe.to_string());
            self.stars = stars;
        }
        Ok(self.stars)
    }

    /// Select `stars` for the shown recipe and persist it.
    ///
    /// Returns `false` when nothing is shown or `stars` is out of range.
    pub fn select(&mut self, ratings: &RecipeRatings, stars: u8) -> Result<bool, CoreError> {
        let Some(recipe) = self.recipe.as_deref() else {
            return Ok(false);
        };
        if !ratings.rate(recipe, stars)? {
            return Ok(false);
        }
        self.stars = stars;
        Ok(true)
    }

    /// Hide the widget, forgetting the shown recipe.
    pub fn reset(&mut self) {
        self.recipe = None;
        self.stars = 0;
    }

    pub fn recipe(&self) -> Option<&str> {
        self.recipe.as_deref()
    }

    pub fn stars(&self) -> u8 {
        self.stars
    }
}
