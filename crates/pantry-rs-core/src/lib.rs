//! Core recipe-suggestion state for Pantry.
//!
//! This crate owns the ingredient list, the session recipe history, per-recipe
//! ratings, and the orchestrator that drives a single recipe request at a time.

pub mod error;
pub mod history;
pub mod ingredients;
pub mod orchestrator;
pub mod rating;

pub use error::CoreError;
pub use history::RecipeHistory;
pub use ingredients::{INGREDIENTS_KEY, IngredientStore};
/// Orchestrator and the request handles it hands out.
pub use orchestrator::{CompletedRecipe, GenerationPhase, PendingRecipe, RecipeOrchestrator};
pub use pantry_rs_protocol::EventSink;
/// Rating persistence and widget state.
pub use rating::{MAX_STARS, RATING_KEY_PREFIX, RatingWidget, RecipeRatings};
