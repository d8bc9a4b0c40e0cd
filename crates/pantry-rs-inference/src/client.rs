//! Inference client interface.

use crate::error::InferenceError;
use async_trait::async_trait;
use log::error;

/// Shown when the endpoint returned no recipe text.
pub const NO_RECIPE_TEXT: &str = "Sorry, I couldn't generate a recipe.";
/// Shown when the request failed.
pub const FETCH_ERROR_TEXT: &str = "Error fetching recipe.";

#[async_trait]
/// Source of recipe text for an ingredient list.
pub trait InferenceClient: Send + Sync {
    /// Request a recipe for `ingredients`.
    ///
    /// Items are forwarded verbatim; callers append any variant instruction
    /// as the final item.
    async fn request_recipe(&self, ingredients: &[String]) -> Result<String, InferenceError>;
}

/// Map an inference outcome to the text shown to the user.
pub fn display_text(result: &Result<String, InferenceError>) -> String {
    match result {
        Ok(text) => text.clone(),
        Err(InferenceError::NoContent) => NO_RECIPE_TEXT.to_string(),
        Err(err) => {
            error!("recipe request failed (error={err})");
            FETCH_ERROR_TEXT.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn successful_text_is_verbatim() {
        let result = Ok("# Pancakes\n".to_string());
        assert_eq!(display_text(&result), "# Pancakes\n");
    }

    #[test]
    fn missing_content_maps_to_apology() {
        assert_eq!(display_text(&Err(InferenceError::NoContent)), NO_RECIPE_TEXT);
    }

    #[test]
    fn failures_map_to_fetch_error() {
        for err in [
            InferenceError::Transport("refused".to_string()),
            InferenceError::Api {
                status: 500,
                message: "boom".to_string(),
            },
            InferenceError::Decode("eof".to_string()),
            InferenceError::Client("tls".to_string()),
        ] {
            assert_eq!(display_text(&Err(err)), FETCH_ERROR_TEXT);
        }
    }
}
