//! Prompt text sent with every recipe request.

/// System instruction sent ahead of the ingredient list.
pub const SYSTEM_PROMPT: &str = "\
You are an assistant that receives a list of ingredients and suggests a creative and unique recipe each time.
Try to vary your response to make it different from previous ones.
The recipe can include extra ingredients, but keep them minimal.
Format your response in Markdown.";

/// Build the user message for an ingredient list.
///
/// Items are joined with `", "` verbatim, so a trailing variant instruction
/// appears as the last list item.
pub fn user_message(ingredients: &[String]) -> String {
    format!(
        "I have {}. Please give me a recipe!",
        ingredients.join(", ")
    )
}
