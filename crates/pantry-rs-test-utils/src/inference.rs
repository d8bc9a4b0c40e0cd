use async_trait::async_trait;
use pantry_rs_inference::{InferenceClient, InferenceError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;

/// Always answers with the same recipe text.
#[derive(Debug, Clone)]
pub struct FixedInference {
    recipe: String,
}

impl FixedInference {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
        }
    }
}

#[async_trait]
impl InferenceClient for FixedInference {
    async fn request_recipe(&self, _ingredients: &[String]) -> Result<String, InferenceError> {
        Ok(self.recipe.clone())
    }
}

/// Always fails with a transport error.
#[derive(Debug, Clone, Default)]
pub struct FailingInference;

#[async_trait]
impl InferenceClient for FailingInference {
    async fn request_recipe(&self, _ingredients: &[String]) -> Result<String, InferenceError> {
        Err(InferenceError::Transport("connection refused".to_string()))
    }
}

/// Answers without recipe content.
#[derive(Debug, Clone, Default)]
pub struct EmptyInference;

#[async_trait]
impl InferenceClient for EmptyInference {
    async fn request_recipe(&self, _ingredients: &[String]) -> Result<String, InferenceError> {
        Err(InferenceError::NoContent)
    }
}

/// Records every payload and answers with a fixed recipe.
#[derive(Debug, Clone)]
pub struct RecordingInference {
    recipe: String,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingInference {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Payloads received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl InferenceClient for RecordingInference {
    async fn request_recipe(&self, ingredients: &[String]) -> Result<String, InferenceError> {
        self.calls.lock().push(ingredients.to_vec());
        Ok(self.recipe.clone())
    }
}

/// Holds each request until `release` is called.
#[derive(Debug, Clone)]
pub struct GatedInference {
    recipe: String,
    gate: Arc<Notify>,
}

impl GatedInference {
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
            gate: Arc::new(Notify::new()),
        }
    }

    /// Let one pending (or the next) request finish.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl InferenceClient for GatedInference {
    async fn request_recipe(&self, _ingredients: &[String]) -> Result<String, InferenceError> {
        self.gate.notified().await;
        Ok(self.recipe.clone())
    }
}
