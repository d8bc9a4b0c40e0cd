//! Recipe request orchestrator.
//!
//! Drives one recipe request at a time through `Idle -> Loading -> Shown`.
//! The request is split into three steps so a UI loop can keep handling
//! input while the inference call is outstanding:
//!
//! 1. [`RecipeOrchestrator::begin`] checks the guard, snapshots the
//!    ingredient list and returns a [`PendingRecipe`].
//! 2. [`PendingRecipe::dispatch`] performs the inference call. It owns
//!    everything it needs and can run on a spawned task.
//! 3. [`RecipeOrchestrator::complete`] records the outcome.

use crate::error::CoreError;
use crate::history::RecipeHistory;
use crate::ingredients::IngredientStore;
use chrono::Utc;
use log::{debug, info, warn};
use pantry_rs_config::{DEFAULT_MIN_INGREDIENTS, GenerationConfig};
use pantry_rs_inference::{InferenceClient, InferenceError, display_text};
use pantry_rs_protocol::{
    EventMsg, EventPayload, EventSink, HistoryEntry, OutcomeKind, PromptVariant, RequestId,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use uuid::Uuid;

/// Where the orchestrator is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// No request issued yet.
    Idle,
    /// A request is outstanding.
    Loading { request_id: RequestId },
    /// The last request resolved and its text is current.
    Shown,
}

/// A request that passed the guard and awaits dispatch.
#[derive(Debug, Clone)]
pub struct PendingRecipe {
    request_id: RequestId,
    ingredients: Vec<String>,
    variant: PromptVariant,
}

impl PendingRecipe {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Ingredient list as it stood when the request was issued.
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn variant(&self) -> PromptVariant {
        self.variant
    }

    /// Items sent to the inference client: the snapshot followed by the
    /// variant instruction.
    pub fn payload(&self) -> Vec<String> {
        let mut payload = self.ingredients.clone();
        payload.push(self.variant.instruction().to_string());
        payload
    }

    /// Run the inference call. Failures are carried in the result.
    pub async fn dispatch(self, client: &dyn InferenceClient) -> CompletedRecipe {
        let result = client.request_recipe(&self.payload()).await;
        if let Err(err) = &result {
            warn!(
                "recipe request resolved without recipe (request_id={}, error={err})",
                self.request_id
            );
        }
        CompletedRecipe {
            request_id: self.request_id,
            ingredients: self.ingredients,
            result,
        }
    }
}

/// A resolved request, ready to be recorded.
#[derive(Debug, Clone)]
pub struct CompletedRecipe {
    request_id: RequestId,
    ingredients: Vec<String>,
    result: Result<String, InferenceError>,
}

impl CompletedRecipe {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn result(&self) -> &Result<String, InferenceError> {
        &self.result
    }

    pub fn outcome(&self) -> OutcomeKind {
        match &self.result {
            Ok(_) => OutcomeKind::Generated,
            Err(InferenceError::NoContent) => OutcomeKind::NoContent,
            Err(_) => OutcomeKind::Failed,
        }
    }
}

/// Serialized recipe-request state machine.
pub struct RecipeOrchestrator {
    min_ingredients: usize,
    phase: GenerationPhase,
    current_recipe: Option<String>,
    history: RecipeHistory,
    rng: StdRng,
    events: Option<Arc<dyn EventSink>>,
}

impl Default for RecipeOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INGREDIENTS)
    }
}

impl RecipeOrchestrator {
    /// Create an orchestrator requiring `min_ingredients` before a request.
    pub fn new(min_ingredients: usize) -> Self {
        Self {
            min_ingredients,
            phase: GenerationPhase::Idle,
            current_recipe: None,
            history: RecipeHistory::new(),
            rng: StdRng::from_os_rng(),
            events: None,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.min_ingredients)
    }

    /// Replace the variant selection RNG.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Publish request lifecycle events to `sink`.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn min_ingredients(&self) -> usize {
        self.min_ingredients
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, GenerationPhase::Loading { .. })
    }

    /// Text of the last resolved request; `None` while loading.
    pub fn current_recipe(&self) -> Option<&str> {
        self.current_recipe.as_deref()
    }

    pub fn history(&self) -> &RecipeHistory {
        &self.history
    }

    /// Whether a request may be issued for `store` right now.
    pub fn can_generate(&self, store: &IngredientStore) -> bool {
        store.len() >= self.min_ingredients && !self.is_loading()
    }

    /// Issue a request for the current contents of `store`.
    ///
    /// Returns `None` without any state change when the guard fails.
    pub fn begin(&mut self, store: &IngredientStore) -> Option<PendingRecipe> {
        if !self.can_generate(store) {
            debug!(
                "recipe request refused (items={}, loading={})",
                store.len(),
                self.is_loading()
            );
            return None;
        }
        let index = self.rng.random_range(0..PromptVariant::ALL.len());
        let pending = PendingRecipe {
            request_id: Uuid::new_v4(),
            ingredients: store.snapshot(),
            variant: PromptVariant::ALL[index],
        };
        self.current_recipe = None;
        self.phase = GenerationPhase::Loading {
            request_id: pending.request_id,
        };
        info!(
            "recipe request started (request_id={}, items={}, variant={:?})",
            pending.request_id,
            pending.ingredients.len(),
            pending.variant
        );
        self.emit(EventPayload::GenerationStarted {
            request_id: pending.request_id,
            ingredient_count: pending.ingredients.len(),
            variant: pending.variant,
        });
        Some(pending)
    }

    /// Record a resolved request and show its text.
    pub fn complete(&mut self, completed: CompletedRecipe) -> Result<&HistoryEntry, CoreError> {
        match self.phase {
            GenerationPhase::Loading { request_id } if request_id == completed.request_id => {}
            _ => return Err(CoreError::UnknownRequest(completed.request_id)),
        }
        let outcome = completed.outcome();
        let recipe = display_text(&completed.result);
        self.current_recipe = Some(recipe.clone());
        self.phase = GenerationPhase::Shown;
        let index = self.history.push(HistoryEntry {
            id: completed.request_id,
            ingredients: completed.ingredients,
            recipe,
            outcome,
            timestamp: Utc::now(),
        });
        info!(
            "recipe request completed (request_id={}, outcome={}, history_len={})",
            completed.request_id,
            outcome.as_str(),
            self.history.len()
        );
        self.emit(EventPayload::GenerationCompleted {
            request_id: completed.request_id,
            outcome,
            history_len: self.history.len(),
        });
        Ok(&self.history.entries()[index])
    }

    /// Begin, dispatch, and complete in one call.
    pub async fn generate(
        &mut self,
        store: &IngredientStore,
        client: &dyn InferenceClient,
    ) -> Option<&HistoryEntry> {
        let pending = self.begin(store)?;
        let completed = pending.dispatch(client).await;
        self.complete(completed).ok()
    }

    fn emit(&self, payload: EventPayload) {
        if let Some(sink) = &self.events {
            sink.emit(EventMsg::new(payload));
        }
    }
}
