//! Application state for the Pantry TUI.

use crate::theme::ThemeMode;
use log::{debug, info, warn};
use pantry_rs_core::{
    CompletedRecipe, IngredientStore, PendingRecipe, RatingWidget, RecipeOrchestrator,
    RecipeRatings,
};
use pantry_rs_protocol::{EventMsg, EventPayload};
use pantry_rs_storage::KeyValueStore;
use std::cmp::min;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long save/load/clear acknowledgements stay visible.
pub const ACK_DURATION: Duration = Duration::from_secs(2);

/// What the input box is currently used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing a new ingredient.
    Add,
    /// Editing the ingredient at `index`.
    Edit { index: usize },
    /// Waiting for a yes/no answer before clearing the list.
    ConfirmClear,
}

/// Panel receiving scroll input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Ingredients,
    Recipe,
}

/// Viewer overlay types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    History,
}

/// Transient acknowledgement shown next to the status line.
#[derive(Debug, Clone)]
pub struct Ack {
    pub message: String,
    pub expires: Instant,
}

/// Top-level application state for the TUI.
pub struct App {
    /// Current ingredient list.
    pub ingredients: IngredientStore,
    /// Recipe request state machine and session history.
    pub orchestrator: RecipeOrchestrator,
    /// Rating control under the shown recipe.
    pub rating: RatingWidget,
    /// Current input buffer.
    pub input: String,
    /// What Enter does with the input buffer.
    pub mode: InputMode,
    /// Index of the selected ingredient.
    pub selected: usize,
    /// Panel that receives scroll keys.
    pub focus: Focus,
    /// Active color scheme.
    pub theme: ThemeMode,
    /// Status line text.
    pub status: String,
    /// Pending acknowledgement, if any.
    pub ack: Option<Ack>,
    /// Current viewer mode, if any.
    pub viewer: Option<ViewerKind>,
    /// Current viewer scroll offset.
    pub viewer_scroll: u16,
    /// Maximum viewer scroll offset.
    pub viewer_max_scroll: u16,
    /// Current recipe scroll offset.
    pub recipe_scroll: u16,
    /// Maximum recipe scroll offset.
    pub recipe_max_scroll: u16,
    /// Model label shown in the header.
    pub model: String,
    ratings: RecipeRatings,
    storage: Arc<dyn KeyValueStore>,
}

impl App {
    /// Create application state over `storage`.
    pub fn new(storage: Arc<dyn KeyValueStore>, orchestrator: RecipeOrchestrator) -> Self {
        Self {
            ingredients: IngredientStore::new(),
            orchestrator,
            rating: RatingWidget::new(),
            input: String::new(),
            mode: InputMode::Add,
            selected: 0,
            focus: Focus::Ingredients,
            theme: ThemeMode::default(),
            status: "idle".to_string(),
            ack: None,
            viewer: None,
            viewer_scroll: 0,
            viewer_max_scroll: 0,
            recipe_scroll: 0,
            recipe_max_scroll: 0,
            model: String::new(),
            ratings: RecipeRatings::new(storage.clone()),
            storage,
        }
    }

    /// Update the status line text.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Show `message` as an acknowledgement until [`ACK_DURATION`] elapses.
    pub fn acknowledge(&mut self, message: impl Into<String>, now: Instant) {
        self.ack = Some(Ack {
            message: message.into(),
            expires: now + ACK_DURATION,
        });
    }

    /// Drop expired acknowledgements.
    pub fn tick(&mut self, now: Instant) {
        if self.ack.as_ref().is_some_and(|ack| now >= ack.expires) {
            self.ack = None;
        }
    }

    /// Whether the recipe guard currently passes.
    pub fn can_generate(&self) -> bool {
        self.orchestrator.can_generate(&self.ingredients)
    }

    /// Handle Enter in the input box.
    pub fn submit_input(&mut self) {
        match self.mode {
            InputMode::Add => self.add_from_input(),
            InputMode::Edit { .. } => self.commit_edit(),
            InputMode::ConfirmClear => {}
        }
    }

    /// Add the input buffer as an ingredient.
    pub fn add_from_input(&mut self) {
        if self.ingredients.add(&self.input) {
            debug!("added ingredient (count={})", self.ingredients.len());
            self.selected = self.ingredients.len() - 1;
        }
        self.input.clear();
    }

    /// Load the selected ingredient into the input box for editing.
    pub fn start_edit(&mut self) {
        let Some(item) = self.ingredients.get(self.selected) else {
            return;
        };
        self.input = item.to_string();
        self.mode = InputMode::Edit {
            index: self.selected,
        };
    }

    /// Apply the input buffer to the entry being edited.
    pub fn commit_edit(&mut self) {
        let InputMode::Edit { index } = self.mode else {
            return;
        };
        if !self.ingredients.edit(index, &self.input) {
            debug!("ingredient edit not applied (index={index})");
        }
        self.input.clear();
        self.mode = InputMode::Add;
        self.clamp_selection();
    }

    pub fn cancel_edit(&mut self) {
        self.input.clear();
        self.mode = InputMode::Add;
    }

    /// Whether an edit is open; the list stays fixed until it resolves.
    pub fn is_editing(&self) -> bool {
        matches!(self.mode, InputMode::Edit { .. })
    }

    pub fn delete_selected(&mut self) {
        if self.is_editing() {
            return;
        }
        if self.ingredients.delete(self.selected) {
            debug!("deleted ingredient (index={})", self.selected);
            self.clamp_selection();
        }
    }

    /// First step of clearing: ask for confirmation.
    pub fn request_clear(&mut self) {
        if self.is_editing() || self.ingredients.is_empty() {
            return;
        }
        self.input.clear();
        self.mode = InputMode::ConfirmClear;
    }

    /// Second step of clearing.
    pub fn confirm_clear(&mut self, confirmed: bool, now: Instant) {
        if self.mode != InputMode::ConfirmClear {
            return;
        }
        self.mode = InputMode::Add;
        if confirmed {
            self.ingredients.clear();
            self.selected = 0;
            info!("cleared ingredients");
            self.acknowledge("Cleared", now);
        }
    }

    /// Persist the ingredient list.
    pub fn save(&mut self, now: Instant) {
        match self.ingredients.save(self.storage.as_ref()) {
            Ok(()) => self.acknowledge("Saved", now),
            Err(err) => {
                warn!("failed to save ingredients (error={err})");
                self.push_status(format!("save failed: {err}"));
            }
        }
    }

    /// Replace the ingredient list with the saved one.
    ///
    /// Acknowledged even when nothing was saved.
    pub fn load(&mut self, now: Instant) {
        if self.is_editing() {
            debug!("ignoring load while editing");
            return;
        }
        match self.ingredients.load(self.storage.as_ref()) {
            Ok(_) => {
                self.clamp_selection();
                self.acknowledge("Loaded", now);
            }
            Err(err) => {
                warn!("failed to load ingredients (error={err})");
                self.push_status(format!("load failed: {err}"));
            }
        }
    }

    /// Issue a recipe request if the guard passes.
    pub fn begin_generation(&mut self) -> Option<PendingRecipe> {
        let pending = self.orchestrator.begin(&self.ingredients)?;
        self.rating.reset();
        self.recipe_scroll = 0;
        self.push_status("cooking");
        Some(pending)
    }

    /// Record a resolved request, show it and focus the recipe panel.
    pub fn finish_generation(&mut self, completed: CompletedRecipe) {
        if let Err(err) = self.orchestrator.complete(completed) {
            warn!("dropping recipe completion (error={err})");
            return;
        }
        self.push_status("idle");
        self.focus = Focus::Recipe;
        self.recipe_scroll = 0;
        let Some(recipe) = self.orchestrator.current_recipe().map(str::to_string) else {
            return;
        };
        if let Err(err) = self.rating.show(&self.ratings, &recipe) {
            warn!("failed to read recipe rating (error={err})");
            self.push_status(format!("rating unavailable: {err}"));
        }
    }

    /// Rate the shown recipe.
    pub fn rate(&mut self, stars: u8) {
        match self.rating.select(&self.ratings, stars) {
            Ok(true) => debug!("rated recipe (stars={stars})"),
            Ok(false) => {}
            Err(err) => {
                warn!("failed to store recipe rating (error={err})");
                self.push_status(format!("rating failed: {err}"));
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!("toggled theme (theme={:?})", self.theme);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Ingredients => Focus::Recipe,
            Focus::Recipe => Focus::Ingredients,
        };
    }

    pub fn select_up(&mut self) {
        if self.is_editing() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        if !self.is_editing() && self.selected + 1 < self.ingredients.len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.ingredients.len() {
            self.selected = self.ingredients.len().saturating_sub(1);
        }
    }

    /// Apply an orchestrator lifecycle event to the status line.
    pub fn apply_event(&mut self, event: EventMsg) {
        match event.payload {
            EventPayload::GenerationStarted {
                ingredient_count, ..
            } => {
                self.push_status(format!("cooking with {ingredient_count} ingredients"));
            }
            EventPayload::GenerationCompleted {
                outcome,
                history_len,
                ..
            } => {
                self.push_status(format!("{} (history {history_len})", outcome.as_str()));
            }
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.recipe_scroll = self.recipe_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.recipe_scroll = min(
            self.recipe_scroll.saturating_add(lines),
            self.recipe_max_scroll,
        );
    }

    /// Update recipe scroll bounds after layout changes.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        self.recipe_max_scroll = max_scroll;
        self.recipe_scroll = self.recipe_scroll.min(max_scroll);
    }

    /// Open a viewer panel and reset its scroll.
    pub fn open_viewer(&mut self, kind: ViewerKind) {
        debug!("opening viewer (kind={kind:?})");
        self.viewer = Some(kind);
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    pub fn viewer_scroll_up(&mut self, lines: u16) {
        self.viewer_scroll = self.viewer_scroll.saturating_sub(lines);
    }

    pub fn viewer_scroll_down(&mut self, lines: u16) {
        self.viewer_scroll = min(
            self.viewer_scroll.saturating_add(lines),
            self.viewer_max_scroll,
        );
    }

    /// Update viewer scroll bounds after layout changes.
    pub fn update_viewer_scroll_bounds(&mut self, max_scroll: u16) {
        self.viewer_max_scroll = max_scroll;
        self.viewer_scroll = self.viewer_scroll.min(max_scroll);
    }
}
