//! TUI event types for input and orchestration messages.

use crossterm::event::KeyEvent;
use pantry_rs_core::CompletedRecipe;
use pantry_rs_protocol::EventMsg;

/// Application event emitted by input handlers or background tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// Lifecycle event published by the orchestrator.
    Orchestrator(EventMsg),
    /// A dispatched recipe request resolved.
    RecipeReady(CompletedRecipe),
    /// Scroll event in the focused panel.
    Scroll(i16),
}
