//! Library entry point for the Pantry TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui terminal UI
//! against a pre-configured inference client and key-value store.

mod app;
mod event;
mod event_bus;
mod markdown;
mod theme;
mod ui;

pub use event_bus::EventBus;
pub use markdown::render_markdown;
pub use theme::{Palette, ThemeMode};

use anyhow::anyhow;
use app::{App, Focus, InputMode, ViewerKind};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info, warn};
use pantry_rs_config::DEFAULT_MIN_INGREDIENTS;
use pantry_rs_core::{PendingRecipe, RecipeOrchestrator};
use pantry_rs_inference::InferenceClient;
use pantry_rs_protocol::EventMsg;
use pantry_rs_storage::KeyValueStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

const EVENT_BUS_BUFFER: usize = 64;

/// Configuration for the Pantry TUI session.
#[derive(Debug, Clone)]
pub struct TuiConfig {
    /// Display label for the active model (shown in header).
    pub model_name: String,
    /// Ingredients required before a recipe can be requested.
    pub min_ingredients: usize,
    /// Restore the saved ingredient list on startup.
    pub load_on_start: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            model_name: String::new(),
            min_ingredients: DEFAULT_MIN_INGREDIENTS,
            load_on_start: false,
        }
    }
}

/// Launch the Pantry TUI.
///
/// The caller is responsible for initializing logging (e.g. `env_logger`)
/// before calling `run`.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(
    client: Arc<dyn InferenceClient>,
    storage: Arc<dyn KeyValueStore>,
    config: TuiConfig,
) -> anyhow::Result<()> {
    let events = EventBus::new(EVENT_BUS_BUFFER);
    let orchestrator = RecipeOrchestrator::new(config.min_ingredients)
        .with_event_sink(Arc::new(events.clone()));

    let mut app = App::new(storage, orchestrator);
    app.model = config.model_name.clone();
    if config.load_on_start {
        app.load(Instant::now());
    }

    info!(
        "starting tui (model={}, min_ingredients={})",
        app.model, config.min_ingredients
    );

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());
    spawn_event_forwarder(events.subscribe(), tx.clone());

    let result: anyhow::Result<()> = loop {
        if let Err(err) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(err.into());
        }
        let Some(event) = rx.recv().await else {
            break Err(anyhow!("event channel closed unexpectedly"));
        };
        if handle_app_event(event, &client, &mut app, tx.clone()) {
            break Ok(());
        }
    };

    restore_terminal(&mut terminal)?;
    result
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(
    event: AppEvent,
    client: &Arc<dyn InferenceClient>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> bool {
    match event {
        AppEvent::Input(key) => handle_input(key, client, app, sender),
        AppEvent::Orchestrator(event) => {
            app.apply_event(event);
            false
        }
        AppEvent::RecipeReady(completed) => {
            app.finish_generation(completed);
            false
        }
        AppEvent::Scroll(delta) => {
            scroll(app, delta);
            false
        }
        AppEvent::Tick => {
            app.tick(Instant::now());
            false
        }
    }
}

fn scroll(app: &mut App, delta: i16) {
    let lines = delta.unsigned_abs();
    match (app.viewer.is_some(), delta < 0) {
        (true, true) => app.viewer_scroll_up(lines),
        (true, false) => app.viewer_scroll_down(lines),
        (false, true) => app.scroll_up(lines),
        (false, false) => app.scroll_down(lines),
    }
}

/// Handle keyboard input and dispatch actions.
fn handle_input(
    key: KeyEvent,
    client: &Arc<dyn InferenceClient>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if key.code == KeyCode::Esc {
        if app.viewer.is_some() {
            app.close_viewer();
            return false;
        }
        match app.mode {
            InputMode::Edit { .. } => {
                app.cancel_edit();
                return false;
            }
            InputMode::ConfirmClear => {
                app.confirm_clear(false, Instant::now());
                return false;
            }
            InputMode::Add => return true,
        }
    }

    if app.viewer.is_some() {
        handle_viewer_input(key, app);
        return false;
    }

    if app.mode == InputMode::ConfirmClear {
        handle_confirm_input(key, app);
        return false;
    }

    handle_default_input(key, client, app, sender);
    false
}

/// Handle keyboard input while a viewer panel is open.
fn handle_viewer_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up => app.viewer_scroll_up(1),
        KeyCode::Down => app.viewer_scroll_down(1),
        KeyCode::PageUp => app.viewer_scroll_up(5),
        KeyCode::PageDown => app.viewer_scroll_down(5),
        KeyCode::Home => app.viewer_scroll_up(u16::MAX),
        KeyCode::End => app.viewer_scroll_down(u16::MAX),
        KeyCode::Char('h') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.close_viewer();
        }
        _ => {}
    }
}

/// Handle the yes/no answer of the clear confirmation.
fn handle_confirm_input(key: KeyEvent, app: &mut App) {
    let now = Instant::now();
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear(true, now),
        KeyCode::Char('n') | KeyCode::Char('N') => app.confirm_clear(false, now),
        _ => {}
    }
}

/// Star count selected by `key`, if it is a rating key.
fn rating_key(key: &KeyEvent) -> Option<u8> {
    match key.code {
        KeyCode::F(n @ 1..=5) => Some(n),
        KeyCode::Char(ch @ '1'..='5') if key.modifiers.contains(KeyModifiers::ALT) => {
            ch.to_digit(10).and_then(|digit| u8::try_from(digit).ok())
        }
        _ => None,
    }
}

/// Handle keyboard input in the default (non-viewer) state.
fn handle_default_input(
    key: KeyEvent,
    client: &Arc<dyn InferenceClient>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) {
    if let Some(stars) = rating_key(&key) {
        app.rate(stars);
        return;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let now = Instant::now();
    match key.code {
        KeyCode::Char('r') if ctrl => {
            if let Some(pending) = app.begin_generation() {
                spawn_generation(client.clone(), pending, sender);
            }
        }
        KeyCode::Char('e') if ctrl => app.start_edit(),
        KeyCode::Char('d') if ctrl => app.delete_selected(),
        KeyCode::Char('x') if ctrl => app.request_clear(),
        KeyCode::Char('s') if ctrl => app.save(now),
        KeyCode::Char('o') if ctrl => app.load(now),
        KeyCode::Char('h') if ctrl => app.open_viewer(ViewerKind::History),
        KeyCode::Char('t') if ctrl => app.toggle_theme(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Up => match app.focus {
            Focus::Ingredients => app.select_up(),
            Focus::Recipe => app.scroll_up(1),
        },
        KeyCode::Down => match app.focus {
            Focus::Ingredients => app.select_down(),
            Focus::Recipe => app.scroll_down(1),
        },
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Enter => {
            app.submit_input();
            app.focus = Focus::Ingredients;
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) => {
            if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) {
                app.input.push(ch);
            }
        }
        _ => {}
    }
}

/// Spawn a task that runs a recipe request and posts its completion.
fn spawn_generation(
    client: Arc<dyn InferenceClient>,
    pending: PendingRecipe,
    sender: mpsc::Sender<AppEvent>,
) {
    let request_id = pending.request_id();
    tokio::spawn(async move {
        debug!("dispatching recipe request (request_id={request_id})");
        let completed = pending.dispatch(client.as_ref()).await;
        if sender.send(AppEvent::RecipeReady(completed)).await.is_err() {
            warn!("dropping recipe completion after shutdown (request_id={request_id})");
        }
    });
}

/// Spawn a task forwarding orchestrator events into the UI loop.
fn spawn_event_forwarder(
    mut receiver: broadcast::Receiver<EventMsg>,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if sender.send(AppEvent::Orchestrator(event)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("event forwarder lagged (skipped={skipped})");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event {
                        CrosstermEvent::Key(key) => {
                            let _ = sender.send(AppEvent::Input(key)).await;
                        }
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => {
                                let _ = sender.send(AppEvent::Scroll(-MOUSE_SCROLL_LINES)).await;
                            }
                            MouseEventKind::ScrollDown => {
                                let _ = sender.send(AppEvent::Scroll(MOUSE_SCROLL_LINES)).await;
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            let _ = sender.send(AppEvent::Tick).await;
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use pantry_rs_storage::MemoryKeyValueStore;
    use pantry_rs_test_utils::FixedInference;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    type Harness = (
        Arc<dyn InferenceClient>,
        App,
        mpsc::Sender<AppEvent>,
        mpsc::Receiver<AppEvent>,
    );

    fn setup() -> Harness {
        let client: Arc<dyn InferenceClient> = Arc::new(FixedInference::new("## Pancakes"));
        let app = App::new(
            Arc::new(MemoryKeyValueStore::new()),
            RecipeOrchestrator::default(),
        );
        let (tx, rx) = mpsc::channel(16);
        (client, app, tx, rx)
    }

    fn type_line(
        client: &Arc<dyn InferenceClient>,
        app: &mut App,
        tx: &mpsc::Sender<AppEvent>,
        text: &str,
    ) {
        for ch in text.chars() {
            handle_input(key(KeyCode::Char(ch)), client, app, tx.clone());
        }
        handle_input(key(KeyCode::Enter), client, app, tx.clone());
    }

    #[test]
    fn rating_keys_cover_alt_digits_and_function_keys() {
        assert_eq!(rating_key(&key(KeyCode::F(3))), Some(3));
        assert_eq!(rating_key(&key(KeyCode::F(6))), None);
        assert_eq!(
            rating_key(&KeyEvent::new(KeyCode::Char('5'), KeyModifiers::ALT)),
            Some(5)
        );
        assert_eq!(rating_key(&key(KeyCode::Char('5'))), None);
    }

    #[test]
    fn esc_cancels_before_quitting() {
        let (client, mut app, tx, _rx) = setup();
        type_line(&client, &mut app, &tx, "egg");
        handle_input(ctrl('e'), &client, &mut app, tx.clone());
        assert!(!handle_input(key(KeyCode::Esc), &client, &mut app, tx.clone()));
        assert_eq!(app.mode, InputMode::Add);

        handle_input(ctrl('h'), &client, &mut app, tx.clone());
        assert!(!handle_input(key(KeyCode::Esc), &client, &mut app, tx.clone()));
        assert!(app.viewer.is_none());

        assert!(handle_input(key(KeyCode::Esc), &client, &mut app, tx.clone()));
    }

    #[test]
    fn clear_confirmation_swallows_other_keys() {
        let (client, mut app, tx, _rx) = setup();
        type_line(&client, &mut app, &tx, "egg");
        handle_input(ctrl('x'), &client, &mut app, tx.clone());
        handle_input(key(KeyCode::Char('q')), &client, &mut app, tx.clone());
        assert_eq!(app.mode, InputMode::ConfirmClear);
        assert!(app.input.is_empty());

        handle_input(key(KeyCode::Char('y')), &client, &mut app, tx.clone());
        assert!(app.ingredients.is_empty());
        assert_eq!(app.mode, InputMode::Add);
    }

    #[tokio::test]
    async fn ctrl_r_spawns_one_request_and_posts_result() {
        let (client, mut app, tx, mut rx) = setup();
        for item in ["egg", "flour", "milk", "sugar"] {
            type_line(&client, &mut app, &tx, item);
        }
        handle_input(ctrl('r'), &client, &mut app, tx.clone());
        handle_input(ctrl('r'), &client, &mut app, tx.clone());
        assert!(app.orchestrator.is_loading());

        let event = rx.recv().await.expect("recipe event");
        assert!(!handle_app_event(event, &client, &mut app, tx.clone()));
        assert_eq!(app.orchestrator.current_recipe(), Some("## Pancakes"));
        assert_eq!(app.focus, Focus::Recipe);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn ctrl_r_below_minimum_does_nothing() {
        let (client, mut app, tx, _rx) = setup();
        type_line(&client, &mut app, &tx, "egg");
        handle_input(ctrl('r'), &client, &mut app, tx.clone());
        assert!(!app.orchestrator.is_loading());
    }

    #[test]
    fn list_shortcuts_wait_for_an_open_edit() {
        let (client, mut app, tx, _rx) = setup();
        for item in ["egg", "flour", "milk"] {
            type_line(&client, &mut app, &tx, item);
        }
        handle_input(key(KeyCode::Up), &client, &mut app, tx.clone());
        handle_input(ctrl('e'), &client, &mut app, tx.clone());
        assert_eq!(app.input, "flour");

        handle_input(key(KeyCode::Up), &client, &mut app, tx.clone());
        handle_input(ctrl('d'), &client, &mut app, tx.clone());
        handle_input(ctrl('o'), &client, &mut app, tx.clone());
        handle_input(ctrl('x'), &client, &mut app, tx.clone());
        assert_eq!(app.mode, InputMode::Edit { index: 1 });
        assert_eq!(app.ingredients.as_slice(), ["egg", "flour", "milk"]);

        for _ in 0.."flour".len() {
            handle_input(key(KeyCode::Backspace), &client, &mut app, tx.clone());
        }
        type_line(&client, &mut app, &tx, "rye flour");
        assert_eq!(app.ingredients.as_slice(), ["egg", "rye flour", "milk"]);
        assert_eq!(app.mode, InputMode::Add);
    }

    #[test]
    fn control_characters_are_not_typed() {
        let (client, mut app, tx, _rx) = setup();
        handle_input(ctrl('t'), &client, &mut app, tx.clone());
        assert!(app.input.is_empty());
        assert_eq!(app.theme, ThemeMode::Dark);
    }
}
