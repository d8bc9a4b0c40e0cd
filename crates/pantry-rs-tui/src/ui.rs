//! Rendering routines for the Pantry TUI.

use crate::app::{App, Focus, InputMode, ViewerKind};
use crate::markdown::render_markdown;
use crate::theme::Palette;
use chrono::Local;
use pantry_rs_core::{MAX_STARS, RecipeHistory};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

const HEADER_HEIGHT: u16 = 3;
const HINT_HEIGHT: u16 = 3;
const TIPS_HEIGHT: u16 = 6;
const INGREDIENT_COLUMN_PERCENT: u16 = 38;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const RECIPE_TITLE: &str = " Chef Mistral's Recipe Idea ";
const EMPTY_HISTORY: &str = " No recipes in history yet. Generate a recipe to start!";
const INPUT_PLACEHOLDER: &str = "e.g. oregano";

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let palette = app.theme.palette();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    if app.viewer.is_some() {
        let root = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // header bar
                Constraint::Min(0),                // viewer content
                Constraint::Length(3),             // footer
                Constraint::Length(1),             // status bar
            ])
            .split(area);

        draw_header(frame, app, &palette, root[0]);
        draw_viewer(frame, app, &palette, root[1]);
        draw_viewer_footer(frame, &palette, root[2]);
        draw_status_bar(frame, app, &palette, root[3]);
    } else {
        let root = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT), // header bar
                Constraint::Min(0),                // panels
                Constraint::Length(3),             // input
                Constraint::Length(1),             // status bar
            ])
            .split(area);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(INGREDIENT_COLUMN_PERCENT),
                Constraint::Min(0),
            ])
            .split(root[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(HINT_HEIGHT),
                Constraint::Length(TIPS_HEIGHT),
            ])
            .split(body[0]);

        draw_header(frame, app, &palette, root[0]);
        draw_ingredients(frame, app, &palette, left[0]);
        draw_guard_hint(frame, app, &palette, left[1]);
        draw_tips(frame, app.orchestrator.min_ingredients(), &palette, left[2]);
        draw_recipe(frame, app, &palette, body[1]);
        draw_input(frame, app, &palette, root[2]);
        draw_status_bar(frame, app, &palette, root[3]);
    }
}

fn panel<'a>(title: &'a str, palette: &Palette, active: bool) -> Block<'a> {
    let (border, title_color) = if active {
        (palette.border_active, palette.secondary)
    } else {
        (palette.border, palette.muted)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(title_color)))
}

fn draw_header(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_style = Style::default().fg(palette.muted);
    let value_style = Style::default().fg(palette.text);
    let line = Line::from(vec![
        Span::styled(
            " Pantry",
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" v{VERSION}"), label_style),
        Span::styled("  model ", label_style),
        Span::styled(app.model.as_str(), value_style),
        Span::styled("  ingredients ", label_style),
        Span::styled(app.ingredients.len().to_string(), value_style),
        Span::styled("  recipes ", label_style),
        Span::styled(app.orchestrator.history().len().to_string(), value_style),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_ingredients(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let active = app.focus == Focus::Ingredients;
    let block = panel(" Ingredients ", palette, active);

    let mut lines = Vec::new();
    if app.ingredients.is_empty() {
        lines.push(Line::from(Span::styled(
            " No ingredients yet.",
            Style::default().fg(palette.muted),
        )));
    }
    let editing = match app.mode {
        InputMode::Edit { index } => Some(index),
        _ => None,
    };
    for (idx, item) in app.ingredients.iter().enumerate() {
        let is_selected = idx == app.selected;
        let marker = if editing == Some(idx) {
            "✎"
        } else if is_selected {
            ">"
        } else {
            " "
        };
        let style = if is_selected {
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(item.to_string(), style),
        ]));
    }

    // Keep the selection in view.
    let height = block.inner(area).height as usize;
    let offset = (app.selected + 1).saturating_sub(height) as u16;
    let paragraph = Paragraph::new(lines).block(block).scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

/// Text of the hint under the ingredient list.
pub(crate) fn guard_hint(app: &App) -> String {
    let min = app.orchestrator.min_ingredients();
    if app.orchestrator.is_loading() {
        "Cooking...".to_string()
    } else if app.ingredients.len() < min {
        format!("At least {min} ingredients required")
    } else {
        "Ready to cook something yummy?".to_string()
    }
}

fn draw_guard_hint(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let color = if app.can_generate() {
        palette.success
    } else {
        palette.warning
    };
    let mut spans = vec![Span::styled(
        format!(" {}", guard_hint(app)),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )];
    if app.can_generate() {
        spans.push(Span::styled(
            "  Ctrl+R",
            Style::default().fg(palette.muted),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(panel(" Cook ", palette, false));
    frame.render_widget(paragraph, area);
}

fn draw_tips(frame: &mut Frame<'_>, min_ingredients: usize, palette: &Palette, area: Rect) {
    let tip = Style::default().fg(palette.muted);
    let lines = vec![
        Line::from(Span::styled(" Press Enter to add ingredient", tip)),
        Line::from(Span::styled(
            format!(" Press Ctrl+R for recipe ({min_ingredients}+ items)"),
            tip,
        )),
        Line::from(Span::styled(" Ctrl+E edit  Ctrl+D delete  Ctrl+X clear", tip)),
        Line::from(Span::styled(" Ctrl+S save  Ctrl+O load", tip)),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(" Tips ", palette, false));
    frame.render_widget(paragraph, area);
}

/// Star line for the rating widget.
pub(crate) fn rating_line(stars: u8, palette: &Palette) -> Line<'static> {
    let mut spans = vec![Span::styled(
        "Rate this recipe: ",
        Style::default().fg(palette.muted),
    )];
    for star in 1..=MAX_STARS {
        let color = if star <= stars {
            palette.star
        } else {
            palette.border
        };
        spans.push(Span::styled("★", Style::default().fg(color)));
    }
    spans.push(Span::styled(
        "  Alt+1..5",
        Style::default().fg(palette.muted),
    ));
    Line::from(spans)
}

fn recipe_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    if app.orchestrator.is_loading() {
        return vec![Line::from(Span::styled(
            "Cooking up something tasty...",
            Style::default()
                .fg(palette.secondary)
                .add_modifier(Modifier::ITALIC),
        ))];
    }
    let Some(recipe) = app.orchestrator.current_recipe() else {
        return vec![Line::from(Span::styled(
            "Add a few ingredients and ask the chef for an idea.",
            Style::default().fg(palette.muted),
        ))];
    };
    let mut lines = render_markdown(recipe, palette);
    lines.push(Line::default());
    lines.push(rating_line(app.rating.stars(), palette));
    lines
}

fn draw_recipe(frame: &mut Frame<'_>, app: &mut App, palette: &Palette, area: Rect) {
    let lines = recipe_lines(app, palette);
    let block = panel(RECIPE_TITLE, palette, app.focus == Focus::Recipe);
    draw_scrolled(frame, lines, block, palette, area, |max| {
        app.update_scroll_bounds(max);
        app.recipe_scroll
    });
}

/// Render `lines` inside `block` with a scrollbar when they overflow.
///
/// `bounds` receives the maximum scroll offset and returns the offset to use.
fn draw_scrolled(
    frame: &mut Frame<'_>,
    lines: Vec<Line<'static>>,
    block: Block<'_>,
    palette: &Palette,
    area: Rect,
    bounds: impl FnOnce(u16) -> u16,
) {
    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1); // -1 for scrollbar
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);
    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    let scroll = bounds(max_scroll);

    let content_area = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(paragraph, content_area);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(palette.border))
                .thumb_style(Style::default().fg(palette.muted)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

fn draw_input(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let title = match app.mode {
        InputMode::Add => " Add Ingredient ",
        InputMode::Edit { .. } => " Edit Ingredient (Enter save, Esc cancel) ",
        InputMode::ConfirmClear => " Clear All Ingredients ",
    };
    let block = panel(title, palette, app.focus == Focus::Ingredients);
    let inner = block.inner(area);

    let prompt_style = Style::default()
        .fg(palette.primary)
        .add_modifier(Modifier::BOLD);
    let line = match app.mode {
        InputMode::ConfirmClear => Line::from(vec![
            Span::styled(" Are you sure? ", prompt_style),
            Span::styled("(y/n)", Style::default().fg(palette.muted)),
        ]),
        _ if app.input.is_empty() => Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(palette.muted)),
        ]),
        _ => Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(app.input.clone(), Style::default().fg(palette.text)),
        ]),
    };

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), inner);

    if app.mode != InputMode::ConfirmClear {
        let width = app.input.chars().count() as u16;
        frame.set_cursor_position((inner.x + 1 + width, inner.y));
    }
}

fn draw_status_bar(frame: &mut Frame<'_>, app: &App, palette: &Palette, area: Rect) {
    let key = Style::default().fg(palette.muted);
    let desc = Style::default().fg(palette.border);
    let shortcuts = vec![
        Span::styled(" Ctrl+C", key),
        Span::styled(" quit", desc),
        Span::styled("  Ctrl+H", key),
        Span::styled(" history", desc),
        Span::styled("  Ctrl+T", key),
        Span::styled(format!(" {}", app.theme.toggle_label()), desc),
        Span::styled("  Tab", key),
        Span::styled(" focus", desc),
        Span::styled("  PgUp/PgDn", key),
        Span::styled(" scroll", desc),
    ];

    let (right_text, right_style) = match &app.ack {
        Some(ack) => (
            format!(" ✓ {} ", ack.message),
            Style::default()
                .fg(palette.success)
                .add_modifier(Modifier::BOLD),
        ),
        None => {
            let color = if app.orchestrator.is_loading() {
                palette.primary
            } else if app.status == "idle" {
                palette.muted
            } else {
                palette.warning
            };
            (format!(" {} ", app.status), Style::default().fg(color))
        }
    };

    let right_len = right_text.chars().count() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len.min(area.width),
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(right_text, right_style))),
        right_area,
    );
}

fn draw_viewer(frame: &mut Frame<'_>, app: &mut App, palette: &Palette, area: Rect) {
    let Some(kind) = app.viewer else {
        return;
    };
    let (title, lines) = match kind {
        ViewerKind::History => (
            " Recipe History ",
            render_history_lines(app.orchestrator.history(), palette),
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        ));
    draw_scrolled(frame, lines, block, palette, area, |max| {
        app.update_viewer_scroll_bounds(max);
        app.viewer_scroll
    });
}

fn draw_viewer_footer(frame: &mut Frame<'_>, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(" Actions ", Style::default().fg(palette.muted)));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        " Up/Down/PgUp/PgDn to scroll  Esc to close",
        Style::default().fg(palette.muted),
    )))
    .block(block);

    frame.render_widget(paragraph, area);
}

/// Lines of the history viewer, oldest entry first.
pub(crate) fn render_history_lines(history: &RecipeHistory, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if history.is_empty() {
        lines.push(Line::from(Span::styled(
            EMPTY_HISTORY,
            Style::default().fg(palette.muted),
        )));
        return lines;
    }

    for (idx, entry) in history.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(Span::styled(
                " ─".to_string() + &"─".repeat(50),
                Style::default().fg(palette.border),
            )));
        }
        let timestamp = entry
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        lines.push(Line::from(Span::styled(
            format!(" Recipe from {timestamp}"),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled(
                " Ingredients Used: ",
                Style::default()
                    .fg(palette.muted)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(entry.ingredients.join(", "), Style::default().fg(palette.text)),
        ]));
        lines.push(Line::default());
        lines.extend(render_markdown(&entry.recipe, palette));
        lines.push(Line::default());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::line_text;
    use crate::theme::ThemeMode;
    use chrono::Utc;
    use pantry_rs_core::RecipeOrchestrator;
    use pantry_rs_protocol::{HistoryEntry, OutcomeKind};
    use pantry_rs_storage::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn entry(ingredients: &[&str], recipe: &str) -> HistoryEntry {
        HistoryEntry {
            id: Default::default(),
            ingredients: ingredients.iter().map(|item| item.to_string()).collect(),
            recipe: recipe.to_string(),
            outcome: OutcomeKind::Generated,
            timestamp: Utc::now(),
        }
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    fn app() -> App {
        App::new(
            Arc::new(MemoryKeyValueStore::new()),
            RecipeOrchestrator::default(),
        )
    }

    #[test]
    fn guard_hint_follows_ingredient_count() {
        let mut app = app();
        for item in ["egg", "flour", "milk"] {
            app.ingredients.add(item);
            assert_eq!(guard_hint(&app), "At least 4 ingredients required");
        }
        app.ingredients.add("sugar");
        assert_eq!(guard_hint(&app), "Ready to cook something yummy?");
    }

    #[test]
    fn empty_history_shows_hint() {
        let palette = ThemeMode::Light.palette();
        let lines = render_history_lines(&RecipeHistory::new(), &palette);
        assert_eq!(texts(&lines), vec![EMPTY_HISTORY]);
    }

    #[test]
    fn history_entries_show_ingredients_and_recipe() {
        let palette = ThemeMode::Dark.palette();
        let mut history = RecipeHistory::new();
        history.push(entry(&["egg", "flour", "milk", "sugar"], "## Pancakes"));
        let lines = texts(&render_history_lines(&history, &palette));

        assert!(lines[0].starts_with(" Recipe from "));
        assert_eq!(lines[1], " Ingredients Used: egg, flour, milk, sugar");
        assert!(lines.contains(&"Pancakes".to_string()));
    }

    #[test]
    fn rating_line_has_five_stars() {
        let palette = ThemeMode::Light.palette();
        let line = rating_line(3, &palette);
        let text = line_text(&line);
        assert_eq!(text.matches('★').count(), 5);
        let lit = line
            .spans
            .iter()
            .filter(|span| span.content == "★" && span.style.fg == Some(palette.star))
            .count();
        assert_eq!(lit, 3);
    }
}
