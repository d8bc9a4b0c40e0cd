//! Markdown to styled terminal lines.
//!
//! Covers what recipe answers actually use: headings, paragraphs, nested
//! ordered and unordered lists, emphasis, strong text, inline code, fenced
//! code blocks and rules. Other constructs fall back to their plain text.

use crate::theme::Palette;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const RULE_WIDTH: usize = 40;

/// Render Markdown `source` into lines styled with `palette`.
pub fn render_markdown(source: &str, palette: &Palette) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(palette);
    for event in Parser::new_ext(source, Options::ENABLE_STRIKETHROUGH) {
        renderer.handle(event);
    }
    renderer.finish()
}

/// List nesting entry; `Some(n)` is the next number of an ordered list.
type ListState = Option<u64>;

struct Renderer<'p> {
    palette: &'p Palette,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    lists: Vec<ListState>,
    in_code_block: bool,
}

impl<'p> Renderer<'p> {
    fn new(palette: &'p Palette) -> Self {
        Self {
            palette,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: vec![Style::default().fg(palette.text)],
            lists: Vec::new(),
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, patch: Style) {
        let style = self.style().patch(patch);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn flush(&mut self) {
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            return;
        }
        if !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        let base = Style::default().add_modifier(Modifier::BOLD);
        match level {
            HeadingLevel::H1 => base
                .fg(self.palette.primary)
                .add_modifier(Modifier::UNDERLINED),
            HeadingLevel::H2 => base.fg(self.palette.primary),
            _ => base.fg(self.palette.secondary),
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                let style = self.style().fg(self.palette.code);
                self.spans.push(Span::styled(code.into_string(), style));
            }
            Event::SoftBreak => self.spans.push(Span::styled(" ", self.style())),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.blank();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(RULE_WIDTH),
                    Style::default().fg(self.palette.border),
                )));
                self.blank();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.spans.push(Span::styled(marker, self.style()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.blank();
                let style = self.heading_style(level);
                self.push_style(style);
            }
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.flush();
                }
            }
            Tag::List(start) => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let marker = format!("{number}. ");
                        *number += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.spans.push(Span::raw("  ".repeat(depth + 1)));
                self.spans.push(Span::styled(
                    marker,
                    Style::default().fg(self.palette.secondary),
                ));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.blank();
                if let CodeBlockKind::Fenced(lang) = kind
                    && !lang.is_empty()
                {
                    self.lines.push(Line::from(Span::styled(
                        format!("  {lang}"),
                        Style::default().fg(self.palette.muted),
                    )));
                }
                self.in_code_block = true;
                self.push_style(Style::default().fg(self.palette.code));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.blank();
            }
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::CodeBlock => {
                self.flush();
                self.in_code_block = false;
                self.pop_style();
                self.blank();
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            let style = self.style();
            for line in text.lines() {
                self.lines
                    .push(Line::from(Span::styled(format!("    {line}"), style)));
            }
            return;
        }
        self.spans.push(Span::styled(text.to_string(), self.style()));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

/// Concatenated text of a rendered line.
#[cfg(test)]
pub(crate) fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeMode;
    use pretty_assertions::assert_eq;

    fn render(source: &str) -> Vec<String> {
        render_markdown(source, &ThemeMode::Light.palette())
            .iter()
            .map(line_text)
            .collect()
    }

    #[test]
    fn renders_headings_and_lists() {
        let lines = render("## Pancakes\n- mix\n- fry\n\n1. serve\n2. eat\n");
        assert_eq!(
            lines,
            vec![
                "Pancakes",
                "",
                "  • mix",
                "  • fry",
                "",
                "  1. serve",
                "  2. eat",
            ]
        );
    }

    #[test]
    fn ordered_lists_keep_their_start_number() {
        let lines = render("3. third\n4. fourth\n");
        assert_eq!(lines, vec!["  3. third", "  4. fourth"]);
    }

    #[test]
    fn nested_lists_are_indented() {
        let lines = render("- dough\n  - flour\n  - water\n- sauce\n");
        assert_eq!(
            lines,
            vec!["  • dough", "    • flour", "    • water", "  • sauce"]
        );
    }

    #[test]
    fn emphasis_is_styled_inline() {
        let rendered = render_markdown("Use **fresh** *basil*.", &ThemeMode::Dark.palette());
        assert_eq!(rendered.len(), 1);
        let bold = rendered[0]
            .spans
            .iter()
            .find(|span| span.content == "fresh")
            .expect("bold span");
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
        let italic = rendered[0]
            .spans
            .iter()
            .find(|span| span.content == "basil")
            .expect("italic span");
        assert!(italic.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        let lines = render("First step.\n\nSecond step.");
        assert_eq!(lines, vec!["First step.", "", "Second step."]);
    }

    #[test]
    fn code_blocks_keep_their_lines() {
        let lines = render("```\nbake 20m\nrest 5m\n```\n");
        assert_eq!(lines, vec!["    bake 20m", "    rest 5m"]);
    }

    #[test]
    fn plain_fallback_text_renders_as_is() {
        assert_eq!(
            render("Error fetching recipe."),
            vec!["Error fetching recipe."]
        );
    }
}
