//! Light and dark color palettes.

use ratatui::style::Color;

/// Selected color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Label of the toggle action, naming the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemeMode::Light => "dark",
            ThemeMode::Dark => "light",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            ThemeMode::Light => LIGHT,
            ThemeMode::Dark => DARK,
        }
    }
}

/// Colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub border: Color,
    pub border_active: Color,
    pub star: Color,
    pub success: Color,
    pub warning: Color,
    pub code: Color,
}

const LIGHT: Palette = Palette {
    background: Color::Rgb(253, 246, 227), // paper
    text: Color::Rgb(60, 50, 40),
    muted: Color::Rgb(130, 120, 105),
    primary: Color::Rgb(178, 74, 32),
    secondary: Color::Rgb(196, 110, 60),
    border: Color::Rgb(190, 175, 150),
    border_active: Color::Rgb(178, 74, 32),
    star: Color::Rgb(214, 158, 0),
    success: Color::Rgb(40, 140, 70),
    warning: Color::Rgb(180, 120, 0),
    code: Color::Rgb(90, 90, 140),
};

const DARK: Palette = Palette {
    background: Color::Rgb(24, 22, 20),
    text: Color::Rgb(238, 238, 238),
    muted: Color::Rgb(128, 128, 128),
    primary: Color::Rgb(236, 91, 43),
    secondary: Color::Rgb(238, 121, 72),
    border: Color::Rgb(60, 60, 60),
    border_active: Color::Rgb(238, 121, 72),
    star: Color::Rgb(229, 192, 123),
    success: Color::Rgb(120, 220, 140),
    warning: Color::Rgb(229, 192, 123),
    code: Color::Rgb(160, 200, 255),
};
