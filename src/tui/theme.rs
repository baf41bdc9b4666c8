use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use super::app::ToastStyle;
use super::view::Emphasis;

/// Semantic colour theme for the list view.
///
/// Every colour used by the renderer is stored here so the user can
/// override any of them via `[theme]` in `config.toml`.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Text ──────────────────────────────────────────────────
    pub text_primary: Color,
    pub text_muted: Color,

    // ── Emphasis tiers ────────────────────────────────────────
    pub alert: Color,
    pub warning: Color,
    pub success: Color,

    // ── Chrome ────────────────────────────────────────────────
    pub accent: Color,
    pub border: Color,
    pub header: Color,
    pub selection_bg: Color,

    // ── Toast ─────────────────────────────────────────────────
    pub toast_info: Color,
    pub toast_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: Color::White,
            text_muted: Color::DarkGray,

            alert: Color::Red,
            warning: Color::Yellow,
            success: Color::Green,

            accent: Color::Cyan,
            border: Color::DarkGray,
            header: Color::Gray,
            selection_bg: Color::Rgb(59, 66, 97),

            toast_info: Color::Cyan,
            toast_error: Color::Red,
        }
    }
}

impl Theme {
    /// Map a view-model emphasis tier to a concrete style.
    pub fn emphasis(&self, emphasis: Emphasis) -> Style {
        match emphasis {
            Emphasis::Plain => Style::default().fg(self.text_primary),
            Emphasis::Struck => Style::default()
                .fg(self.text_muted)
                .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM),
            Emphasis::Alert => Style::default()
                .fg(self.alert)
                .add_modifier(Modifier::BOLD),
            Emphasis::Warning => Style::default()
                .fg(self.warning)
                .add_modifier(Modifier::BOLD),
            Emphasis::Success => Style::default()
                .fg(self.success)
                .add_modifier(Modifier::BOLD),
            Emphasis::Muted => Style::default().fg(self.text_muted),
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_row_style(&self) -> Style {
        Style::default().bg(self.selection_bg)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    /// Style for a toast notification.
    pub fn toast_style(&self, style: ToastStyle) -> Style {
        let color = match style {
            ToastStyle::Info => self.toast_info,
            ToastStyle::Error => self.toast_error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}

// ── Config deserialization ────────────────────────────────────────────

/// All-optional mirror of [`Theme`] for `config.toml` `[theme]` section.
///
/// Only `Some` fields override the default; everything else keeps its default.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeConfig {
    pub text_primary: Option<String>,
    pub text_muted: Option<String>,

    pub alert: Option<String>,
    pub warning: Option<String>,
    pub success: Option<String>,

    pub accent: Option<String>,
    pub border: Option<String>,
    pub header: Option<String>,
    pub selection_bg: Option<String>,

    pub toast_info: Option<String>,
    pub toast_error: Option<String>,
}

/// Parse a colour string into a ratatui `Color`.
///
/// Supports named colours (`"cyan"`, `"red"`, `"dark_gray"`, etc.) and
/// `"rgb(R,G,B)"` syntax.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(inner) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').collect();
        if parts.len() == 3 {
            let r = parts[0].trim().parse::<u8>().ok()?;
            let g = parts[1].trim().parse::<u8>().ok()?;
            let b = parts[2].trim().parse::<u8>().ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }

    // Named colours (case-insensitive, with underscore tolerance)
    let lower = s.to_lowercase().replace('-', "_");
    match lower.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "light_red" | "lightred" => Some(Color::LightRed),
        "light_green" | "lightgreen" => Some(Color::LightGreen),
        "light_yellow" | "lightyellow" => Some(Color::LightYellow),
        "light_blue" | "lightblue" => Some(Color::LightBlue),
        "light_magenta" | "lightmagenta" => Some(Color::LightMagenta),
        "light_cyan" | "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        _ => None,
    }
}

/// Overwrite `target` if `source` parses to a valid colour.
fn apply(target: &mut Color, source: Option<&String>) {
    if let Some(s) = source {
        match parse_color(s) {
            Some(color) => *target = color,
            None => tracing::warn!("ignoring unknown theme colour {s:?}"),
        }
    }
}

impl ThemeConfig {
    /// Build a `Theme` starting from defaults, overriding any fields that were
    /// set in the config file.
    pub fn build(&self) -> Theme {
        let mut t = Theme::default();

        apply(&mut t.text_primary, self.text_primary.as_ref());
        apply(&mut t.text_muted, self.text_muted.as_ref());
        apply(&mut t.alert, self.alert.as_ref());
        apply(&mut t.warning, self.warning.as_ref());
        apply(&mut t.success, self.success.as_ref());
        apply(&mut t.accent, self.accent.as_ref());
        apply(&mut t.border, self.border.as_ref());
        apply(&mut t.header, self.header.as_ref());
        apply(&mut t.selection_bg, self.selection_bg.as_ref());
        apply(&mut t.toast_info, self.toast_info.as_ref());
        apply(&mut t.toast_error, self.toast_error.as_ref());

        t
    }
}
