//! Terminal application state and entry glue.
//!
//! [`AppState`] holds what only the terminal view cares about (focus,
//! selection, theme, keymap, snackbar) next to the latest [`ViewState`]
//! snapshot received from the view-model.
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::model::User;
use crate::viewmodel::ViewState;
use keymap::Keymap;

/// How long a snackbar stays on screen.
pub const SNACKBAR_TTL: Duration = Duration::from_secs(4);

/// Which widget receives typed keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    List,
    Search,
    Name,
    Email,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::List => Focus::Search,
            Focus::Search => Focus::Name,
            Focus::Name => Focus::Email,
            Focus::Email => Focus::List,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::List => Focus::Email,
            Focus::Search => Focus::List,
            Focus::Name => Focus::Search,
            Focus::Email => Focus::Name,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::List => "LIST",
            Focus::Search => "SEARCH",
            Focus::Name => "NAME",
            Focus::Email => "EMAIL",
        }
    }
}

/// Short-lived notice shown above the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snackbar {
    pub message: String,
    /// Whether the undo key applies to this notice.
    pub undo: bool,
    pub shown_at: Instant,
}

impl Snackbar {
    pub fn new(message: impl Into<String>, undo: bool) -> Self {
        Self {
            message: message.into(),
            undo,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= SNACKBAR_TTL
    }
}

/// Color palette for the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub focus: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Plain ANSI palette for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            focus: Color::Yellow,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            focus: Color::Rgb(0x89, 0xb4, 0xfa),        // blue
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slots(&self) -> [(&'static str, Color); 12] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("focus", self.focus),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error", self.error),
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "focus" => &mut self.focus,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Parse `key = color` lines on top of `mocha`. Unknown keys and bad colors are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if let (Some(slot), Some(color)) = (theme.slot_mut(key), parse_color(val)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-roster theme\n");
        buf.push_str("# Colors: names (LightBlue), #RRGGBB, a palette index (0-255) or Reset\n\n");
        for (key, color) in self.slots() {
            let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(color));
        }
        std::fs::write(path, buf)
    }

    /// Load `path` (or the copy in the user config directory); write defaults when neither exists.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = crate::config::config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        let _ = theme.write_file(path);
        theme
    }
}

/// Color names ("LightBlue", "dark-gray"), "reset", "#RRGGBB" or bare "RRGGBB", or a 0-255 palette index.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Color::from_str(&format!("#{s}")).ok();
    }
    Color::from_str(s).ok()
}

/// Inverse of [`parse_color`]: names stay names and palette indices stay indices.
fn color_to_str(c: Color) -> String {
    c.to_string()
}

pub struct AppState {
    pub view: ViewState,
    pub focus: Focus,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: Keymap,
    pub snackbar: Option<Snackbar>,
    pub show_help: bool,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            view: ViewState::default(),
            focus: Focus::List,
            selected_index: 0,
            rows_per_page: 10,
            theme,
            keymap,
            snackbar: None,
            show_help: false,
        }
    }

    /// Take a fresh snapshot and keep the selection inside the visible list.
    pub fn sync(&mut self, view: ViewState) {
        self.view = view;
        let len = self.view.filtered_users.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.view.filtered_users.get(self.selected_index)
    }

    pub fn notify(&mut self, message: impl Into<String>, undo: bool) {
        self.snackbar = Some(Snackbar::new(message, undo));
    }

    pub fn expire_snackbar(&mut self, now: Instant) {
        if self.snackbar.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.snackbar = None;
        }
    }

    /// Undo is offered only while the delete notice is visible.
    pub fn undo_available(&self) -> bool {
        self.snackbar.as_ref().is_some_and(|s| s.undo)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
