//! Keybinding configuration for the user list.
//!
//! Bindings apply while the list has focus; text fields consume typed keys
//! directly. Custom bindings are read from `keybinds.conf` in the form
//! `<Action> = <KeySpec>` on top of the defaults.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Semantic actions available from the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Show the help overlay.
    OpenHelp,
    /// Move focus to the search field.
    StartSearch,
    /// Move focus to the name field of the form.
    NewUser,
    /// Delete the selected user and offer undo.
    DeleteSelection,
    /// Restore the most recently deleted user.
    Undo,
    /// Remove every user.
    ClearAll,
    /// Fetch the list again.
    Refresh,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Swallow the key.
    Ignore,
}

const ALL_ACTIONS: [KeyAction; 13] = [
    KeyAction::Quit,
    KeyAction::OpenHelp,
    KeyAction::StartSearch,
    KeyAction::NewUser,
    KeyAction::DeleteSelection,
    KeyAction::Undo,
    KeyAction::ClearAll,
    KeyAction::Refresh,
    KeyAction::MoveUp,
    KeyAction::MoveDown,
    KeyAction::PageUp,
    KeyAction::PageDown,
    KeyAction::Ignore,
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('a')), KeyAction::NewUser);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('u')), KeyAction::Undo);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        // Shift+c arrives either as 'C' alone or with SHIFT depending on the terminal
        bindings.insert((M::SHIFT, Char('C')), KeyAction::ClearAll);
        bindings.insert((M::NONE, Char('C')), KeyAction::ClearAll);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        Self { bindings }
    }

    /// Load `path`, or the copy in the user config directory, or write defaults to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::config::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Apply `<Action> = <KeySpec>` lines over the defaults. Unparseable lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-roster keybindings (list focus)\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Shift+C, Enter, Esc, Up, Down, PageUp, PageDown, Delete, /\n");
        let names: Vec<&str> = ALL_ACTIONS.iter().map(|a| format_action(*a)).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(&mut buf, "{line}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// Human-readable spec such as "Ctrl+q", "Shift+C" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Backspace => "Backspace".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else if mods.contains(KeyModifiers::SHIFT) {
            format!("Shift+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let mut rest = spec.trim();
    let mut mods = KeyModifiers::NONE;
    loop {
        if let Some(after) = rest.strip_prefix("Ctrl+") {
            mods |= KeyModifiers::CONTROL;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("Shift+") {
            mods |= KeyModifiers::SHIFT;
            rest = after;
        } else {
            break;
        }
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Backspace" => Backspace,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ALL_ACTIONS
        .iter()
        .copied()
        .find(|a| format_action(*a) == s.trim())
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::NewUser => "NewUser",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::Undo => "Undo",
        KeyAction::ClearAll => "ClearAll",
        KeyAction::Refresh => "Refresh",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}
