//! Command line and settings file configuration.
//!
//! Settings come from `user-roster.conf` (`key = value`, `#` comments) and
//! are then overridden by CLI flags or their environment fallbacks.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::{Context, Result, invalid_setting};
use crate::store::Latency;
use crate::viewmodel::ViewModelOptions;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "user-roster",
    version,
    about = "Manage an in-memory list of users from the terminal"
)]
pub struct Cli {
    /// Settings file with delays and filter behaviour.
    #[arg(long, env = "USER_ROSTER_CONFIG", default_value = "user-roster.conf")]
    pub config: String,

    /// Simulated latency of a fetch, in milliseconds.
    #[arg(long, value_name = "MS", env = "USER_ROSTER_FETCH_DELAY_MS")]
    pub fetch_delay_ms: Option<u64>,

    /// Simulated latency of add, delete and clear, in milliseconds.
    #[arg(long, value_name = "MS", env = "USER_ROSTER_WRITE_DELAY_MS")]
    pub write_delay_ms: Option<u64>,

    /// Quiet period before a search query is applied, in milliseconds.
    #[arg(long, value_name = "MS", env = "USER_ROSTER_DEBOUNCE_MS")]
    pub debounce_ms: Option<u64>,

    /// Show fresh results unfiltered until the query changes again.
    #[arg(long)]
    pub legacy_filter: bool,

    /// Theme colours file.
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Keybindings file.
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Write logs to this file (logging is off otherwise).
    #[arg(long, value_name = "PATH", env = "USER_ROSTER_LOG")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub fetch_delay: Duration,
    pub write_delay: Duration,
    pub debounce: Duration,
    pub refilter_after_refresh: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let latency = Latency::default();
        let options = ViewModelOptions::default();
        Self {
            fetch_delay: latency.read,
            write_delay: latency.write,
            debounce: options.debounce,
            refilter_after_refresh: options.refilter_after_refresh,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to the user config directory.
    /// When neither exists, defaults are written to `path` and returned.
    pub fn load_or_init(path: &str) -> Result<Self> {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path);
        }
        if let Some(existing) = config_file_read_path("user-roster.conf") {
            return Self::from_file(&existing);
        }
        let settings = Self::default();
        let _ = settings.write_file(path);
        Ok(settings)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_ctx(|| format!("read settings {path}"))?;
        Self::parse(&contents)
    }

    /// Parse `key = value` lines. Unknown keys are ignored; malformed numbers are errors.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut settings = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            match key {
                "fetch_delay_ms" => settings.fetch_delay = parse_millis(key, val)?,
                "write_delay_ms" => settings.write_delay = parse_millis(key, val)?,
                "debounce_ms" => settings.debounce = parse_millis(key, val)?,
                "refilter_after_refresh" => {
                    settings.refilter_after_refresh = parse_bool(val)
                        .ok_or_else(|| invalid_setting(key, val, "true or false"))?
                }
                _ => {}
            }
        }
        Ok(settings)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-roster settings\n");
        buf.push_str("# Delays are in milliseconds.\n\n");
        let _ = writeln!(&mut buf, "fetch_delay_ms = {}", self.fetch_delay.as_millis());
        let _ = writeln!(&mut buf, "write_delay_ms = {}", self.write_delay.as_millis());
        let _ = writeln!(&mut buf, "debounce_ms = {}", self.debounce.as_millis());
        buf.push_str("# false: fresh results stay unfiltered until the query changes\n");
        let _ = writeln!(
            &mut buf,
            "refilter_after_refresh = {}",
            self.refilter_after_refresh
        );
        std::fs::write(path, buf)
    }

    /// Override file values with whatever the command line set.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ms) = cli.fetch_delay_ms {
            self.fetch_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.write_delay_ms {
            self.write_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.debounce_ms {
            self.debounce = Duration::from_millis(ms);
        }
        if cli.legacy_filter {
            self.refilter_after_refresh = false;
        }
    }

    pub fn latency(&self) -> Latency {
        Latency {
            read: self.fetch_delay,
            write: self.write_delay,
        }
    }

    pub fn view_model_options(&self) -> ViewModelOptions {
        ViewModelOptions {
            debounce: self.debounce,
            refilter_after_refresh: self.refilter_after_refresh,
        }
    }
}

/// Locate `name` under `$XDG_CONFIG_HOME/user-roster` or `~/.config/user-roster`.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let mut dirs = Vec::new();
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        dirs.push(PathBuf::from(xdg));
    }
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".config"));
    }
    dirs.into_iter()
        .map(|d| d.join("user-roster").join(name))
        .find(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

fn parse_millis(key: &str, val: &str) -> Result<Duration> {
    let ms = val
        .parse::<u64>()
        .with_ctx(|| format!("{key}: expected milliseconds"))?;
    Ok(Duration::from_millis(ms))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
