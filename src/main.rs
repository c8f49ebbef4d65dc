//! user-roster binary entry point.
//!
//! Loads configuration, starts the tokio runtime that runs view-model
//! operations, puts the terminal in raw mode for the TUI loop and restores it
//! on exit.
//!
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use user_roster::app::{self, AppState, Theme, keymap::Keymap};
use user_roster::config::{Cli, Settings};
use user_roster::logging::{LogConfig, init_logging};
use user_roster::repository::{LocalUserRepository, UserRepository};
use user_roster::store::LocalDataSource;
use user_roster::viewmodel::UserListViewModel;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // -vv and above also print the module path of each event
    let log_config = LogConfig::from_verbosity(cli.verbose)
        .with_log_file(cli.log_file.clone())
        .with_target(cli.verbose >= 2);
    if let Err(err) = init_logging(&log_config) {
        eprintln!("logging disabled: {err}");
    }

    let mut settings =
        Settings::load_or_init(&cli.config).map_err(|e| anyhow!("load settings: {e}"))?;
    settings.apply_cli(&cli);
    info!(?settings, "starting");

    let theme = Theme::load_or_init(&cli.theme);
    let keymap = Keymap::load_or_init(&cli.keybinds);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    let source = Arc::new(LocalDataSource::new(settings.latency()));
    let repository: Arc<dyn UserRepository> = Arc::new(LocalUserRepository::new(source));
    let vm = {
        let _guard = runtime.enter();
        UserListViewModel::new(repository, settings.view_model_options())
    };

    let mut terminal = init_terminal().context("init terminal")?;
    let mut state = AppState::new(theme, keymap);

    let res = app::run(&mut terminal, &vm, runtime.handle(), &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    drop(vm);
    runtime.shutdown_timeout(Duration::from_millis(200));

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    info!("exiting");
    Ok(())
}
