use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::debug;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus};
use crate::model::{is_blank, is_valid_email};
use crate::ui;
use crate::viewmodel::UserListViewModel;

/// Whether the event loop keeps going.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Draw snapshots and dispatch key presses until the user quits.
///
/// Async view-model operations are spawned on `runtime`; the loop itself
/// stays synchronous and polls for input every 100ms.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    vm: &UserListViewModel,
    runtime: &Handle,
    app: &mut AppState,
) -> Result<()> {
    spawn_op(runtime, vm, |vm| async move { vm.fetch_users().await });

    loop {
        app.sync(vm.snapshot());
        app.expire_snackbar(Instant::now());
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && handle_key(app, vm, runtime, key) == Flow::Quit
                {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn spawn_op<F, Fut>(runtime: &Handle, vm: &UserListViewModel, op: F)
where
    F: FnOnce(UserListViewModel) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    runtime.spawn(op(vm.clone()));
}

/// Route one key press according to the overlay and focus.
pub fn handle_key(
    app: &mut AppState,
    vm: &UserListViewModel,
    runtime: &Handle,
    key: KeyEvent,
) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return Flow::Continue;
    }
    match key.code {
        KeyCode::Tab => {
            app.focus = app.focus.next();
            return Flow::Continue;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return Flow::Continue;
        }
        _ => {}
    }

    match app.focus {
        Focus::List => handle_list_key(app, vm, runtime, key),
        Focus::Search => {
            handle_search_key(app, vm, key);
            Flow::Continue
        }
        Focus::Name | Focus::Email => {
            handle_form_key(app, vm, runtime, key);
            Flow::Continue
        }
    }
}

fn handle_list_key(
    app: &mut AppState,
    vm: &UserListViewModel,
    runtime: &Handle,
    key: KeyEvent,
) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    debug!(?action, "list key");
    let len = app.view.filtered_users.len();
    let rpp = app.rows_per_page.max(1);
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => app.show_help = true,
        KeyAction::StartSearch => app.focus = Focus::Search,
        KeyAction::NewUser => app.focus = Focus::Name,
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < len {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => app.selected_index = app.selected_index.saturating_sub(rpp),
        KeyAction::PageDown => {
            app.selected_index = app
                .selected_index
                .saturating_add(rpp)
                .min(len.saturating_sub(1));
        }
        KeyAction::DeleteSelection => {
            if let Some(user) = app.selected_user().cloned() {
                app.notify(format!("User deleted: {}", user.name), true);
                spawn_op(runtime, vm, |vm| async move { vm.delete_user(user).await });
            }
        }
        KeyAction::Undo => {
            if app.undo_available() {
                app.snackbar = None;
                spawn_op(runtime, vm, |vm| async move { vm.undo_delete().await });
            }
        }
        KeyAction::ClearAll => {
            app.notify("All users cleared", false);
            spawn_op(runtime, vm, |vm| async move { vm.clear_users().await });
        }
        KeyAction::Refresh => {
            spawn_op(runtime, vm, |vm| async move { vm.fetch_users().await });
        }
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, vm: &UserListViewModel, key: KeyEvent) {
    let mut query = vm.snapshot().search_query;
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.focus = Focus::List,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vm.update_search_query(String::new());
        }
        KeyCode::Backspace => {
            query.pop();
            vm.update_search_query(query);
        }
        KeyCode::Char(c) => {
            query.push(c);
            vm.update_search_query(query);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, vm: &UserListViewModel, runtime: &Handle, key: KeyEvent) {
    let snap = vm.snapshot();
    let editing_name = app.focus == Focus::Name;
    let mut draft = if editing_name { snap.name.clone() } else { snap.email.clone() };
    match key.code {
        KeyCode::Esc => {
            app.focus = Focus::List;
            return;
        }
        KeyCode::Enter => {
            if !is_blank(&snap.name) && is_valid_email(&snap.email) {
                app.notify("User added successfully", false);
                app.focus = Focus::Name;
            }
            spawn_op(runtime, vm, |vm| async move { vm.add_user().await });
            return;
        }
        KeyCode::Backspace => {
            draft.pop();
        }
        KeyCode::Char(c) => draft.push(c),
        _ => return,
    }
    if editing_name {
        vm.update_name(draft);
    } else {
        vm.update_email(draft);
    }
}
