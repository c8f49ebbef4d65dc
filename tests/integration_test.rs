// Integration tests for user-roster

use std::sync::Arc;
use std::time::Duration;

use user_roster::model::User;
use user_roster::repository::{LocalUserRepository, UserRepository};
use user_roster::store::{Latency, LocalDataSource};
use user_roster::viewmodel::{UiState, UserListViewModel, ViewModelOptions, ViewState};

fn temp_path(tag: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("roster_{}_{}_{}.conf", tag, std::process::id(), nonce));
    path.to_string_lossy().to_string()
}

fn roster_vm(users: Vec<User>) -> (UserListViewModel, Arc<LocalDataSource>) {
    let source = Arc::new(LocalDataSource::with_users(users, Latency::none()));
    let repo: Arc<dyn UserRepository> = Arc::new(LocalUserRepository::new(Arc::clone(&source)));
    (UserListViewModel::new(repo, ViewModelOptions::default()), source)
}

async fn wait_until<F>(vm: &UserListViewModel, cond: F) -> ViewState
where
    F: FnMut(&ViewState) -> bool,
{
    let mut rx = vm.subscribe();
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(cond))
        .await
        .expect("state reached in time")
        .expect("view-model alive");
    state.clone()
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf};
    use user_roster::app::Theme;

    let path_str = temp_path("theme");
    let t = Theme::dark();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(t2, t);

    // load_or_init creates file if missing
    let p2_str = temp_path("theme_init");
    let _ = fs::remove_file(&p2_str);
    let created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());
    assert_eq!(created, Theme::mocha());

    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 2) Settings and keymap files are written with defaults and read back
#[test]
fn settings_and_keymap_files_roundtrip() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use user_roster::app::keymap::{KeyAction, Keymap};
    use user_roster::config::Settings;

    let settings_path = temp_path("settings");
    let _ = std::fs::remove_file(&settings_path);
    let created = Settings::load_or_init(&settings_path).unwrap();
    assert_eq!(created, Settings::default());
    assert_eq!(Settings::from_file(&settings_path).unwrap(), created);

    let keys_path = temp_path("keys");
    let mut custom = Keymap::parse("Refresh = F\n");
    custom.write_file(&keys_path).unwrap();
    custom = Keymap::from_file(&keys_path).unwrap();
    let f = KeyEvent::new(KeyCode::Char('F'), KeyModifiers::NONE);
    assert_eq!(custom.resolve(&f), Some(KeyAction::Refresh));
    let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    assert_eq!(custom.resolve(&q), Some(KeyAction::Quit));

    let _ = std::fs::remove_file(&settings_path);
    let _ = std::fs::remove_file(&keys_path);
}

// 3) Add, delete, undo and clear through the view-model against one store
#[tokio::test]
async fn add_delete_undo_clear_scenario() {
    let (vm, source) = roster_vm(vec![]);
    vm.fetch_users().await;

    vm.update_name("Ann");
    vm.update_email("a@x.com");
    vm.add_user().await;
    vm.update_name("Bob");
    vm.update_email("b@x.com");
    vm.add_user().await;
    assert_eq!(source.list().await.len(), 2);

    let bob = source.list().await[1].clone();
    vm.delete_user(bob.clone()).await;
    assert_eq!(source.list().await.len(), 1);

    // deleting again is a no-op on the collection
    vm.delete_user(bob.clone()).await;
    assert_eq!(source.list().await.len(), 1);

    vm.undo_delete().await;
    let users = source.list().await;
    assert_eq!(users.len(), 2);
    assert_eq!((users[1].name.as_str(), users[1].email.as_str()), ("Bob", "b@x.com"));

    vm.clear_users().await;
    assert!(source.list().await.is_empty());
    assert_eq!(
        vm.snapshot().ui_state,
        UiState::Success { users: vec![], message: "All users cleared!".into() }
    );
}

// 4) Invalid drafts never reach the store
#[tokio::test]
async fn invalid_drafts_are_flagged() {
    let (vm, source) = roster_vm(vec![]);
    vm.update_name("Ann");
    vm.update_email("not-an-email");
    vm.add_user().await;
    let snap = vm.snapshot();
    assert!(!snap.name_error);
    assert!(snap.email_error);
    assert_eq!(snap.name, "Ann");
    assert!(source.list().await.is_empty());

    vm.update_name("");
    vm.update_email("");
    vm.add_user().await;
    let snap = vm.snapshot();
    assert!(snap.name_error && snap.email_error);
    assert!(source.list().await.is_empty());
}

// 5) Debounced search over the example roster
#[tokio::test(start_paused = true)]
async fn debounced_search_example() {
    let ann = User::new(1, "Ann", "a@x.com");
    let bob = User::new(2, "Bob", "b@x.com");
    let (vm, _) = roster_vm(vec![ann.clone(), bob.clone()]);
    vm.fetch_users().await;

    for q in ["z", "zz", "a", "an"] {
        vm.update_search_query(q);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(vm.snapshot().filtered_users, vec![ann.clone(), bob.clone()]);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(vm.snapshot().filtered_users, vec![ann.clone()]);

    vm.update_search_query("nobody");
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(vm.snapshot().filtered_users.is_empty());

    vm.update_search_query("");
    tokio::time::sleep(Duration::from_millis(350)).await;
    assert_eq!(vm.snapshot().filtered_users, vec![ann, bob]);
}

// 6) Simulated latency shows Loading with the stale list
#[tokio::test(start_paused = true)]
async fn loading_keeps_stale_filtered_view() {
    let latency = Latency {
        read: Duration::from_millis(1000),
        write: Duration::from_millis(500),
    };
    let ann = User::new(1, "Ann", "a@x.com");
    let source = Arc::new(LocalDataSource::with_users(vec![ann.clone()], latency));
    let repo: Arc<dyn UserRepository> = Arc::new(LocalUserRepository::new(source));
    let vm = UserListViewModel::new(repo, ViewModelOptions::default());
    vm.fetch_users().await;

    let task = tokio::spawn({
        let vm = vm.clone();
        async move { vm.clear_users().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    let snap = vm.snapshot();
    assert!(snap.ui_state.is_loading());
    assert_eq!(snap.filtered_users, vec![ann]);

    task.await.unwrap();
    let snap = vm.snapshot();
    assert!(snap.filtered_users.is_empty());
    assert!(!snap.ui_state.is_loading());
}

// 7) Key handling drives the view-model
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn keys_fill_form_and_add_user() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::runtime::Handle;
    use user_roster::app::update::{Flow, handle_key};
    use user_roster::app::{AppState, Focus};

    let (vm, source) = roster_vm(vec![]);
    vm.fetch_users().await;
    let handle = Handle::current();
    let mut app = AppState::default();
    let press = |app: &mut AppState, code: KeyCode| {
        handle_key(app, &vm, &handle, KeyEvent::new(code, KeyModifiers::NONE))
    };

    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.focus, Focus::Name);
    for c in "Annq".chars() {
        assert_eq!(press(&mut app, KeyCode::Char(c)), Flow::Continue);
    }
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.focus, Focus::Email);
    for c in "a@x.com".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    let snap = vm.snapshot();
    assert_eq!((snap.name.as_str(), snap.email.as_str()), ("Ann", "a@x.com"));

    press(&mut app, KeyCode::Enter);
    assert_eq!(
        app.snackbar.as_ref().map(|s| s.message.as_str()),
        Some("User added successfully")
    );
    let state = wait_until(&vm, |s| s.ui_state.users().is_some_and(|u| u.len() == 1)).await;
    assert_eq!(state.name, "");
    assert_eq!(source.list().await[0].name, "Ann");

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.focus, Focus::List);
    assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
}

// 8) Delete from the list, then undo while the notice is visible
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delete_key_then_undo_key() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::runtime::Handle;
    use user_roster::app::AppState;
    use user_roster::app::update::handle_key;

    let ann = User::new(1, "Ann", "a@x.com");
    let bob = User::new(2, "Bob", "b@x.com");
    let (vm, source) = roster_vm(vec![ann.clone(), bob.clone()]);
    vm.fetch_users().await;
    let handle = Handle::current();
    let mut app = AppState::default();
    app.sync(vm.snapshot());

    // undo without a pending delete notice does nothing
    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE));

    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
    assert_eq!(app.selected_user(), Some(&bob));
    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Delete, KeyModifiers::NONE));
    assert!(app.undo_available());
    assert_eq!(app.snackbar.as_ref().unwrap().message, "User deleted: Bob");

    let state = wait_until(&vm, |s| {
        s.recently_deleted.is_some() && s.ui_state.users().is_some_and(|u| u.len() == 1)
    })
    .await;
    assert_eq!(state.filtered_users, vec![ann.clone()]);

    app.sync(state);
    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE));
    assert!(app.snackbar.is_none());
    wait_until(&vm, |s| {
        s.recently_deleted.is_none() && s.ui_state.users().is_some_and(|u| u.len() == 2)
    })
    .await;
    let users = source.list().await;
    assert_eq!(users[1].name, "Bob");
    assert_eq!(users[1].email, "b@x.com");
}

// 9) Search focus edits the query and Ctrl+u clears it
#[tokio::test]
async fn search_keys_edit_query() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::runtime::Handle;
    use user_roster::app::update::handle_key;
    use user_roster::app::{AppState, Focus};

    let (vm, _) = roster_vm(vec![]);
    let handle = Handle::current();
    let mut app = AppState::default();

    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
    assert_eq!(app.focus, Focus::Search);
    for c in "bo".chars() {
        handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }
    assert_eq!(vm.snapshot().search_query, "bo");

    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
    assert_eq!(vm.snapshot().search_query, "");

    handle_key(&mut app, &vm, &handle, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    assert_eq!(app.focus, Focus::List);
}

// 10) Rendering smoke test on a test backend
#[test]
fn render_shows_empty_notice_and_hints() {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use user_roster::app::AppState;
    use user_roster::ui;

    let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
    let mut app = AppState::default();
    let view = ViewState {
        ui_state: UiState::Success { users: vec![], message: "All users cleared!".into() },
        name_error: true,
        email: "bad".into(),
        email_error: true,
        ..ViewState::default()
    };
    app.sync(view);
    terminal.draw(|f| ui::render(f, &mut app)).unwrap();

    let text: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect();
    assert!(text.contains("No users available"));
    assert!(text.contains("Name cannot be empty"));
    assert!(text.contains("Invalid email address"));
}
