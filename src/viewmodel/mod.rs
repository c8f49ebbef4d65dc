//! Presentation state holder for the user list screen.
//!
//! [`UserListViewModel`] owns the published [`ViewState`] on a
//! `tokio::sync::watch` channel. Async operations move the display state
//! through `Loading` to `Success` or `Error`; text input updates are
//! synchronous. A background task debounces the search query and recomputes
//! the filtered view from the last successful result.
//!
pub mod debounce;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::DynError;
use crate::model::{User, is_blank, is_valid_email};
use crate::repository::UserRepository;
use crate::search::filter_users;

/// Display state of the last completed or pending operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiState {
    Loading,
    Success { users: Vec<User>, message: String },
    Error(String),
}

impl UiState {
    /// Users of a `Success` state.
    pub fn users(&self) -> Option<&[User]> {
        match self {
            UiState::Success { users, .. } => Some(users.as_slice()),
            UiState::Loading | UiState::Error(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

/// Snapshot published to the view after every change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub ui_state: UiState,
    /// User list of the most recent `Success`, kept through `Loading` and `Error`.
    pub last_success_users: Vec<User>,
    /// Users shown by the view, derived from `last_success_users`.
    pub filtered_users: Vec<User>,
    /// Query as typed, updated immediately.
    pub search_query: String,
    /// Query the filtered view was last computed with.
    pub applied_query: String,
    pub name: String,
    pub email: String,
    pub name_error: bool,
    pub email_error: bool,
    /// Undo slot holding the most recently deleted user.
    pub recently_deleted: Option<User>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            ui_state: UiState::Loading,
            last_success_users: Vec::new(),
            filtered_users: Vec::new(),
            search_query: String::new(),
            applied_query: String::new(),
            name: String::new(),
            email: String::new(),
            name_error: false,
            email_error: false,
            recently_deleted: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewModelOptions {
    /// Quiet period before a query change is applied.
    pub debounce: Duration,
    /// Re-run the applied query over every new result. When off, results are
    /// shown unfiltered until the next query change is applied.
    pub refilter_after_refresh: bool,
}

impl Default for ViewModelOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            refilter_after_refresh: true,
        }
    }
}

struct Shared {
    repository: Arc<dyn UserRepository>,
    state: watch::Sender<ViewState>,
    query: watch::Sender<String>,
    options: ViewModelOptions,
}

impl Shared {
    fn apply_query(&self, query: &str) {
        debug!(query, "applying search query");
        self.state.send_modify(|s| {
            s.filtered_users = filter_users(&s.last_success_users, query);
            s.applied_query = query.to_string();
        });
    }
}

struct ObserverGuard(JoinHandle<()>);

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Cloning yields another handle onto the same state.
#[derive(Clone)]
pub struct UserListViewModel {
    shared: Arc<Shared>,
    _observer: Arc<ObserverGuard>,
}

impl UserListViewModel {
    /// Create the view-model and start the query observer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(repository: Arc<dyn UserRepository>, options: ViewModelOptions) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let (query, query_rx) = watch::channel(String::new());
        let shared = Arc::new(Shared {
            repository,
            state,
            query,
            options,
        });

        let observer = {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move {
                let quiet = shared.options.debounce;
                debounce::debounce_distinct(query_rx, quiet, |q: &String| shared.apply_query(q))
                    .await;
            })
        };

        Self {
            shared,
            _observer: Arc::new(ObserverGuard(observer)),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.state.subscribe()
    }

    pub async fn fetch_users(&self) {
        info!("fetching users");
        self.set_loading();
        match self.shared.repository.get_users().await {
            Ok(users) => {
                let message = if users.is_empty() {
                    "No users available"
                } else {
                    "Users fetched successfully!"
                };
                self.publish_success(users, message, false);
            }
            Err(e) => self.publish_error(describe(&e)),
        }
    }

    pub fn update_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.shared
            .state
            .send_modify(|s| s.search_query.clone_from(&query));
        self.shared.query.send_replace(query);
    }

    pub fn update_name(&self, input: impl Into<String>) {
        let input = input.into();
        self.shared.state.send_modify(|s| {
            s.name_error = is_blank(&input);
            s.name = input;
        });
    }

    pub fn update_email(&self, input: impl Into<String>) {
        let input = input.into();
        self.shared.state.send_modify(|s| {
            s.email_error = !is_valid_email(&input);
            s.email = input;
        });
    }

    /// Add a user from the current drafts, or flag the invalid fields.
    pub async fn add_user(&self) {
        let (name, email) = {
            let s = self.shared.state.borrow();
            (s.name.clone(), s.email.clone())
        };
        if is_blank(&name) || !is_valid_email(&email) {
            debug!("add rejected: invalid drafts");
            self.shared.state.send_modify(|s| {
                s.name_error = is_blank(&s.name);
                s.email_error = !is_valid_email(&s.email);
            });
            return;
        }

        self.set_loading();
        let user = User::with_random_id(name, email);
        info!(id = user.id, "adding user");
        match self.shared.repository.add_user(user).await {
            Ok(users) => self.publish_success(users, "User added successfully!", true),
            Err(e) => self.publish_error(format!("Error adding user: {}", describe(&e))),
        }
    }

    pub async fn delete_user(&self, user: User) {
        info!(id = user.id, "deleting user");
        self.shared.state.send_modify(|s| {
            s.recently_deleted = Some(user.clone());
            s.ui_state = UiState::Loading;
        });
        match self.shared.repository.delete_user(user).await {
            Ok(users) => self.publish_success(users, "User deleted successfully!", false),
            Err(e) => self.publish_error(format!("Error deleting user: {}", describe(&e))),
        }
    }

    /// Re-add the most recently deleted user through the regular add path.
    ///
    /// The restored user gets a new id. The undo slot is emptied either way.
    pub async fn undo_delete(&self) {
        let mut deleted = None;
        self.shared.state.send_if_modified(|s| {
            deleted = s.recently_deleted.take();
            deleted.is_some()
        });
        if let Some(user) = deleted {
            info!(name = %user.name, "undoing delete");
            self.update_name(user.name);
            self.update_email(user.email);
            self.add_user().await;
        }
    }

    pub async fn clear_users(&self) {
        info!("clearing users");
        self.set_loading();
        match self.shared.repository.clear_users().await {
            Ok(users) => self.publish_success(users, "All users cleared!", false),
            Err(e) => self.publish_error(format!("Error clearing users: {}", describe(&e))),
        }
    }

    fn set_loading(&self) {
        self.shared.state.send_modify(|s| s.ui_state = UiState::Loading);
    }

    fn publish_success(&self, users: Vec<User>, message: &str, clear_drafts: bool) {
        let refilter = self.shared.options.refilter_after_refresh;
        self.shared.state.send_modify(move |s| {
            s.filtered_users = if refilter {
                filter_users(&users, &s.applied_query)
            } else {
                users.clone()
            };
            s.last_success_users.clone_from(&users);
            s.ui_state = UiState::Success {
                users,
                message: message.to_string(),
            };
            if clear_drafts {
                s.name.clear();
                s.email.clear();
            }
        });
    }

    fn publish_error(&self, message: String) {
        warn!(%message, "operation failed");
        self.shared
            .state
            .send_modify(move |s| s.ui_state = UiState::Error(message));
    }
}

fn describe(e: &DynError) -> String {
    let text = e.to_string();
    if text.is_empty() {
        "Unknown error".to_string()
    } else {
        text
    }
}
