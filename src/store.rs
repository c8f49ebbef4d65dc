//! In-memory user store with simulated latency.
//!
//! The store owns the authoritative collection. Every operation sleeps for the
//! configured latency first and only then touches the collection, so several
//! operations in flight interleave on the shared vector in completion order.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::trace;

use crate::model::User;

/// Simulated latency applied before each store operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latency {
    /// Delay before `list`.
    pub read: Duration,
    /// Delay before `add`, `remove` and `clear`.
    pub write: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            read: Duration::from_millis(1000),
            write: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Default)]
pub struct LocalDataSource {
    users: Mutex<Vec<User>>,
    latency: Latency,
}

impl LocalDataSource {
    pub fn new(latency: Latency) -> Self {
        Self::with_users(Vec::new(), latency)
    }

    /// Seed the store with an initial collection.
    pub fn with_users(users: Vec<User>, latency: Latency) -> Self {
        Self {
            users: Mutex::new(users),
            latency,
        }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    pub async fn list(&self) -> Vec<User> {
        pause(self.latency.read).await;
        self.users.lock().await.clone()
    }

    pub async fn add(&self, user: User) -> Vec<User> {
        pause(self.latency.write).await;
        let mut users = self.users.lock().await;
        trace!(id = user.id, "store add");
        users.push(user);
        users.clone()
    }

    /// Remove the first entry equal to `user`; absent users leave the collection untouched.
    pub async fn remove(&self, user: &User) -> Vec<User> {
        pause(self.latency.write).await;
        let mut users = self.users.lock().await;
        if let Some(pos) = users.iter().position(|u| u == user) {
            users.remove(pos);
        }
        users.clone()
    }

    pub async fn clear(&self) -> Vec<User> {
        pause(self.latency.write).await;
        let mut users = self.users.lock().await;
        users.clear();
        users.clone()
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> User {
        User::new(1, "Ann", "a@x.com")
    }

    fn bob() -> User {
        User::new(2, "Bob", "b@x.com")
    }

    #[tokio::test]
    async fn add_preserves_insertion_order() {
        let store = LocalDataSource::new(Latency::none());
        store.add(bob()).await;
        let users = store.add(ann()).await;
        assert_eq!(users, vec![bob(), ann()]);
        assert_eq!(store.list().await, users);
    }

    #[tokio::test]
    async fn remove_drops_only_first_duplicate() {
        let store = LocalDataSource::with_users(vec![ann(), bob(), ann()], Latency::none());
        let users = store.remove(&ann()).await;
        assert_eq!(users, vec![bob(), ann()]);
    }

    #[tokio::test]
    async fn remove_absent_user_is_noop() {
        let store = LocalDataSource::with_users(vec![ann()], Latency::none());
        let users = store.remove(&bob()).await;
        assert_eq!(users, vec![ann()]);
    }

    #[tokio::test]
    async fn clear_empties_collection() {
        let store = LocalDataSource::with_users(vec![ann(), bob()], Latency::none());
        assert!(store.clear().await.is_empty());
        assert!(store.list().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_for_latency() {
        let latency = Latency {
            read: Duration::from_millis(1000),
            write: Duration::from_millis(500),
        };
        let store = LocalDataSource::new(latency);
        let start = tokio::time::Instant::now();
        store.add(ann()).await;
        assert!(start.elapsed() >= Duration::from_millis(500));
        store.list().await;
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
