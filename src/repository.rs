//! Repository port used by the view-model.
//!
//! The trait is object-safe through `async_trait`, so the view-model holds an
//! `Arc<dyn UserRepository>` and tests can substitute failing implementations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::model::User;
use crate::store::LocalDataSource;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Current collection.
    async fn get_users(&self) -> Result<Vec<User>>;
    /// Append `user` and return the resulting collection.
    async fn add_user(&self, user: User) -> Result<Vec<User>>;
    /// Remove the first match of `user` and return the resulting collection.
    async fn delete_user(&self, user: User) -> Result<Vec<User>>;
    /// Remove everything and return the (empty) collection.
    async fn clear_users(&self) -> Result<Vec<User>>;
}

/// Forwards every call to a shared [`LocalDataSource`].
#[derive(Clone, Debug)]
pub struct LocalUserRepository {
    source: Arc<LocalDataSource>,
}

impl LocalUserRepository {
    pub fn new(source: Arc<LocalDataSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl UserRepository for LocalUserRepository {
    async fn get_users(&self) -> Result<Vec<User>> {
        debug!("repository: get_users");
        Ok(self.source.list().await)
    }

    async fn add_user(&self, user: User) -> Result<Vec<User>> {
        debug!(id = user.id, "repository: add_user");
        Ok(self.source.add(user).await)
    }

    async fn delete_user(&self, user: User) -> Result<Vec<User>> {
        debug!(id = user.id, "repository: delete_user");
        Ok(self.source.remove(&user).await)
    }

    async fn clear_users(&self) -> Result<Vec<User>> {
        debug!("repository: clear_users");
        Ok(self.source.clear().await)
    }
}
