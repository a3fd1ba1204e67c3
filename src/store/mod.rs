//! Persistent session store.
//!
//! A session survives restarts as two string entries in a key-value backend:
//! the bearer token under [`TOKEN_KEY`] and the JSON-serialized profile under
//! [`USER_KEY`]. The two entries are written independently; readers treat a
//! missing or unusable half as "no session".

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::identity::UserIdentity;

pub mod database;
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-serialized [`UserIdentity`].
pub const USER_KEY: &str = "user";

pub type Result<T> = std::result::Result<T, StorageError>;

/// Asynchronous string key-value storage.
///
/// Implemented by [`MemoryStore`] (browser-storage style, process lifetime)
/// and [`DatabaseStore`] (device preferences backed by a database).
#[async_trait]
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Reads the stored bearer token.
pub async fn read_token(storage: &dyn SessionStorage) -> Result<Option<String>> {
    storage.get(TOKEN_KEY).await
}

/// Reads the stored profile. An unparseable profile reads as `None`.
pub async fn read_identity(storage: &dyn SessionStorage) -> Result<Option<UserIdentity>> {
    let Some(raw) = storage.get(USER_KEY).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(identity) => Ok(Some(identity)),
        Err(e) => {
            warn!(error = %e, "stored user profile is unreadable");
            Ok(None)
        }
    }
}

/// Persists a session: token first, then profile.
pub async fn write_session(
    storage: &dyn SessionStorage,
    token: &str,
    identity: &UserIdentity,
) -> Result<()> {
    let profile =
        serde_json::to_string(identity).map_err(|e| StorageError::Encode(e.to_string()))?;
    storage.set(TOKEN_KEY, token).await?;
    storage.set(USER_KEY, &profile).await?;
    debug!(user_id = identity.id, "session persisted");
    Ok(())
}

/// Removes both session entries.
pub async fn clear_session(storage: &dyn SessionStorage) -> Result<()> {
    storage.remove(TOKEN_KEY).await?;
    storage.remove(USER_KEY).await?;
    debug!("session entries cleared");
    Ok(())
}
