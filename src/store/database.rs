use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use time::OffsetDateTime;
use tracing::debug;

use super::{Result, SessionStorage};
use crate::entity::preference::{ActiveModel as PreferenceActiveModel, Entity as PreferenceEntity};
use crate::error::StorageError;

/// A key-value store persisted through Sea-ORM, used as device preferences.
///
/// Entries live in the `preference` table. With the `migration` feature the
/// table can be created with [`Migrator`](crate::migration::Migrator); see
/// [`open_storage`](crate::config::open_storage).
///
/// # Usage
///
/// ```no_run
/// use sea_orm::Database;
/// use eventz_client::store::{DatabaseStore, SessionStorage};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Database::connect("sqlite://eventz.db?mode=rwc").await?;
/// let store = DatabaseStore::new(conn).with_namespace("eventz");
///
/// store.set("token", "eyJ...").await?;
/// assert!(store.get("token").await?.is_some());
/// # Ok(())
/// # }
/// ```
///
/// # Error Mapping
///
/// Sea-ORM errors map to [`StorageError::Backend`].
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    conn: DatabaseConnection,
    /// Prefix applied to every key, empty for none.
    namespace: String,
}

impl DatabaseStore {
    /// Creates a store over `conn` without a key namespace.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            namespace: String::new(),
        }
    }

    /// Prefixes every key with `namespace:` so several apps can share one
    /// preferences database.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    fn storage_key(&self, key: &str) -> String {
        if self.namespace.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.namespace, key)
        }
    }
}

#[async_trait]
impl SessionStorage for DatabaseStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = PreferenceEntity::find_by_id(self.storage_key(key))
            .one(&self.conn)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(entry.map(|model| model.value))
    }

    /// Upserts the entry, stamping `updated_at`.
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let storage_key = self.storage_key(key);
        let updated_at = convert_time_to_datetime(OffsetDateTime::now_utc());

        match PreferenceEntity::find_by_id(storage_key.clone())
            .one(&self.conn)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?
        {
            Some(existing) => {
                let mut active_model = existing.into_active_model();
                active_model.value = Set(value.to_string());
                active_model.updated_at = Set(updated_at);
                active_model
                    .update(&self.conn)
                    .await
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
            }
            None => {
                let entry = PreferenceActiveModel {
                    key: Set(storage_key.clone()),
                    value: Set(value.to_string()),
                    updated_at: Set(updated_at),
                };

                entry
                    .insert(&self.conn)
                    .await
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
            }
        }

        debug!(key = %storage_key, "preference written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        PreferenceEntity::delete_by_id(self.storage_key(key))
            .exec(&self.conn)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}

// time::OffsetDateTime -> sea_orm DateTimeWithTimeZone (chrono)
fn convert_time_to_datetime(time: OffsetDateTime) -> DateTimeWithTimeZone {
    use chrono::DateTime;

    DateTime::from_timestamp(time.unix_timestamp(), time.nanosecond())
        .unwrap_or_default()
        .into()
}
