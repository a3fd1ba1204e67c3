//! Client configuration and platform resolution.

use std::env;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::error::{Error, Result, StorageError};
use crate::store::{DatabaseStore, MemoryStore, SessionStorage};

/// Origin used on native builds (the emulator's view of the host machine).
pub const DEFAULT_NATIVE_API_BASE: &str = "http://10.0.2.2:8000";
/// Origin used on web builds.
pub const DEFAULT_WEB_API_BASE: &str = "http://127.0.0.1:8000";
/// Preferences database used on native builds.
pub const DEFAULT_NATIVE_STORAGE_URL: &str = "sqlite://eventz.db?mode=rwc";

/// Runtime platform the client is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    Native,
    #[default]
    Web,
}

impl Platform {
    pub fn is_native(self) -> bool {
        self == Platform::Native
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "android" | "ios" => Ok(Platform::Native),
            "web" | "browser" => Ok(Platform::Web),
            other => Err(Error::Config(format!("unknown platform `{other}`"))),
        }
    }
}

/// Where the session entries are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    /// Database URL understood by Sea-ORM.
    Database(String),
}

impl StorageBackend {
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Native => StorageBackend::Database(DEFAULT_NATIVE_STORAGE_URL.to_string()),
            Platform::Web => StorageBackend::Memory,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub platform: Platform,
    /// Explicit origin; wins over the per-platform defaults.
    pub api_base_url: Option<String>,
    pub native_api_base_url: String,
    pub web_api_base_url: String,
    pub storage: StorageBackend,
}

impl ClientConfig {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            api_base_url: None,
            native_api_base_url: DEFAULT_NATIVE_API_BASE.to_string(),
            web_api_base_url: DEFAULT_WEB_API_BASE.to_string(),
            storage: StorageBackend::default_for(platform),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn with_storage(mut self, storage: StorageBackend) -> Self {
        self.storage = storage;
        self
    }

    /// Builds a config from the environment, loading `.env` first if present.
    ///
    /// Recognised variables: `EVENTZ_PLATFORM`, `EVENTZ_API_BASE_URL` and
    /// `EVENTZ_STORAGE_URL` (`memory` or a database URL).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let platform = match env::var("EVENTZ_PLATFORM") {
            Ok(value) => value.parse()?,
            Err(_) => Platform::default(),
        };
        let mut config = Self::new(platform);

        if let Ok(url) = env::var("EVENTZ_API_BASE_URL") {
            config.api_base_url = Some(url);
        }
        if let Ok(storage) = env::var("EVENTZ_STORAGE_URL") {
            config.storage = if storage.eq_ignore_ascii_case("memory") {
                StorageBackend::Memory
            } else {
                StorageBackend::Database(storage)
            };
        }

        Ok(config)
    }

    /// The API origin for the configured platform.
    pub fn resolve_api_base(&self) -> Result<Url> {
        let raw = match (&self.api_base_url, self.platform) {
            (Some(explicit), _) => explicit.as_str(),
            (None, Platform::Native) => self.native_api_base_url.as_str(),
            (None, Platform::Web) => self.web_api_base_url.as_str(),
        };
        let url = Url::parse(raw)?;
        info!(platform = ?self.platform, api_base = %url, "api origin resolved");
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Platform::default())
    }
}

/// Opens the session storage backend selected by `config`.
pub async fn open_storage(config: &ClientConfig) -> Result<Arc<dyn SessionStorage>> {
    match &config.storage {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Database(url) => {
            let conn = sea_orm::Database::connect(url.as_str())
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?;

            #[cfg(feature = "migration")]
            {
                use crate::migration::{Migrator, MigratorTrait};
                Migrator::up(&conn, None)
                    .await
                    .map_err(|e| StorageError::Backend(e.to_string()))?;
            }

            Ok(Arc::new(DatabaseStore::new(conn)))
        }
    }
}
