//! Runtime configuration for contact book front-ends.
//!
//! # Responsibility
//! - Collect storage and logging settings in one explicit value.
//! - Build the configured `ContactStore` without hidden path defaults at
//!   the manager level.

use crate::logging::{default_log_level, LoggingConfig};
use crate::store::{ContactStore, JsonFileStore, SqliteContactStore, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// Default data file used when no path is configured.
pub const DEFAULT_DATA_PATH: &str = "contacts.json";

/// Storage technology behind the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Pretty-printed JSON array in a single file.
    #[default]
    Json,
    /// SQLite database file.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Sqlite => "sqlite",
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unknown storage backend `{value}`; expected json|sqlite")
            }
        }
    }
}

impl Error for ConfigError {}

/// Contact book configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBookConfig {
    pub storage: StorageBackend,
    /// JSON file or SQLite database path, depending on `storage`.
    pub data_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rotating log files; stderr when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for ContactBookConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ContactBookConfig {
    pub fn builder() -> ContactBookConfigBuilder {
        ContactBookConfigBuilder::default()
    }

    /// Opens the configured store.
    ///
    /// JSON stores open lazily and never fail here; SQLite opens and
    /// migrates the database file.
    pub fn open_store(&self) -> StoreResult<Box<dyn ContactStore>> {
        let store: Box<dyn ContactStore> = match self.storage {
            StorageBackend::Json => Box::new(JsonFileStore::new(&self.data_path)),
            StorageBackend::Sqlite => Box::new(SqliteContactStore::open(&self.data_path)?),
        };
        Ok(store)
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Builder for `ContactBookConfig`.
#[derive(Debug, Default)]
pub struct ContactBookConfigBuilder {
    config: ContactBookConfig,
}

impl ContactBookConfigBuilder {
    pub fn storage(mut self, storage: StorageBackend) -> Self {
        self.config.storage = storage;
        self
    }

    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log_level = level.into();
        self
    }

    pub fn log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.log_dir = dir;
        self
    }

    pub fn build(self) -> ContactBookConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ContactBookConfig, StorageBackend};
    use crate::store::ContactStore;
    use std::path::PathBuf;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("JSON".parse::<StorageBackend>().unwrap(), StorageBackend::Json);
        assert_eq!(" sqlite ".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert_eq!(
            "csv".parse::<StorageBackend>().unwrap_err(),
            ConfigError::UnknownBackend("csv".to_string())
        );
    }

    #[test]
    fn defaults_use_json_file_in_working_directory() {
        let config = ContactBookConfig::default();
        assert_eq!(config.storage, StorageBackend::Json);
        assert_eq!(config.data_path, PathBuf::from("contacts.json"));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn open_store_honors_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContactBookConfig::builder()
            .storage(StorageBackend::Sqlite)
            .data_path(dir.path().join("contacts.db"))
            .build();

        let store = config.open_store().unwrap();
        assert_eq!(store.backend(), "sqlite");
        assert!(store.load().unwrap().is_empty());
    }
}
