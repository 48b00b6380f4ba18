//! Core domain logic for the contact book.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{ConfigError, ContactBookConfig, StorageBackend};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::contact::{
    Contact, ContactRecord, ContactUpdate, ContactValidationError, NameField, Timestamp,
};
pub use service::contact_manager::{ContactManager, ContactStats, UpdateError};
pub use store::{
    ContactStore, JsonFileStore, MemoryStore, SqliteContactStore, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
