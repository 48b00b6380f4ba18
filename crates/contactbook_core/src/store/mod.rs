//! Persistence collaborator contract and implementations.
//!
//! # Responsibility
//! - Define the load/save boundary the contact manager depends on.
//! - Keep storage technology (flat JSON file, SQLite, memory) out of the
//!   manager.
//!
//! # Invariants
//! - `load` reports "no prior data" as `StoreError::NoData`, distinct from
//!   unreadable or corrupt data.
//! - `save` replaces prior state atomically: a later `load` observes either
//!   the previous snapshot or the new one, never a partial write.

use crate::db::DbError;
use crate::model::contact::ContactRecord;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteContactStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer error.
#[derive(Debug)]
pub enum StoreError {
    /// No snapshot has ever been saved.
    NoData,
    /// Filesystem failure on `path`.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Stored data exists but cannot be decoded.
    Corrupt(String),
    /// SQLite backend failure.
    Db(DbError),
    /// Backend refused the operation.
    Unavailable(String),
}

impl StoreError {
    /// Returns whether this is the benign "nothing saved yet" condition.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no saved contacts"),
            Self::Io { path, source } => write!(f, "io error on `{}`: {source}", path.display()),
            Self::Corrupt(message) => write!(f, "corrupt contact data: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Db(err) => Some(err),
            Self::NoData | Self::Corrupt(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Load/save interface used by `ContactManager`.
pub trait ContactStore {
    /// Short backend name used in log events.
    fn backend(&self) -> &'static str;

    /// Reads the last saved snapshot.
    fn load(&self) -> StoreResult<Vec<ContactRecord>>;

    /// Replaces the stored snapshot with `records`.
    fn save(&mut self, records: &[ContactRecord]) -> StoreResult<()>;
}

impl<S: ContactStore + ?Sized> ContactStore for Box<S> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn load(&self) -> StoreResult<Vec<ContactRecord>> {
        (**self).load()
    }

    fn save(&mut self, records: &[ContactRecord]) -> StoreResult<()> {
        (**self).save(records)
    }
}
