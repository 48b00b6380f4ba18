//! SQLite bootstrap for the `sqlite` storage backend.
//!
//! # Responsibility
//! - Open SQLite connections and bring the `contacts` schema up to date.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Stores must not touch the `contacts` table before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure opening or migrating the contact database.
#[derive(Debug)]
pub enum DbError {
    /// Driver error while opening the file or reading/writing `contacts`.
    Sqlite(rusqlite::Error),
    /// `PRAGMA user_version` is ahead of the last `contacts` migration this
    /// binary ships, i.e. the file was written by a newer contact book.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "contact database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "contact database schema v{db_version} is newer than this build (v{latest_supported}); upgrade contactbook to open it"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
