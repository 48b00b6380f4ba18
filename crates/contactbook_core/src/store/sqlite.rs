//! SQLite-backed contact store.
//!
//! # Invariants
//! - `save` replaces every row inside one transaction.
//! - Row `position` preserves the manager's collection order across reloads.

use super::{ContactStore, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use crate::model::contact::ContactRecord;
use log::debug;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const CONTACT_SELECT_SQL: &str = "SELECT
    first_name,
    last_name,
    email,
    phone,
    company,
    notes,
    created_at,
    updated_at
FROM contacts
ORDER BY position ASC";

/// Contact store over the migrated `contacts` table.
pub struct SqliteContactStore {
    conn: Connection,
}

impl SqliteContactStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl ContactStore for SqliteContactStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self) -> StoreResult<Vec<ContactRecord>> {
        let mut stmt = self.conn.prepare(CONTACT_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_contact_row(row)?);
        }

        debug!(
            "event=store_load module=store backend=sqlite status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    fn save(&mut self, records: &[ContactRecord]) -> StoreResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM contacts;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO contacts (
                    email,
                    first_name,
                    last_name,
                    phone,
                    company,
                    notes,
                    created_at,
                    updated_at,
                    position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            )?;
            for (position, record) in records.iter().enumerate() {
                insert.execute(params![
                    record.email.as_str(),
                    record.first_name.as_str(),
                    record.last_name.as_str(),
                    record.phone.as_str(),
                    record.company.as_str(),
                    record.notes.as_str(),
                    record.created_at.as_deref(),
                    record.updated_at.as_deref(),
                    position as i64,
                ])?;
            }
        }
        tx.commit()?;

        debug!(
            "event=store_save module=store backend=sqlite status=ok count={}",
            records.len()
        );
        Ok(())
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
    Ok(ContactRecord {
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company: row.get("company")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
