//! In-process store for embedding callers and tests.

use super::{ContactStore, StoreError, StoreResult};
use crate::model::contact::ContactRecord;

/// Keeps the last saved snapshot in memory.
///
/// Reports `NoData` until the first successful save. Failure injection
/// (`set_fail_saves`, `corrupted`) lets callers exercise degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Vec<ContactRecord>>,
    load_error: Option<String>,
    fail_saves: bool,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `records`.
    pub fn with_records(records: Vec<ContactRecord>) -> Self {
        Self {
            snapshot: Some(records),
            ..Self::default()
        }
    }

    /// Creates a store whose `load` reports corrupt data.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Makes subsequent saves fail without touching the snapshot.
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn snapshot(&self) -> Option<&[ContactRecord]> {
        self.snapshot.as_deref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl ContactStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> StoreResult<Vec<ContactRecord>> {
        if let Some(message) = &self.load_error {
            return Err(StoreError::Corrupt(message.clone()));
        }
        self.snapshot.clone().ok_or(StoreError::NoData)
    }

    fn save(&mut self, records: &[ContactRecord]) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::Unavailable("save rejected".to_string()));
        }
        self.snapshot = Some(records.to_vec());
        self.load_error = None;
        self.save_count += 1;
        Ok(())
    }
}
