//! Flat-file JSON store.
//!
//! # Invariants
//! - A missing file means "no prior data".
//! - Writes go to a temp file in the target directory and are renamed over
//!   the target, so readers never see a truncated file.

use super::{ContactStore, StoreError, StoreResult};
use crate::model::contact::ContactRecord;
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the contact list as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl ContactStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    fn load(&self) -> StoreResult<Vec<ContactRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(StoreError::NoData),
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        let records: Vec<ContactRecord> = serde_json::from_str(&text).map_err(|err| {
            StoreError::Corrupt(format!("`{}`: {err}", self.path.display()))
        })?;
        debug!(
            "event=store_load module=store backend=json status=ok count={}",
            records.len()
        );
        Ok(records)
    }

    fn save(&mut self, records: &[ContactRecord]) -> StoreResult<()> {
        let dir = self.parent_dir().to_path_buf();
        fs::create_dir_all(&dir).map_err(|err| StoreError::io(&dir, err))?;

        let mut file = NamedTempFile::new_in(&dir).map_err(|err| StoreError::io(&dir, err))?;
        serde_json::to_writer_pretty(&mut file, records)
            .map_err(|err| StoreError::Unavailable(format!("failed to write contacts: {err}")))?;
        file.write_all(b"\n")
            .and_then(|()| file.as_file().sync_all())
            .map_err(|err| StoreError::io(file.path(), err))?;
        file.persist(&self.path)
            .map_err(|err| StoreError::io(&self.path, err.error))?;

        debug!(
            "event=store_save module=store backend=json status=ok count={}",
            records.len()
        );
        Ok(())
    }
}
