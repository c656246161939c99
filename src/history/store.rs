//! Storage port for the rebalance ledger.
//!
//! The ledger loads the whole collection once and saves the whole collection
//! after every mutation, so a store only needs two operations.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::record::RebalanceHistoryRecord;

/// Whole-collection persistence for history records.
pub trait HistoryStore {
    /// Load every record. An absent backing store is an empty history.
    fn load(&self) -> Result<Vec<RebalanceHistoryRecord>>;

    /// Replace the stored collection with `records`.
    fn save(&self, records: &[RebalanceHistoryRecord]) -> Result<()>;
}

/// A single JSON array on disk, newest-first.
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
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<RebalanceHistoryRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = BufReader::new(File::open(&self.path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    fn save(&self, records: &[RebalanceHistoryRecord]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.flush()?;
        Ok(())
    }
}

/// In-process store for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<RebalanceHistoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if `records` had been saved earlier.
    pub fn with_records(records: Vec<RebalanceHistoryRecord>) -> Self {
        Self {
            records: RefCell::new(records),
        }
    }

    /// Copy of what was last saved.
    pub fn snapshot(&self) -> Vec<RebalanceHistoryRecord> {
        self.records.borrow().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<RebalanceHistoryRecord>> {
        Ok(self.snapshot())
    }

    fn save(&self, records: &[RebalanceHistoryRecord]) -> Result<()> {
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }
}
