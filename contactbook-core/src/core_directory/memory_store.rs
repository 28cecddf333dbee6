//! In-Memory Directory Store
//!
//! Simple in-memory implementation for testing and for the local CLI node.
//! Faults can be injected per key to exercise partial-failure and
//! concurrent-writer paths.

use super::errors::{DirectoryError, DirectoryResult};
use super::store::DirectoryStore;
use super::types::{Principal, Record, RecordKey, Version, WriteMode};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Injected faults, keyed by record
#[derive(Default)]
struct Faults {
    /// Stores and removals fail
    writes: HashSet<RecordKey>,
    /// Removals fail
    removals: HashSet<RecordKey>,
    /// Stores left before stores start failing
    budgets: HashMap<RecordKey, u32>,
    /// Fetches report the record as absent
    hidden: HashSet<RecordKey>,
}

/// In-memory directory store
#[derive(Clone, Default)]
pub struct MemoryDirectoryStore {
    records: Arc<RwLock<HashMap<RecordKey, Record>>>,
    faults: Arc<RwLock<Faults>>,
    writes: Arc<AtomicU64>,
}

impl MemoryDirectoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from previously exported records
    pub fn from_records(records: Vec<Record>) -> Self {
        let records = records.into_iter().map(|r| (r.key.clone(), r)).collect();
        Self { records: Arc::new(RwLock::new(records)), ..Default::default() }
    }

    /// Export every stored record, ordered by key
    pub async fn records(&self) -> Vec<Record> {
        let mut records: Vec<Record> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    /// Make every subsequent write or removal of `key` fail
    pub async fn fail_writes_to(&self, key: RecordKey) {
        self.faults.write().await.writes.insert(key);
    }

    /// Make every subsequent removal of `key` fail; stores still succeed
    pub async fn fail_removals_of(&self, key: RecordKey) {
        self.faults.write().await.removals.insert(key);
    }

    /// Let `allowed` more stores of `key` through, then fail the rest
    pub async fn fail_writes_after(&self, key: RecordKey, allowed: u32) {
        self.faults.write().await.budgets.insert(key, allowed);
    }

    /// Serve fetches of `key` as if the record did not exist
    ///
    /// Models a reader that raced a concurrent creator: versioned writes
    /// still see the real record and conflict.
    pub async fn hide(&self, key: RecordKey) {
        self.faults.write().await.hidden.insert(key);
    }

    /// Clear every fault injected for `key`
    pub async fn heal(&self, key: &RecordKey) {
        let mut faults = self.faults.write().await;
        faults.writes.remove(key);
        faults.removals.remove(key);
        faults.budgets.remove(key);
        faults.hidden.remove(key);
    }

    /// Number of successful stores and removals so far
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    async fn check_store(&self, key: &RecordKey) -> DirectoryResult<()> {
        let mut faults = self.faults.write().await;
        if faults.writes.contains(key) {
            return Err(DirectoryError::Unavailable(format!("write to {} rejected", key)));
        }
        if let Some(left) = faults.budgets.get_mut(key) {
            if *left == 0 {
                return Err(DirectoryError::Unavailable(format!("write to {} rejected", key)));
            }
            *left -= 1;
        }
        Ok(())
    }

    async fn check_remove(&self, key: &RecordKey) -> DirectoryResult<()> {
        let faults = self.faults.read().await;
        if faults.writes.contains(key) || faults.removals.contains(key) {
            return Err(DirectoryError::Unavailable(format!("removal of {} rejected", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectoryStore {
    async fn fetch(&self, key: &RecordKey) -> DirectoryResult<Option<Record>> {
        if self.faults.read().await.hidden.contains(key) {
            return Ok(None);
        }
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn store(&self, record: Record, writer: &Principal, mode: WriteMode) -> DirectoryResult<Record> {
        self.check_store(&record.key).await?;

        if &record.owner != writer {
            return Err(DirectoryError::Forbidden(record.key));
        }

        let mut records = self.records.write().await;
        let current = records.get(&record.key);

        let actual = current.and_then(|c| c.version);
        if mode == WriteMode::Versioned && actual != record.version {
            return Err(DirectoryError::Conflict {
                key: record.key,
                expected: record.version,
                actual,
            });
        }

        if let Some(current) = current {
            if &current.owner != writer {
                return Err(DirectoryError::Forbidden(record.key));
            }
        }

        let stored = Record {
            version: Some(actual.map_or(Version(1), Version::next)),
            ..record
        };
        records.insert(stored.key.clone(), stored.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn remove(&self, key: &RecordKey, writer: &Principal) -> DirectoryResult<bool> {
        self.check_remove(key).await?;

        let mut records = self.records.write().await;
        match records.get(key) {
            None => Ok(false),
            Some(current) if &current.owner != writer => Err(DirectoryError::Forbidden(key.clone())),
            Some(_) => {
                records.remove(key);
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
        }
    }
}
