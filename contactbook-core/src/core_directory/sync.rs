//! Fetch-modify-store
//!
//! Every directory mutation follows the same pattern: fetch the record (or
//! fabricate an empty one), mutate the decoded container in memory, then store
//! it back. Nothing is locked in between.
//!
//! Two consistency policies are supported:
//!
//! - [`ConsistencyPolicy::Optimistic`]: the store call carries the version the
//!   record was fetched at. A concurrent writer makes the store reject the
//!   write; [`Directory::modify`] then refetches and re-runs the mutation.
//! - [`ConsistencyPolicy::LastWriterWins`]: the store call overwrites. Two
//!   overlapping mutations of one key can lose an update.

use super::container::ContactContainer;
use super::errors::{DirectoryError, DirectoryResult};
use super::store::DirectoryStore;
use super::types::{Principal, Record, RecordKey, WriteMode};
use crate::metrics::record_counter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// How concurrent writers to one key are reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// Version-checked stores, retried up to `max_retries` extra times
    Optimistic { max_retries: u32 },
    /// Unchecked stores
    LastWriterWins,
}

impl ConsistencyPolicy {
    pub fn write_mode(&self) -> WriteMode {
        match self {
            ConsistencyPolicy::Optimistic { .. } => WriteMode::Versioned,
            ConsistencyPolicy::LastWriterWins => WriteMode::Overwrite,
        }
    }

    pub fn max_retries(&self) -> u32 {
        match self {
            ConsistencyPolicy::Optimistic { max_retries } => *max_retries,
            ConsistencyPolicy::LastWriterWins => 0,
        }
    }
}

impl Default for ConsistencyPolicy {
    fn default() -> Self {
        ConsistencyPolicy::Optimistic { max_retries: 3 }
    }
}

/// A record together with its decoded container
#[derive(Debug, Clone)]
pub struct Loaded {
    record: Record,
    container: ContactContainer,
}

impl Loaded {
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn container(&self) -> &ContactContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut ContactContainer {
        &mut self.container
    }

    /// True if the record was fabricated and never stored
    pub fn is_new(&self) -> bool {
        !self.record.is_stored()
    }
}

/// Outcome of a mutation closure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<R> {
    /// Container changed and must be stored
    Changed(R),
    /// Container untouched; nothing is written
    Unchanged(R),
}

/// Result of [`Directory::modify`]
#[derive(Debug, Clone)]
pub struct Modified<R> {
    pub value: R,
    /// Stored record, `None` if the mutation changed nothing
    pub record: Option<Record>,
    /// Number of fetch-modify-store rounds it took
    pub attempts: u32,
}

/// Fetch-modify-store helper over a [`DirectoryStore`]
#[derive(Clone)]
pub struct Directory {
    store: Arc<dyn DirectoryStore>,
    policy: ConsistencyPolicy,
}

impl Directory {
    pub fn new(store: Arc<dyn DirectoryStore>, policy: ConsistencyPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> ConsistencyPolicy {
        self.policy
    }

    /// Fetch and decode the record under `key`, `None` if absent
    pub async fn fetch(&self, key: &RecordKey) -> DirectoryResult<Option<Loaded>> {
        record_counter("directory.fetch", 1);
        match self.store.fetch(key).await? {
            Some(record) => {
                let container = ContactContainer::from_bytes(key, &record.content)?;
                Ok(Some(Loaded { record, container }))
            }
            None => Ok(None),
        }
    }

    /// Fetch the record under `key`, fabricating an empty one if absent
    ///
    /// `owner` and `public` only apply to a fabricated record.
    pub async fn load(&self, key: &RecordKey, owner: Principal, public: bool) -> DirectoryResult<Loaded> {
        match self.fetch(key).await? {
            Some(loaded) => Ok(loaded),
            None => {
                debug!(key = %key, "record absent, fabricating empty container");
                let record = self.store.create(key, owner, public).await?;
                Ok(Loaded { record, container: ContactContainer::new() })
            }
        }
    }

    /// Encode the container into its record and store it under the policy's write mode
    pub async fn commit(&self, loaded: Loaded, writer: &Principal) -> DirectoryResult<Record> {
        self.write(loaded, writer, self.policy.write_mode()).await
    }

    /// Store a record that must not exist yet, whatever the policy
    pub async fn create(&self, loaded: Loaded, writer: &Principal) -> DirectoryResult<Record> {
        if !loaded.is_new() {
            return Err(DirectoryError::Conflict {
                key: loaded.record.key.clone(),
                expected: None,
                actual: loaded.record.version,
            });
        }
        self.write(loaded, writer, WriteMode::Versioned).await
    }

    /// Remove the record under `key` as `writer`
    pub async fn remove(&self, key: &RecordKey, writer: &Principal) -> DirectoryResult<bool> {
        let removed = self.store.remove(key, writer).await?;
        record_counter("directory.remove", 1);
        Ok(removed)
    }

    /// Run a full fetch-modify-store round on `key`
    ///
    /// The closure may run more than once under the optimistic policy, each
    /// time against a freshly fetched container, so it must not have side
    /// effects beyond the container.
    pub async fn modify<R, F>(
        &self,
        key: &RecordKey,
        owner: &Principal,
        public: bool,
        writer: &Principal,
        mut f: F,
    ) -> DirectoryResult<Modified<R>>
    where
        F: FnMut(&mut ContactContainer) -> Mutation<R> + Send,
        R: Send,
    {
        let max_retries = self.policy.max_retries();
        let mut attempts = 0;
        loop {
            attempts += 1;
            let mut loaded = self.load(key, owner.clone(), public).await?;
            let value = match f(loaded.container_mut()) {
                Mutation::Unchanged(value) => {
                    return Ok(Modified { value, record: None, attempts });
                }
                Mutation::Changed(value) => value,
            };

            match self.commit(loaded, writer).await {
                Ok(record) => return Ok(Modified { value, record: Some(record), attempts }),
                Err(e) if e.is_conflict() && attempts <= max_retries => {
                    record_counter("directory.retries", 1);
                    debug!(key = %key, attempts, "lost optimistic race, retrying");
                }
                Err(e) => {
                    if e.is_conflict() {
                        warn!(key = %key, attempts, "giving up after repeated conflicts");
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn write(&self, mut loaded: Loaded, writer: &Principal, mode: WriteMode) -> DirectoryResult<Record> {
        loaded.record.content = loaded.container.to_bytes()?;
        let key = loaded.record.key.clone();
        match self.store.store(loaded.record, writer, mode).await {
            Ok(record) => {
                record_counter("directory.store", 1);
                Ok(record)
            }
            Err(e) => {
                if e.is_conflict() {
                    record_counter("directory.conflicts", 1);
                }
                debug!(key = %key, error = %e, "store rejected write");
                Err(e)
            }
        }
    }
}
