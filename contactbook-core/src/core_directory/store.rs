//! Directory Store Trait
//!
//! Defines the interface of the host-provided, key-addressed object store.

use super::errors::DirectoryResult;
use super::types::{Principal, Record, RecordKey, WriteMode};
use async_trait::async_trait;

/// Key-addressed store of opaque, versioned records
///
/// Implementations must ensure:
/// - Only the record's owner may store or remove it
/// - A stored record's version is one greater than the version it replaced
/// - `WriteMode::Versioned` writes are rejected with `DirectoryError::Conflict`
///   when the stored version differs from the record's version. The version
///   is checked first, so a conditional create on a taken key conflicts even
///   when the writer does not own the stored record
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Fetch the record filed under `key`, `None` if absent
    async fn fetch(&self, key: &RecordKey) -> DirectoryResult<Option<Record>>;

    /// Fabricate an empty, unstored record bound to `key`
    async fn create(&self, key: &RecordKey, owner: Principal, public: bool) -> DirectoryResult<Record> {
        Ok(Record::fabricate(key.clone(), owner, public))
    }

    /// Store `record` as `writer`, returning the record with its new version
    async fn store(&self, record: Record, writer: &Principal, mode: WriteMode) -> DirectoryResult<Record>;

    /// Remove the record filed under `key`. Returns `false` if it was absent.
    async fn remove(&self, key: &RecordKey, writer: &Principal) -> DirectoryResult<bool>;
}
