//! Directory record types

use crate::core_identity::{AgentId, GroupId};
use serde::{Deserialize, Serialize};
use std::fmt;

const CONTACT_PREFIX: &str = "contacts";
const GROUP_PREFIX: &str = "groups";
const ADDRESS_BOOK_KEY: &str = "addressbook";

/// String key a record is filed under
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordKey(pub String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        RecordKey(key.into())
    }

    /// Contact list of one agent: `contacts_<agentId>`
    pub fn contacts(owner: &AgentId) -> Self {
        RecordKey(format!("{}_{}", CONTACT_PREFIX, owner))
    }

    /// Per-name group record: `groups_<name>`
    pub fn group(name: &str) -> Self {
        RecordKey(format!("{}_{}", GROUP_PREFIX, name))
    }

    /// Global group-name registry: `groups_`
    ///
    /// Group names are never empty, so this cannot collide with [`RecordKey::group`].
    pub fn group_registry() -> Self {
        RecordKey(format!("{}_", GROUP_PREFIX))
    }

    /// The shared address book
    pub fn address_book() -> Self {
        RecordKey(ADDRESS_BOOK_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic record version assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Identity a record is owned by or written as
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Principal {
    /// A user agent
    Agent(AgentId),
    /// A group agent; any member may act as it
    Group(GroupId),
    /// The fixed service identity owning the shared records
    Service,
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Agent(id) => write!(f, "agent:{}", id),
            Principal::Group(id) => write!(f, "group:{}", id),
            Principal::Service => write!(f, "service"),
        }
    }
}

/// How a store call treats the version carried by the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Reject the write unless the stored version equals the record's version
    Versioned,
    /// Overwrite whatever is stored
    Overwrite,
}

/// A versioned, opaque container as held by the Directory Store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub key: RecordKey,
    pub owner: Principal,
    /// Readable by any caller
    pub public: bool,
    /// `None` until the record has been stored once
    pub version: Option<Version>,
    pub content: Vec<u8>,
}

impl Record {
    /// Build an unstored, empty record bound to `key`
    pub fn fabricate(key: RecordKey, owner: Principal, public: bool) -> Self {
        Record { key, owner, public, version: None, content: Vec::new() }
    }

    pub fn is_stored(&self) -> bool {
        self.version.is_some()
    }
}
