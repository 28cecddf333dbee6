//! The persisted contact container
//!
//! Every record in the directory carries one of these: contact lists use the
//! `contacts` set, the address book reuses it for opted-in agents, and group
//! records use the `groups` map.

use super::errors::{DirectoryError, DirectoryResult};
use super::types::RecordKey;
use crate::core_identity::{AgentId, GroupId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Set of contact handles plus a name-to-group map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactContainer {
    contacts: HashSet<AgentId>,
    groups: HashMap<String, GroupId>,
}

impl ContactContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a handle. Returns `false` if it was already present.
    pub fn add_contact(&mut self, id: AgentId) -> bool {
        self.contacts.insert(id)
    }

    /// Remove a handle. Returns `false` if it was not present.
    pub fn remove_contact(&mut self, id: &AgentId) -> bool {
        self.contacts.remove(id)
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.contacts.contains(id)
    }

    pub fn contacts(&self) -> impl Iterator<Item = &AgentId> {
        self.contacts.iter()
    }

    /// Map `name` to `id`, returning the previous mapping
    pub fn add_group(&mut self, name: impl Into<String>, id: GroupId) -> Option<GroupId> {
        self.groups.insert(name.into(), id)
    }

    pub fn remove_group(&mut self, name: &str) -> Option<GroupId> {
        self.groups.remove(name)
    }

    pub fn group_id(&self, name: &str) -> Option<&GroupId> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&String, &GroupId)> {
        self.groups.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.groups.is_empty()
    }

    pub fn to_bytes(&self) -> DirectoryResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode the content of the record filed under `key`
    pub fn from_bytes(key: &RecordKey, bytes: &[u8]) -> DirectoryResult<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| DirectoryError::Corrupted { key: key.clone(), reason: e.to_string() })
    }
}
