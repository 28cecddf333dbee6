//! Operation outcomes and listing types

use super::errors::{ContactError, ContactResult};
use crate::core_identity::{AgentId, GroupId};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveOutcome {
    Removed,
    NotPresent,
}

/// Name-addressable group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupHandle {
    pub name: String,
    pub id: GroupId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    Created(GroupHandle),
    /// Another group already holds the name
    AlreadyExists,
}

/// Agent with its resolved display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEntry {
    pub id: AgentId,
    pub display_name: String,
}

/// Result of a lenient listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    pub entries: Vec<T>,
    /// References skipped because they no longer resolve
    pub stale: usize,
}

impl<T> Listing<T> {
    pub fn empty() -> Self {
        Listing { entries: Vec::new(), stale: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl Listing<ContactEntry> {
    pub fn display_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.display_name.as_str()).collect()
    }
}

/// User-visible status of any operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpStatus {
    Added,
    Removed,
    Already,
    NotFound,
    UnknownAgent,
    Forbidden,
    Error,
}

impl OpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpStatus::Added => "added",
            OpStatus::Removed => "removed",
            OpStatus::Already => "already",
            OpStatus::NotFound => "not-found",
            OpStatus::UnknownAgent => "unknown-agent",
            OpStatus::Forbidden => "forbidden",
            OpStatus::Error => "error",
        }
    }

    /// Status of a finished operation
    pub fn of<T>(result: &ContactResult<T>) -> Self
    where
        T: Clone + Into<OpStatus>,
    {
        match result {
            Ok(outcome) => outcome.clone().into(),
            Err(err) => err.into(),
        }
    }
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AddOutcome> for OpStatus {
    fn from(outcome: AddOutcome) -> Self {
        match outcome {
            AddOutcome::Added => OpStatus::Added,
            AddOutcome::AlreadyPresent => OpStatus::Already,
        }
    }
}

impl From<RemoveOutcome> for OpStatus {
    fn from(outcome: RemoveOutcome) -> Self {
        match outcome {
            RemoveOutcome::Removed => OpStatus::Removed,
            RemoveOutcome::NotPresent => OpStatus::NotFound,
        }
    }
}

impl From<CreateOutcome> for OpStatus {
    fn from(outcome: CreateOutcome) -> Self {
        match outcome {
            CreateOutcome::Created(_) => OpStatus::Added,
            CreateOutcome::AlreadyExists => OpStatus::Already,
        }
    }
}

impl From<&ContactError> for OpStatus {
    fn from(err: &ContactError) -> Self {
        match err {
            ContactError::UnknownAgent(_) => OpStatus::UnknownAgent,
            ContactError::GroupNotFound(_) => OpStatus::NotFound,
            ContactError::Forbidden(_) => OpStatus::Forbidden,
            ContactError::InvalidName(_)
            | ContactError::Storage(_)
            | ContactError::Identity(_)
            | ContactError::ProfileUnavailable(_) => OpStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_directory::DirectoryError;

    #[test]
    fn test_status_of_outcomes() {
        assert_eq!(OpStatus::of(&Ok(AddOutcome::Added)), OpStatus::Added);
        assert_eq!(OpStatus::of(&Ok(AddOutcome::AlreadyPresent)), OpStatus::Already);
        assert_eq!(OpStatus::of(&Ok(RemoveOutcome::NotPresent)), OpStatus::NotFound);
        assert_eq!(OpStatus::of(&Ok(CreateOutcome::AlreadyExists)), OpStatus::Already);
    }

    #[test]
    fn test_status_of_errors() {
        let unknown: ContactResult<AddOutcome> = Err(ContactError::UnknownAgent("zed".to_string()));
        assert_eq!(OpStatus::of(&unknown), OpStatus::UnknownAgent);

        let storage: ContactResult<RemoveOutcome> =
            Err(DirectoryError::Unavailable("down".to_string()).into());
        assert_eq!(OpStatus::of(&storage), OpStatus::Error);

        let forbidden: ContactResult<AddOutcome> = Err(ContactError::Forbidden("team".to_string()));
        assert_eq!(OpStatus::of(&forbidden).to_string(), "forbidden");

        let missing: ContactResult<AddOutcome> = Err(ContactError::GroupNotFound("team".to_string()));
        assert_eq!(OpStatus::of(&missing), OpStatus::NotFound);
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&OpStatus::UnknownAgent).unwrap(), "\"unknown-agent\"");
        assert_eq!(serde_json::to_string(&OpStatus::NotFound).unwrap(), "\"not-found\"");
    }
}
