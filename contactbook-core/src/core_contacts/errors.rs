/*
    Contact service errors

    Idempotence results (already present, not present, already exists) are
    outcomes, not errors. Stale references never surface here either; they
    are counted on the listing that skipped them.
*/

use crate::core_directory::DirectoryError;
use crate::core_identity::IdentityError;
use crate::core_profile::ProfileError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContactError {
    /// Login name or handle does not resolve to an agent
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    /// Caller is not a member of the group owning the record
    #[error("Access to group {0} denied")]
    Forbidden(String),

    #[error("Invalid group name: {0:?}")]
    InvalidName(String),

    /// Directory store failure; the operation had no effect
    #[error("Storage failure: {0}")]
    Storage(#[from] DirectoryError),

    #[error("Identity failure: {0}")]
    Identity(IdentityError),

    #[error("User information service unavailable: {0}")]
    ProfileUnavailable(String),
}

impl From<IdentityError> for ContactError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::UnknownAgent(name) => ContactError::UnknownAgent(name),
            IdentityError::NotAMember { group, .. } => ContactError::Forbidden(group.to_string()),
            other => ContactError::Identity(other),
        }
    }
}

impl From<ProfileError> for ContactError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::UnknownAgent(id) => ContactError::UnknownAgent(id.to_string()),
            ProfileError::Unavailable(reason) => ContactError::ProfileUnavailable(reason),
        }
    }
}

pub type ContactResult<T> = Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_directory::RecordKey;
    use crate::core_identity::{AgentId, GroupId};

    #[test]
    fn test_identity_errors_are_classified() {
        let err: ContactError = IdentityError::UnknownAgent("zed".to_string()).into();
        assert_eq!(err, ContactError::UnknownAgent("zed".to_string()));

        let err: ContactError = IdentityError::NotAMember {
            group: GroupId::new("g1"),
            agent: AgentId::new("eve"),
        }
        .into();
        assert_eq!(err, ContactError::Forbidden("g1".to_string()));

        let err: ContactError = IdentityError::Unavailable("down".to_string()).into();
        assert!(matches!(err, ContactError::Identity(_)));
    }

    #[test]
    fn test_storage_and_profile_errors() {
        let err: ContactError = DirectoryError::Forbidden(RecordKey::address_book()).into();
        assert!(matches!(err, ContactError::Storage(_)));

        let err: ContactError = ProfileError::Unavailable("timeout".to_string()).into();
        assert_eq!(err.to_string(), "User information service unavailable: timeout");
    }
}
