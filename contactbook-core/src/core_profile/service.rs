//! User Information Service Trait
//!
//! Secondary service holding profile fields and their visibility. The contact
//! layer only forwards calls to it.

use super::types::{FieldPermissions, UserInformation};
use crate::core_identity::AgentId;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the user information service
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("User information service unavailable: {0}")]
    Unavailable(String),

    #[error("No user information for agent {0}")]
    UnknownAgent(AgentId),
}

/// Result type for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

#[async_trait]
pub trait UserInformationService: Send + Sync {
    /// Replace the information stored for `agent`
    async fn set(&self, agent: &AgentId, info: UserInformation) -> ProfileResult<()>;

    /// Read `agent`'s information as seen by `requester`
    ///
    /// Owners see every field; anyone else only the fields `agent` made visible.
    async fn get(&self, agent: &AgentId, requester: &AgentId) -> ProfileResult<UserInformation>;

    async fn get_permissions(&self, agent: &AgentId) -> ProfileResult<FieldPermissions>;

    async fn set_permissions(&self, agent: &AgentId, permissions: FieldPermissions) -> ProfileResult<()>;
}
