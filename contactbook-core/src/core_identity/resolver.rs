//! Identity Resolver Trait
//!
//! Bridges the contact layer to the host identity system: login names to
//! agent handles, handles back to profiles, and group agents with a member
//! list.

use super::types::{AgentId, GroupId, Profile};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by the identity system
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Login name or handle does not resolve to an agent
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Group handle does not resolve to a group agent
    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    /// Acting agent cannot unlock the group
    #[error("Agent {agent} is not a member of group {group}")]
    NotAMember { group: GroupId, agent: AgentId },

    /// Identity system could not be reached
    #[error("Identity system unavailable: {0}")]
    Unavailable(String),
}

/// Result type for identity operations
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity resolver trait
///
/// Membership enforcement lives here: every group mutation names the acting
/// agent and implementations must refuse it unless that agent is a member.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Map a login name to a stable agent handle
    async fn resolve_login(&self, login_name: &str) -> IdentityResult<AgentId>;

    /// Map an agent handle back to its profile
    async fn resolve_profile(&self, id: &AgentId) -> IdentityResult<Profile>;

    /// Create a group agent whose initial roster is `initial_members`
    async fn create_group(&self, initial_members: &[AgentId]) -> IdentityResult<GroupId>;

    /// Add `member` to `group`. Returns `false` if it was already a member.
    async fn add_group_member(
        &self,
        group: &GroupId,
        acting: &AgentId,
        member: &AgentId,
    ) -> IdentityResult<bool>;

    /// Revoke `member` from `group`. Returns `false` if it was not a member.
    async fn revoke_group_member(
        &self,
        group: &GroupId,
        acting: &AgentId,
        member: &AgentId,
    ) -> IdentityResult<bool>;

    /// List the members of `group` as seen by `acting`
    async fn group_members(&self, group: &GroupId, acting: &AgentId)
        -> IdentityResult<Vec<AgentId>>;

    /// Test whether `agent` belongs to `group`
    ///
    /// Returns `IdentityError::UnknownGroup` if the group no longer resolves.
    async fn is_group_member(&self, group: &GroupId, agent: &AgentId) -> IdentityResult<bool>;
}
