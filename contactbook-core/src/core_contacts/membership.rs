//! Group Membership Service
//!
//! Thin layer over the resolver's group agents. Membership enforcement stays
//! with the resolver: every call names the acting agent.

use super::contacts::resolve_entries;
use super::errors::{ContactError, ContactResult};
use super::types::{AddOutcome, ContactEntry, GroupHandle, Listing, RemoveOutcome};
use crate::core_directory::Principal;
use crate::core_identity::{AgentId, GroupId, IdentityError, IdentityResolver};
use std::sync::Arc;

#[derive(Clone)]
pub struct GroupMembership {
    resolver: Arc<dyn IdentityResolver>,
}

impl GroupMembership {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { resolver }
    }

    /// Create a group agent with `creator` as its sole member
    pub async fn create(&self, creator: &AgentId) -> ContactResult<GroupId> {
        Ok(self.resolver.create_group(std::slice::from_ref(creator)).await?)
    }

    /// Membership test; `None` if the group agent no longer exists
    pub async fn is_member(&self, group: &GroupId, agent: &AgentId) -> ContactResult<Option<bool>> {
        match self.resolver.is_group_member(group, agent).await {
            Ok(member) => Ok(Some(member)),
            Err(IdentityError::UnknownGroup(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Principal to write `handle`'s records as, if `agent` may act for the group
    pub async fn act_as(&self, handle: &GroupHandle, agent: &AgentId) -> ContactResult<Principal> {
        match self.is_member(&handle.id, agent).await? {
            Some(true) => Ok(Principal::Group(handle.id.clone())),
            Some(false) => Err(ContactError::Forbidden(handle.name.clone())),
            None => Err(ContactError::GroupNotFound(handle.name.clone())),
        }
    }

    pub async fn add(&self, handle: &GroupHandle, acting: &AgentId, member: &AgentId) -> ContactResult<AddOutcome> {
        let added = self
            .resolver
            .add_group_member(&handle.id, acting, member)
            .await
            .map_err(|e| scoped(e, handle))?;
        Ok(if added { AddOutcome::Added } else { AddOutcome::AlreadyPresent })
    }

    pub async fn remove(
        &self,
        handle: &GroupHandle,
        acting: &AgentId,
        member: &AgentId,
    ) -> ContactResult<RemoveOutcome> {
        let removed = self
            .resolver
            .revoke_group_member(&handle.id, acting, member)
            .await
            .map_err(|e| scoped(e, handle))?;
        Ok(if removed { RemoveOutcome::Removed } else { RemoveOutcome::NotPresent })
    }

    /// Revoke `agent`'s own membership, ignoring a group that is already gone
    pub async fn leave(&self, group: &GroupId, agent: &AgentId) -> ContactResult<bool> {
        match self.resolver.revoke_group_member(group, agent, agent).await {
            Ok(revoked) => Ok(revoked),
            Err(IdentityError::UnknownGroup(_)) | Err(IdentityError::NotAMember { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn members(&self, handle: &GroupHandle, acting: &AgentId) -> ContactResult<Listing<ContactEntry>> {
        let members = self
            .resolver
            .group_members(&handle.id, acting)
            .await
            .map_err(|e| scoped(e, handle))?;
        resolve_entries(self.resolver.as_ref(), &members).await
    }
}

/// Report group errors under the group's name rather than its handle
fn scoped(err: IdentityError, handle: &GroupHandle) -> ContactError {
    match err {
        IdentityError::UnknownGroup(_) => ContactError::GroupNotFound(handle.name.clone()),
        IdentityError::NotAMember { .. } => ContactError::Forbidden(handle.name.clone()),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestWorld;

    async fn setup() -> (TestWorld, GroupMembership, GroupHandle) {
        let world = TestWorld::new().await;
        let membership = GroupMembership::new(world.resolver());
        let id = membership.create(&world.adam).await.unwrap();
        let handle = GroupHandle { name: "team".to_string(), id };
        (world, membership, handle)
    }

    #[tokio::test]
    async fn test_creator_is_sole_member() {
        let (world, membership, handle) = setup().await;

        let members = membership.members(&handle, &world.adam).await.unwrap();
        assert_eq!(members.display_names(), vec!["adam"]);
        assert_eq!(membership.is_member(&handle.id, &world.eve).await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_add_and_remove_are_idempotent() {
        let (world, membership, handle) = setup().await;

        assert_eq!(membership.add(&handle, &world.adam, &world.eve).await.unwrap(), AddOutcome::Added);
        assert_eq!(
            membership.add(&handle, &world.adam, &world.eve).await.unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(membership.remove(&handle, &world.eve, &world.eve).await.unwrap(), RemoveOutcome::Removed);
        assert_eq!(
            membership.remove(&handle, &world.adam, &world.eve).await.unwrap(),
            RemoveOutcome::NotPresent
        );
    }

    #[tokio::test]
    async fn test_outsiders_are_forbidden() {
        let (world, membership, handle) = setup().await;

        let err = membership.add(&handle, &world.eve, &world.abel).await.unwrap_err();
        assert_eq!(err, ContactError::Forbidden("team".to_string()));
        let err = membership.act_as(&handle, &world.eve).await.unwrap_err();
        assert_eq!(err, ContactError::Forbidden("team".to_string()));
        assert_eq!(
            membership.act_as(&handle, &world.adam).await.unwrap(),
            Principal::Group(handle.id.clone())
        );
    }

    #[tokio::test]
    async fn test_dissolved_group() {
        let (world, membership, handle) = setup().await;
        world.resolver.dissolve_group(&handle.id).await;

        assert_eq!(membership.is_member(&handle.id, &world.adam).await.unwrap(), None);
        assert!(!membership.leave(&handle.id, &world.adam).await.unwrap());
        let err = membership.members(&handle, &world.adam).await.unwrap_err();
        assert_eq!(err, ContactError::GroupNotFound("team".to_string()));
    }
}
