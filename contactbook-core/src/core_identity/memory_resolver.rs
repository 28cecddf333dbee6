//! In-memory identity resolver
//!
//! Non-persistent agent registry used by tests and by the local CLI node.
//! State can be exported as a [`ResolverSnapshot`] and restored later.

use super::resolver::{IdentityError, IdentityResolver, IdentityResult};
use super::types::{AgentId, GroupId, Profile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Serializable copy of the resolver state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverSnapshot {
    pub agents: HashMap<AgentId, String>,
    pub groups: HashMap<GroupId, BTreeSet<AgentId>>,
}

#[derive(Default)]
struct Registry {
    agents: HashMap<AgentId, String>,
    logins: HashMap<String, AgentId>,
    groups: HashMap<GroupId, BTreeSet<AgentId>>,
}

impl Registry {
    fn roster_for(&self, group: &GroupId, acting: &AgentId) -> IdentityResult<&BTreeSet<AgentId>> {
        let roster = self
            .groups
            .get(group)
            .ok_or_else(|| IdentityError::UnknownGroup(group.clone()))?;
        if !roster.contains(acting) {
            return Err(IdentityError::NotAMember { group: group.clone(), agent: acting.clone() });
        }
        Ok(roster)
    }
}

/// In-memory identity resolver (for tests and the local node)
#[derive(Clone, Default)]
pub struct MemoryIdentityResolver {
    registry: Arc<RwLock<Registry>>,
}

impl MemoryIdentityResolver {
    /// Create an empty resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a resolver from a snapshot
    pub fn from_snapshot(snapshot: ResolverSnapshot) -> Self {
        let logins = snapshot
            .agents
            .iter()
            .map(|(id, login)| (login.clone(), id.clone()))
            .collect();
        let registry = Registry { agents: snapshot.agents, logins, groups: snapshot.groups };
        Self { registry: Arc::new(RwLock::new(registry)) }
    }

    /// Export the current state
    pub async fn snapshot(&self) -> ResolverSnapshot {
        let registry = self.registry.read().await;
        ResolverSnapshot { agents: registry.agents.clone(), groups: registry.groups.clone() }
    }

    /// Register a user agent under `login_name`
    ///
    /// Registering a login twice returns the existing handle.
    pub async fn register_user(&self, login_name: &str) -> AgentId {
        let mut registry = self.registry.write().await;
        if let Some(existing) = registry.logins.get(login_name) {
            return existing.clone();
        }
        let id = AgentId::generate();
        registry.agents.insert(id.clone(), login_name.to_string());
        registry.logins.insert(login_name.to_string(), id.clone());
        debug!(login = login_name, agent = %id, "registered user agent");
        id
    }

    /// Drop an agent so that handles referencing it become stale
    pub async fn forget_agent(&self, id: &AgentId) -> bool {
        let mut registry = self.registry.write().await;
        match registry.agents.remove(id) {
            Some(login) => {
                registry.logins.remove(&login);
                true
            }
            None => false,
        }
    }

    /// Drop a group agent so that registry entries referencing it become stale
    pub async fn dissolve_group(&self, group: &GroupId) -> bool {
        self.registry.write().await.groups.remove(group).is_some()
    }

    /// Number of known group agents, including orphaned ones
    pub async fn group_count(&self) -> usize {
        self.registry.read().await.groups.len()
    }
}

#[async_trait]
impl IdentityResolver for MemoryIdentityResolver {
    async fn resolve_login(&self, login_name: &str) -> IdentityResult<AgentId> {
        self.registry
            .read()
            .await
            .logins
            .get(login_name)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownAgent(login_name.to_string()))
    }

    async fn resolve_profile(&self, id: &AgentId) -> IdentityResult<Profile> {
        self.registry
            .read()
            .await
            .agents
            .get(id)
            .map(|login| Profile::new(id.clone(), login.clone()))
            .ok_or_else(|| IdentityError::UnknownAgent(id.to_string()))
    }

    async fn create_group(&self, initial_members: &[AgentId]) -> IdentityResult<GroupId> {
        let mut registry = self.registry.write().await;
        for member in initial_members {
            if !registry.agents.contains_key(member) {
                return Err(IdentityError::UnknownAgent(member.to_string()));
            }
        }
        let id = GroupId::generate();
        registry.groups.insert(id.clone(), initial_members.iter().cloned().collect());
        Ok(id)
    }

    async fn add_group_member(
        &self,
        group: &GroupId,
        acting: &AgentId,
        member: &AgentId,
    ) -> IdentityResult<bool> {
        let mut registry = self.registry.write().await;
        registry.roster_for(group, acting)?;
        if !registry.agents.contains_key(member) {
            return Err(IdentityError::UnknownAgent(member.to_string()));
        }
        let roster = registry
            .groups
            .get_mut(group)
            .ok_or_else(|| IdentityError::UnknownGroup(group.clone()))?;
        Ok(roster.insert(member.clone()))
    }

    async fn revoke_group_member(
        &self,
        group: &GroupId,
        acting: &AgentId,
        member: &AgentId,
    ) -> IdentityResult<bool> {
        let mut registry = self.registry.write().await;
        registry.roster_for(group, acting)?;
        let roster = registry
            .groups
            .get_mut(group)
            .ok_or_else(|| IdentityError::UnknownGroup(group.clone()))?;
        Ok(roster.remove(member))
    }

    async fn group_members(
        &self,
        group: &GroupId,
        acting: &AgentId,
    ) -> IdentityResult<Vec<AgentId>> {
        let registry = self.registry.read().await;
        Ok(registry.roster_for(group, acting)?.iter().cloned().collect())
    }

    async fn is_group_member(&self, group: &GroupId, agent: &AgentId) -> IdentityResult<bool> {
        self.registry
            .read()
            .await
            .groups
            .get(group)
            .map(|roster| roster.contains(agent))
            .ok_or_else(|| IdentityError::UnknownGroup(group.clone()))
    }
}
