//! In-memory user information service

use super::service::{ProfileError, ProfileResult, UserInformationService};
use super::types::{FieldPermissions, UserInformation};
use crate::core_identity::AgentId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stored profile of one agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub info: UserInformation,
    pub permissions: FieldPermissions,
}

/// In-memory user information service (for tests and the local node)
#[derive(Clone, Default)]
pub struct MemoryUserInformationService {
    entries: Arc<RwLock<HashMap<AgentId, ProfileEntry>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryUserInformationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: HashMap<AgentId, ProfileEntry>) -> Self {
        Self { entries: Arc::new(RwLock::new(entries)), ..Default::default() }
    }

    pub async fn entries(&self) -> HashMap<AgentId, ProfileEntry> {
        self.entries.read().await.clone()
    }

    /// Simulate the service being unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> ProfileResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ProfileError::Unavailable("service not reachable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserInformationService for MemoryUserInformationService {
    async fn set(&self, agent: &AgentId, info: UserInformation) -> ProfileResult<()> {
        self.check_available()?;
        self.entries.write().await.entry(agent.clone()).or_default().info = info;
        Ok(())
    }

    async fn get(&self, agent: &AgentId, requester: &AgentId) -> ProfileResult<UserInformation> {
        self.check_available()?;
        let entries = self.entries.read().await;
        let entry = entries.get(agent).ok_or_else(|| ProfileError::UnknownAgent(agent.clone()))?;
        if agent == requester {
            Ok(entry.info.clone())
        } else {
            Ok(entry.info.visible_under(&entry.permissions))
        }
    }

    async fn get_permissions(&self, agent: &AgentId) -> ProfileResult<FieldPermissions> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .await
            .get(agent)
            .map(|entry| entry.permissions)
            .unwrap_or_default())
    }

    async fn set_permissions(&self, agent: &AgentId, permissions: FieldPermissions) -> ProfileResult<()> {
        self.check_available()?;
        self.entries.write().await.entry(agent.clone()).or_default().permissions = permissions;
        Ok(())
    }
}
