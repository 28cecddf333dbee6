//! Local node state
//!
//! The CLI runs one operation per process, so the in-memory collaborators are
//! reloaded from and saved back to a JSON file around every command.

use anyhow::{Context, Result};
use contactbook_core::config::Config;
use contactbook_core::core_directory::{MemoryDirectoryStore, Record};
use contactbook_core::core_identity::{AgentId, IdentityResolver, MemoryIdentityResolver, ResolverSnapshot};
use contactbook_core::core_profile::{MemoryUserInformationService, ProfileEntry};
use contactbook_core::ContactService;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// On-disk layout of the state file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NodeState {
    pub records: Vec<Record>,
    pub identities: ResolverSnapshot,
    pub profiles: HashMap<AgentId, ProfileEntry>,
}

/// In-memory collaborators backed by a state file
pub struct Node {
    path: PathBuf,
    store: MemoryDirectoryStore,
    resolver: MemoryIdentityResolver,
    profiles: MemoryUserInformationService,
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw).with_context(|| format!("cannot expand path {}", raw))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

impl Node {
    /// Load the node from `path`; a missing file yields an empty node
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state: NodeState = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).with_context(|| format!("reading state file {}", path.display()))?;
            serde_json::from_str(&contents).with_context(|| format!("parsing state file {}", path.display()))?
        } else {
            debug!(path = %path.display(), "no state file yet, starting empty");
            NodeState::default()
        };

        Ok(Self {
            path,
            store: MemoryDirectoryStore::from_records(state.records),
            resolver: MemoryIdentityResolver::from_snapshot(state.identities),
            profiles: MemoryUserInformationService::from_entries(state.profiles),
        })
    }

    /// Write the current state back to the file, creating parent directories
    pub async fn save(&self) -> Result<()> {
        let state = NodeState {
            records: self.store.records().await,
            identities: self.resolver.snapshot().await,
            profiles: self.profiles.entries().await,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating state directory {}", parent.display()))?;
            }
        }
        let contents = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, contents).with_context(|| format!("writing state file {}", self.path.display()))?;
        Ok(())
    }

    pub async fn register(&self, login_name: &str) -> AgentId {
        self.resolver.register_user(login_name).await
    }

    /// Agent handle of the local user `login_name`
    pub async fn caller(&self, login_name: &str) -> Result<AgentId> {
        self.resolver
            .resolve_login(login_name)
            .await
            .with_context(|| format!("'{}' is not registered on this node", login_name))
    }

    pub fn service(&self, config: &Config) -> ContactService {
        ContactService::from_config(
            config,
            Arc::new(self.store.clone()),
            Arc::new(self.resolver.clone()),
            Arc::new(self.profiles.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_core::core_contacts::AddOutcome;

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let config = Config::default();

        let node = Node::open(&path).unwrap();
        let adam = node.register("adam").await;
        node.register("eve").await;
        let outcome = node.service(&config).add_contact(&adam, "eve").await.unwrap();
        assert_eq!(outcome, AddOutcome::Added);
        node.save().await.unwrap();

        let reopened = Node::open(&path).unwrap();
        assert_eq!(reopened.caller("adam").await.unwrap(), adam);
        let listing = reopened.service(&config).list_contacts(&adam).await.unwrap();
        assert_eq!(listing.display_names(), vec!["eve"]);
    }

    #[tokio::test]
    async fn test_unknown_caller() {
        let dir = tempfile::tempdir().unwrap();
        let node = Node::open(dir.path().join("state.json")).unwrap();
        assert!(node.caller("nobody").await.is_err());
    }

    #[test]
    fn test_corrupt_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Node::open(&path).is_err());
    }

    #[test]
    fn test_expand_path() {
        std::env::set_var("CONTACTBOOK_TEST_DIR", "/tmp/contactbook");
        let expanded = expand_path(Path::new("$CONTACTBOOK_TEST_DIR/state.json")).unwrap();
        assert_eq!(expanded, PathBuf::from("/tmp/contactbook/state.json"));
    }
}
