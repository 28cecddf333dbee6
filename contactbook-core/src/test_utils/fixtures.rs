//! Ready-made worlds for tests

use crate::core_contacts::ContactService;
use crate::core_directory::{ConsistencyPolicy, Directory, MemoryDirectoryStore};
use crate::core_identity::{AgentId, IdentityResolver, MemoryIdentityResolver};
use crate::core_profile::MemoryUserInformationService;
use std::sync::Arc;

/// In-memory collaborators with three registered users: `adam`, `eve` and `abel`
pub struct TestWorld {
    pub store: MemoryDirectoryStore,
    pub resolver: MemoryIdentityResolver,
    pub profiles: MemoryUserInformationService,
    pub adam: AgentId,
    pub eve: AgentId,
    pub abel: AgentId,
}

impl TestWorld {
    pub async fn new() -> Self {
        let resolver = MemoryIdentityResolver::new();
        let adam = resolver.register_user("adam").await;
        let eve = resolver.register_user("eve").await;
        let abel = resolver.register_user("abel").await;
        Self {
            store: MemoryDirectoryStore::new(),
            resolver,
            profiles: MemoryUserInformationService::new(),
            adam,
            eve,
            abel,
        }
    }

    pub fn resolver(&self) -> Arc<dyn IdentityResolver> {
        Arc::new(self.resolver.clone())
    }

    pub fn directory(&self) -> Directory {
        self.directory_with_policy(ConsistencyPolicy::default())
    }

    pub fn directory_with_policy(&self, policy: ConsistencyPolicy) -> Directory {
        Directory::new(Arc::new(self.store.clone()), policy)
    }

    pub fn service(&self) -> ContactService {
        self.service_with_policy(ConsistencyPolicy::default())
    }

    pub fn service_with_policy(&self, policy: ConsistencyPolicy) -> ContactService {
        ContactService::new(
            Arc::new(self.store.clone()),
            self.resolver(),
            Arc::new(self.profiles.clone()),
            policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_world_users_resolve() {
        let world = TestWorld::new().await;
        let resolver = world.resolver();

        assert_eq!(resolver.resolve_login("adam").await.unwrap(), world.adam);
        assert_eq!(resolver.resolve_profile(&world.abel).await.unwrap().login_name, "abel");
        assert_ne!(world.adam, world.eve);
        assert!(world.store.records().await.is_empty());
    }
}
