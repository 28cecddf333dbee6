//! Contact Directory
//!
//! One private record per agent under `contacts_<agentId>`, written by that
//! agent only.

use super::errors::ContactResult;
use super::types::{AddOutcome, ContactEntry, Listing, RemoveOutcome};
use crate::core_directory::{Directory, Mutation, Principal, RecordKey};
use crate::core_identity::{AgentId, IdentityError, IdentityResolver};
use crate::metrics::record_counter;
use std::sync::Arc;
use tracing::debug;

/// Resolve `ids` to display names, skipping and counting the stale ones
pub(crate) async fn resolve_entries<'a, I>(
    resolver: &dyn IdentityResolver,
    ids: I,
) -> ContactResult<Listing<ContactEntry>>
where
    I: IntoIterator<Item = &'a AgentId>,
{
    let mut listing = Listing::empty();
    for id in ids {
        match resolver.resolve_profile(id).await {
            Ok(profile) => listing.entries.push(ContactEntry {
                display_name: profile.display_name().to_string(),
                id: profile.id,
            }),
            Err(IdentityError::UnknownAgent(_)) => {
                debug!(agent = %id, "skipping stale agent reference");
                listing.stale += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    if listing.stale > 0 {
        record_counter("contacts.stale_references", listing.stale as u64);
    }
    listing
        .entries
        .sort_by(|a, b| a.display_name.cmp(&b.display_name).then_with(|| a.id.cmp(&b.id)));
    Ok(listing)
}

/// Per-agent contact lists
#[derive(Clone)]
pub struct ContactDirectory {
    directory: Directory,
    resolver: Arc<dyn IdentityResolver>,
}

impl ContactDirectory {
    pub fn new(directory: Directory, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { directory, resolver }
    }

    /// Add the agent logged in as `login_name` to `owner`'s contacts
    ///
    /// An unknown login fails before the store is touched.
    pub async fn add(&self, owner: &AgentId, login_name: &str) -> ContactResult<AddOutcome> {
        let target = self.resolver.resolve_login(login_name).await?;
        let principal = Principal::Agent(owner.clone());

        let modified = self
            .directory
            .modify(&RecordKey::contacts(owner), &principal, false, &principal, |cc| {
                if cc.add_contact(target.clone()) {
                    Mutation::Changed(AddOutcome::Added)
                } else {
                    Mutation::Unchanged(AddOutcome::AlreadyPresent)
                }
            })
            .await?;
        Ok(modified.value)
    }

    /// Remove the agent logged in as `login_name` from `owner`'s contacts
    ///
    /// A list that was never created yields `NotPresent` and stays absent.
    pub async fn remove(&self, owner: &AgentId, login_name: &str) -> ContactResult<RemoveOutcome> {
        let target = self.resolver.resolve_login(login_name).await?;
        let principal = Principal::Agent(owner.clone());

        let modified = self
            .directory
            .modify(&RecordKey::contacts(owner), &principal, false, &principal, |cc| {
                if cc.remove_contact(&target) {
                    Mutation::Changed(RemoveOutcome::Removed)
                } else {
                    Mutation::Unchanged(RemoveOutcome::NotPresent)
                }
            })
            .await?;
        Ok(modified.value)
    }

    pub async fn list(&self, owner: &AgentId) -> ContactResult<Listing<ContactEntry>> {
        match self.directory.fetch(&RecordKey::contacts(owner)).await? {
            Some(loaded) => resolve_entries(self.resolver.as_ref(), loaded.container().contacts()).await,
            None => Ok(Listing::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_contacts::ContactError;
    use crate::test_utils::TestWorld;

    async fn setup() -> (TestWorld, ContactDirectory) {
        let world = TestWorld::new().await;
        let contacts = ContactDirectory::new(world.directory(), world.resolver());
        (world, contacts)
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (world, contacts) = setup().await;

        assert_eq!(contacts.add(&world.adam, "eve").await.unwrap(), AddOutcome::Added);
        assert_eq!(contacts.add(&world.adam, "eve").await.unwrap(), AddOutcome::AlreadyPresent);
        assert_eq!(world.store.write_count(), 1);

        let listing = contacts.list(&world.adam).await.unwrap();
        assert_eq!(listing.display_names(), vec!["eve"]);
    }

    #[tokio::test]
    async fn test_remove_is_symmetric() {
        let (world, contacts) = setup().await;

        contacts.add(&world.adam, "abel").await.unwrap();
        assert_eq!(contacts.remove(&world.adam, "abel").await.unwrap(), RemoveOutcome::Removed);
        assert_eq!(contacts.remove(&world.adam, "abel").await.unwrap(), RemoveOutcome::NotPresent);
        assert!(contacts.list(&world.adam).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_from_missing_list_writes_nothing() {
        let (world, contacts) = setup().await;

        assert_eq!(contacts.remove(&world.eve, "adam").await.unwrap(), RemoveOutcome::NotPresent);
        assert_eq!(world.store.write_count(), 0);
        assert!(world.store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_login_never_touches_store() {
        let (world, contacts) = setup().await;

        let err = contacts.add(&world.adam, "no-such-login").await.unwrap_err();
        assert_eq!(err, ContactError::UnknownAgent("no-such-login".to_string()));
        let err = contacts.remove(&world.adam, "no-such-login").await.unwrap_err();
        assert_eq!(err, ContactError::UnknownAgent("no-such-login".to_string()));
        assert_eq!(world.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_list_missing_record_is_empty_and_not_persisted() {
        let (world, contacts) = setup().await;

        let listing = contacts.list(&world.abel).await.unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.stale, 0);
        assert!(world.store.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_contacts_are_skipped_and_counted() {
        let (world, contacts) = setup().await;

        contacts.add(&world.adam, "eve").await.unwrap();
        contacts.add(&world.adam, "abel").await.unwrap();
        world.resolver.forget_agent(&world.abel).await;

        let listing = contacts.list(&world.adam).await.unwrap();
        assert_eq!(listing.display_names(), vec!["eve"]);
        assert_eq!(listing.stale, 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let (world, contacts) = setup().await;
        world.store.fail_writes_to(RecordKey::contacts(&world.adam)).await;

        let err = contacts.add(&world.adam, "eve").await.unwrap_err();
        assert!(matches!(err, ContactError::Storage(_)));
        assert!(contacts.list(&world.adam).await.unwrap().is_empty());
    }
}
