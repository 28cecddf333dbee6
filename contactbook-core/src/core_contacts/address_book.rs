//! Address Book
//!
//! One public record shared by every agent, written as the service. Listing
//! is not filtered by caller.

use super::contacts::resolve_entries;
use super::errors::ContactResult;
use super::types::{AddOutcome, ContactEntry, Listing, RemoveOutcome};
use crate::core_directory::{Directory, Mutation, Principal, RecordKey};
use crate::core_identity::{AgentId, IdentityResolver};
use std::sync::Arc;

#[derive(Clone)]
pub struct AddressBook {
    directory: Directory,
    resolver: Arc<dyn IdentityResolver>,
}

impl AddressBook {
    pub fn new(directory: Directory, resolver: Arc<dyn IdentityResolver>) -> Self {
        Self { directory, resolver }
    }

    pub async fn join(&self, agent: &AgentId) -> ContactResult<AddOutcome> {
        let modified = self
            .directory
            .modify(&RecordKey::address_book(), &Principal::Service, true, &Principal::Service, |cc| {
                if cc.add_contact(agent.clone()) {
                    Mutation::Changed(AddOutcome::Added)
                } else {
                    Mutation::Unchanged(AddOutcome::AlreadyPresent)
                }
            })
            .await?;
        Ok(modified.value)
    }

    pub async fn leave(&self, agent: &AgentId) -> ContactResult<RemoveOutcome> {
        let modified = self
            .directory
            .modify(&RecordKey::address_book(), &Principal::Service, true, &Principal::Service, |cc| {
                if cc.remove_contact(agent) {
                    Mutation::Changed(RemoveOutcome::Removed)
                } else {
                    Mutation::Unchanged(RemoveOutcome::NotPresent)
                }
            })
            .await?;
        Ok(modified.value)
    }

    pub async fn list(&self) -> ContactResult<Listing<ContactEntry>> {
        match self.directory.fetch(&RecordKey::address_book()).await? {
            Some(loaded) => resolve_entries(self.resolver.as_ref(), loaded.container().contacts()).await,
            None => Ok(Listing::empty()),
        }
    }
}
