//! Group Registry
//!
//! Two records per group name:
//!
//! - `groups_<name>`: private, owned by the group agent, holding the single
//!   `name -> handle` mapping. Only members can read or rewrite it.
//! - `groups_`: public registry owned by the service, mapping every name to
//!   its handle for discovery.
//!
//! Creating and deleting a group touch both. A failure on the second write
//! undoes the first before the original error is returned. Undo steps are
//! best-effort: when one fails too, the caller keeps their membership so that
//! `delete` can clear the leftover per-name record once the store recovers.

use super::errors::{ContactError, ContactResult};
use super::membership::GroupMembership;
use super::types::{CreateOutcome, GroupHandle, Listing, RemoveOutcome};
use crate::core_directory::{Directory, DirectoryError, Mutation, Principal, RecordKey};
use crate::core_identity::{AgentId, GroupId};
use crate::metrics::record_counter;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct GroupRegistry {
    directory: Directory,
    membership: GroupMembership,
}

fn validate_name(name: &str) -> ContactResult<()> {
    if name.trim().is_empty() {
        return Err(ContactError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl GroupRegistry {
    pub fn new(directory: Directory, membership: GroupMembership) -> Self {
        Self { directory, membership }
    }

    /// Create a group named `name` with `owner` as its sole member
    pub async fn create(&self, owner: &AgentId, name: &str) -> ContactResult<CreateOutcome> {
        validate_name(name)?;
        let key = RecordKey::group(name);

        if self.directory.fetch(&key).await?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        let id = self.membership.create(owner).await?;
        let handle = GroupHandle { name: name.to_string(), id: id.clone() };
        let group = Principal::Group(id.clone());

        let mut loaded = self.directory.load(&key, group.clone(), false).await?;
        loaded.container_mut().add_group(name, id.clone());
        if let Err(e) = self.directory.create(loaded, &group).await {
            self.revoke_creator(&id, owner).await;
            if e.is_conflict() {
                debug!(group = name, "lost race for group name");
                return Ok(CreateOutcome::AlreadyExists);
            }
            return Err(e.into());
        }

        if let Err(e) = self.register(name, &id).await {
            warn!(group = name, error = %e, "registry write failed, rolling back group creation");
            record_counter("groups.compensations", 1);
            match self.directory.remove(&key, &group).await {
                Ok(_) => self.revoke_creator(&id, owner).await,
                Err(undo) => {
                    warn!(group = name, error = %undo, "group record left behind, creator keeps membership");
                }
            }
            return Err(e.into());
        }

        info!(group = name, id = %id, "created group");
        Ok(CreateOutcome::Created(handle))
    }

    /// Look up a group by name on behalf of `caller`
    pub async fn get(&self, caller: &AgentId, name: &str) -> ContactResult<GroupHandle> {
        let loaded = self
            .directory
            .fetch(&RecordKey::group(name))
            .await?
            .ok_or_else(|| ContactError::GroupNotFound(name.to_string()))?;

        let owner = match &loaded.record().owner {
            Principal::Group(id) => id.clone(),
            other => {
                return Err(DirectoryError::Corrupted {
                    key: loaded.record().key.clone(),
                    reason: format!("group record owned by {}", other),
                }
                .into());
            }
        };

        let handle = GroupHandle { name: name.to_string(), id: owner };
        self.membership.act_as(&handle, caller).await?;

        match loaded.container().group_id(name) {
            Some(id) if *id == handle.id => Ok(handle),
            _ => Err(ContactError::GroupNotFound(name.to_string())),
        }
    }

    /// Groups from the public registry that `caller` belongs to
    pub async fn list(&self, caller: &AgentId) -> ContactResult<Listing<GroupHandle>> {
        let mut listing = Listing::empty();
        let Some(registry) = self.directory.fetch(&RecordKey::group_registry()).await? else {
            return Ok(listing);
        };

        for (name, id) in registry.container().groups() {
            match self.membership.is_member(id, caller).await? {
                Some(true) => listing.entries.push(GroupHandle { name: name.clone(), id: id.clone() }),
                Some(false) => {}
                None => {
                    debug!(group = %name, id = %id, "skipping stale group reference");
                    listing.stale += 1;
                }
            }
        }
        if listing.stale > 0 {
            record_counter("contacts.stale_references", listing.stale as u64);
        }
        listing.entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(listing)
    }

    /// Delete the name `name` and revoke `caller`'s membership
    ///
    /// Other members keep their membership of the group agent, which is no
    /// longer reachable by name afterwards.
    pub async fn delete(&self, caller: &AgentId, name: &str) -> ContactResult<RemoveOutcome> {
        let handle = self.get(caller, name).await?;
        let group = Principal::Group(handle.id.clone());

        let unregistered = self.unregister(name, &handle.id).await?;

        if let Err(e) = self.directory.remove(&RecordKey::group(name), &group).await {
            if unregistered {
                warn!(group = name, error = %e, "group record removal failed, restoring registry entry");
                record_counter("groups.compensations", 1);
                if let Err(undo) = self.register(name, &handle.id).await {
                    warn!(group = name, error = %undo, "registry entry not restored");
                }
            }
            return Err(e.into());
        }

        self.membership.leave(&handle.id, caller).await?;
        info!(group = name, id = %handle.id, "deleted group");
        Ok(RemoveOutcome::Removed)
    }

    async fn revoke_creator(&self, id: &GroupId, creator: &AgentId) {
        if let Err(e) = self.membership.leave(id, creator).await {
            warn!(group = %id, error = %e, "could not revoke creator from abandoned group");
        }
    }

    async fn register(&self, name: &str, id: &GroupId) -> Result<(), DirectoryError> {
        let key = RecordKey::group_registry();
        self.directory
            .modify(&key, &Principal::Service, true, &Principal::Service, |cc| {
                if cc.group_id(name) == Some(id) {
                    Mutation::Unchanged(())
                } else {
                    cc.add_group(name, id.clone());
                    Mutation::Changed(())
                }
            })
            .await?;
        Ok(())
    }

    async fn unregister(&self, name: &str, id: &GroupId) -> Result<bool, DirectoryError> {
        let key = RecordKey::group_registry();
        let modified = self
            .directory
            .modify(&key, &Principal::Service, true, &Principal::Service, |cc| {
                if cc.group_id(name) == Some(id) {
                    cc.remove_group(name);
                    Mutation::Changed(true)
                } else {
                    Mutation::Unchanged(false)
                }
            })
            .await?;
        Ok(modified.value)
    }
}
