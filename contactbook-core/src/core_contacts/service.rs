//! Contact Service
//!
//! Facade exposing every operation on behalf of an authenticated caller.
//! Each call is timed on `contacts.operation.duration_ms`.

use super::address_book::AddressBook;
use super::contacts::ContactDirectory;
use super::errors::{ContactError, ContactResult};
use super::groups::GroupRegistry;
use super::membership::GroupMembership;
use super::types::{AddOutcome, ContactEntry, CreateOutcome, GroupHandle, Listing, RemoveOutcome};
use crate::config::Config;
use crate::core_directory::{ConsistencyPolicy, Directory, DirectoryStore};
use crate::core_identity::{AgentId, IdentityResolver};
use crate::core_profile::{FieldPermissions, UserInformation, UserInformationService};
use crate::metrics::Timer;
use std::sync::Arc;
use tracing::{debug, info};

const OPERATION_HISTOGRAM: &str = "contacts.operation.duration_ms";

pub struct ContactService {
    contacts: ContactDirectory,
    groups: GroupRegistry,
    membership: GroupMembership,
    address_book: AddressBook,
    resolver: Arc<dyn IdentityResolver>,
    profiles: Arc<dyn UserInformationService>,
}

impl ContactService {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        resolver: Arc<dyn IdentityResolver>,
        profiles: Arc<dyn UserInformationService>,
        policy: ConsistencyPolicy,
    ) -> Self {
        let directory = Directory::new(store, policy);
        let membership = GroupMembership::new(resolver.clone());
        Self {
            contacts: ContactDirectory::new(directory.clone(), resolver.clone()),
            groups: GroupRegistry::new(directory.clone(), membership.clone()),
            membership,
            address_book: AddressBook::new(directory, resolver.clone()),
            resolver,
            profiles,
        }
    }

    pub fn from_config(
        config: &Config,
        store: Arc<dyn DirectoryStore>,
        resolver: Arc<dyn IdentityResolver>,
        profiles: Arc<dyn UserInformationService>,
    ) -> Self {
        info!(
            service = %config.service.name,
            policy = ?config.directory.consistency,
            "starting contact service"
        );
        Self::new(store, resolver, profiles, config.directory.consistency)
    }

    // Contacts

    pub async fn add_contact(&self, caller: &AgentId, name: &str) -> ContactResult<AddOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "add_contact");
        let result = self.contacts.add(caller, name).await;
        debug!(caller = %caller, contact = name, ?result, "add-contact");
        timer.stop();
        result
    }

    pub async fn remove_contact(&self, caller: &AgentId, name: &str) -> ContactResult<RemoveOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "remove_contact");
        let result = self.contacts.remove(caller, name).await;
        debug!(caller = %caller, contact = name, ?result, "remove-contact");
        timer.stop();
        result
    }

    pub async fn list_contacts(&self, caller: &AgentId) -> ContactResult<Listing<ContactEntry>> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "list_contacts");
        let result = self.contacts.list(caller).await;
        timer.stop();
        result
    }

    // Groups

    pub async fn create_group(&self, caller: &AgentId, name: &str) -> ContactResult<CreateOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "create_group");
        let result = self.groups.create(caller, name).await;
        timer.stop();
        result
    }

    pub async fn get_group(&self, caller: &AgentId, name: &str) -> ContactResult<GroupHandle> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "get_group");
        let result = self.groups.get(caller, name).await;
        timer.stop();
        result
    }

    pub async fn delete_group(&self, caller: &AgentId, name: &str) -> ContactResult<RemoveOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "delete_group");
        let result = self.groups.delete(caller, name).await;
        timer.stop();
        result
    }

    pub async fn list_groups(&self, caller: &AgentId) -> ContactResult<Listing<GroupHandle>> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "list_groups");
        let result = self.groups.list(caller).await;
        timer.stop();
        result
    }

    pub async fn list_group_members(&self, caller: &AgentId, group: &str) -> ContactResult<Listing<ContactEntry>> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "list_group_members");
        let result = async {
            let handle = self.groups.get(caller, group).await?;
            self.membership.members(&handle, caller).await
        }
        .await;
        timer.stop();
        result
    }

    pub async fn add_group_member(&self, caller: &AgentId, group: &str, user: &str) -> ContactResult<AddOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "add_group_member");
        let result = async {
            let handle = self.groups.get(caller, group).await?;
            let member = self.resolver.resolve_login(user).await?;
            self.membership.add(&handle, caller, &member).await
        }
        .await;
        debug!(caller = %caller, group, member = user, ?result, "add-group-member");
        timer.stop();
        result
    }

    pub async fn remove_group_member(
        &self,
        caller: &AgentId,
        group: &str,
        user: &str,
    ) -> ContactResult<RemoveOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "remove_group_member");
        let result = async {
            let handle = self.groups.get(caller, group).await?;
            let member = self.resolver.resolve_login(user).await?;
            self.membership.remove(&handle, caller, &member).await
        }
        .await;
        debug!(caller = %caller, group, member = user, ?result, "remove-group-member");
        timer.stop();
        result
    }

    // Address book

    pub async fn join_address_book(&self, caller: &AgentId) -> ContactResult<AddOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "join_address_book");
        let result = self.address_book.join(caller).await;
        timer.stop();
        result
    }

    pub async fn leave_address_book(&self, caller: &AgentId) -> ContactResult<RemoveOutcome> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "leave_address_book");
        let result = self.address_book.leave(caller).await;
        timer.stop();
        result
    }

    pub async fn list_address_book(&self) -> ContactResult<Listing<ContactEntry>> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "list_address_book");
        let result = self.address_book.list().await;
        timer.stop();
        result
    }

    // User information

    pub async fn update_user_information(&self, caller: &AgentId, info: UserInformation) -> ContactResult<()> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "update_user_information");
        let result = self.profiles.set(caller, info).await.map_err(ContactError::from);
        timer.stop();
        result
    }

    pub async fn get_user_information(&self, caller: &AgentId) -> ContactResult<UserInformation> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "get_user_information");
        let result = self.profiles.get(caller, caller).await.map_err(ContactError::from);
        timer.stop();
        result
    }

    /// Information of the user logged in as `name`, filtered by their permissions
    pub async fn get_user_information_for(&self, caller: &AgentId, name: &str) -> ContactResult<UserInformation> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "get_user_information_for");
        let result = match self.resolver.resolve_login(name).await {
            Ok(target) => self.profiles.get(&target, caller).await.map_err(ContactError::from),
            Err(e) => Err(e.into()),
        };
        timer.stop();
        result
    }

    pub async fn get_permissions(&self, caller: &AgentId) -> ContactResult<FieldPermissions> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "get_permissions");
        let result = self.profiles.get_permissions(caller).await.map_err(ContactError::from);
        timer.stop();
        result
    }

    pub async fn update_permissions(&self, caller: &AgentId, permissions: FieldPermissions) -> ContactResult<()> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "update_permissions");
        let result = self.profiles.set_permissions(caller, permissions).await.map_err(ContactError::from);
        timer.stop();
        result
    }

    /// Login name of the agent `id`
    pub async fn lookup_name(&self, id: &AgentId) -> ContactResult<String> {
        let timer = Timer::new(OPERATION_HISTOGRAM, "lookup_name");
        let result = self
            .resolver
            .resolve_profile(id)
            .await
            .map(|profile| profile.login_name)
            .map_err(ContactError::from);
        timer.stop();
        result
    }
}
