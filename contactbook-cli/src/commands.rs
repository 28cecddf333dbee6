//! Subcommands and their JSON replies

use crate::state::Node;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use contactbook_core::config::Config;
use contactbook_core::core_contacts::{ContactError, ContactResult, OpStatus};
use contactbook_core::core_identity::AgentId;
use contactbook_core::core_profile::{FieldPermissions, UserInformation};
use serde::Serialize;
use serde_json::{json, Value};
use std::process::ExitCode;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a local user
    Register { login: String },

    #[command(flatten)]
    User(UserCommand),
}

/// Commands run on behalf of the `--as` user
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Add a user to your contacts
    AddContact { name: String },
    /// Remove a user from your contacts
    RemoveContact { name: String },
    ListContacts,

    /// Create a group with yourself as its only member
    CreateGroup { name: String },
    GetGroup { name: String },
    /// Delete a group name and leave the group
    DeleteGroup { name: String },
    /// List the groups you belong to
    ListGroups,
    ListGroupMembers { group: String },
    AddGroupMember { group: String, user: String },
    RemoveGroupMember { group: String, user: String },

    JoinAddressBook,
    LeaveAddressBook,
    ListAddressBook,

    /// Replace your user information
    UpdateUserInformation {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        user_image: Option<String>,
    },
    /// Show your user information, or what another user lets you see
    GetUserInformation { name: Option<String> },
    GetPermissions,
    /// Choose which fields other users may see
    UpdatePermissions {
        #[arg(long)]
        first_name: bool,
        #[arg(long)]
        last_name: bool,
        #[arg(long)]
        user_image: bool,
    },
    /// Login name of an agent id
    LookupName { id: String },
}

/// Output of one command
#[derive(Debug)]
pub struct Reply {
    pub body: Value,
    pub failed: bool,
}

impl Reply {
    fn ok(body: Value) -> Self {
        Self { body, failed: false }
    }

    fn failed(err: &ContactError) -> Self {
        let status = OpStatus::from(err);
        Self { body: json!({ "status": status, "error": err.to_string() }), failed: true }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Reply for an idempotent mutation: its status plus the outcome
fn outcome<T>(result: ContactResult<T>) -> Result<Reply>
where
    T: Clone + Into<OpStatus> + Serialize,
{
    let status = OpStatus::of(&result);
    Ok(match result {
        Ok(value) => Reply::ok(json!({ "status": status, "result": serde_json::to_value(value)? })),
        Err(err) => Reply::failed(&err),
    })
}

/// Reply for a query
fn value<T: Serialize>(result: ContactResult<T>) -> Result<Reply> {
    Ok(match result {
        Ok(value) => Reply::ok(serde_json::to_value(value)?),
        Err(err) => Reply::failed(&err),
    })
}

pub async fn run(node: &Node, config: &Config, acting: Option<&str>, command: Command) -> Result<Reply> {
    match command {
        Command::Register { login } => {
            let id = node.register(&login).await;
            Ok(Reply::ok(json!({ "login": login, "id": id })))
        }
        Command::User(command) => {
            let login = acting.ok_or_else(|| anyhow!("this command needs --as <login>"))?;
            let caller = node.caller(login).await?;
            run_as(node, config, &caller, command).await
        }
    }
}

async fn run_as(node: &Node, config: &Config, caller: &AgentId, command: UserCommand) -> Result<Reply> {
    let service = node.service(config);

    match command {
        UserCommand::AddContact { name } => outcome(service.add_contact(caller, &name).await),
        UserCommand::RemoveContact { name } => outcome(service.remove_contact(caller, &name).await),
        UserCommand::ListContacts => value(service.list_contacts(caller).await),

        UserCommand::CreateGroup { name } => outcome(service.create_group(caller, &name).await),
        UserCommand::GetGroup { name } => value(service.get_group(caller, &name).await),
        UserCommand::DeleteGroup { name } => outcome(service.delete_group(caller, &name).await),
        UserCommand::ListGroups => value(service.list_groups(caller).await),
        UserCommand::ListGroupMembers { group } => value(service.list_group_members(caller, &group).await),
        UserCommand::AddGroupMember { group, user } => outcome(service.add_group_member(caller, &group, &user).await),
        UserCommand::RemoveGroupMember { group, user } => {
            outcome(service.remove_group_member(caller, &group, &user).await)
        }

        UserCommand::JoinAddressBook => outcome(service.join_address_book(caller).await),
        UserCommand::LeaveAddressBook => outcome(service.leave_address_book(caller).await),
        UserCommand::ListAddressBook => value(service.list_address_book().await),

        UserCommand::UpdateUserInformation { first_name, last_name, user_image } => {
            let info = UserInformation { first_name, last_name, user_image };
            value(service.update_user_information(caller, info).await.map(|()| json!({ "updated": true })))
        }
        UserCommand::GetUserInformation { name: Some(name) } => {
            value(service.get_user_information_for(caller, &name).await)
        }
        UserCommand::GetUserInformation { name: None } => value(service.get_user_information(caller).await),
        UserCommand::GetPermissions => value(service.get_permissions(caller).await),
        UserCommand::UpdatePermissions { first_name, last_name, user_image } => {
            let permissions = FieldPermissions { first_name, last_name, user_image };
            value(service.update_permissions(caller, permissions).await.map(|()| json!({ "updated": true })))
        }
        UserCommand::LookupName { id } => value(service.lookup_name(&AgentId::new(id)).await),
    }
}
