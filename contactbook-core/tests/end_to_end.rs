/*
    End-to-End Test - Contact Service

    Drives the public ContactService facade over the in-memory collaborators:
    - Contact lists (idempotent add/remove, unknown targets)
    - Group lifecycle (create, membership, visibility, deletion)
    - Address book
    - Stale references after agents or groups disappear
*/

use contactbook_core::core_contacts::{AddOutcome, ContactError, CreateOutcome, OpStatus, RemoveOutcome};
use contactbook_core::core_directory::{ContactContainer, DirectoryError, RecordKey};
use contactbook_core::test_utils::{assert_group_names, assert_lists, stored_container, TestWorld};

/// **Scenario: adam manages his contacts**
///
/// 1. adam adds eve and abel
/// 2. Listing shows both, each once
/// 3. Removing both empties the list
/// 4. Re-removing reports not-found
#[tokio::test]
async fn test_contact_list_lifecycle() {
    let world = TestWorld::new().await;
    let service = world.service();

    // Phase 1: add
    assert_eq!(service.add_contact(&world.adam, "eve").await.unwrap(), AddOutcome::Added);
    assert_eq!(service.add_contact(&world.adam, "eve").await.unwrap(), AddOutcome::AlreadyPresent);
    assert_eq!(service.add_contact(&world.adam, "abel").await.unwrap(), AddOutcome::Added);
    assert_lists(&service.list_contacts(&world.adam).await.unwrap(), &["eve", "abel"]);

    // Phase 2: remove
    assert_eq!(service.remove_contact(&world.adam, "eve").await.unwrap(), RemoveOutcome::Removed);
    assert_eq!(service.remove_contact(&world.adam, "abel").await.unwrap(), RemoveOutcome::Removed);
    assert_lists(&service.list_contacts(&world.adam).await.unwrap(), &[]);

    // Phase 3: idempotent removal
    for name in ["eve", "abel"] {
        let result = service.remove_contact(&world.adam, name).await;
        assert_eq!(OpStatus::of(&result), OpStatus::NotFound);
    }

    // The empty container persists
    let stored = stored_container(&world.store, &RecordKey::contacts(&world.adam)).await;
    assert_eq!(stored, Some(ContactContainer::new()));
}

#[tokio::test]
async fn test_unknown_target_never_mutates() {
    let world = TestWorld::new().await;
    let service = world.service();
    service.add_contact(&world.adam, "eve").await.unwrap();
    let writes = world.store.write_count();

    let result = service.add_contact(&world.adam, "no-such-login").await;
    assert_eq!(result, Err(ContactError::UnknownAgent("no-such-login".to_string())));
    assert_eq!(OpStatus::of(&result), OpStatus::UnknownAgent);
    assert_eq!(world.store.write_count(), writes);
    assert_lists(&service.list_contacts(&world.adam).await.unwrap(), &["eve"]);
}

#[tokio::test]
async fn test_contact_lists_are_per_owner() {
    let world = TestWorld::new().await;
    let service = world.service();

    service.add_contact(&world.adam, "eve").await.unwrap();
    service.add_contact(&world.eve, "abel").await.unwrap();

    assert_lists(&service.list_contacts(&world.adam).await.unwrap(), &["eve"]);
    assert_lists(&service.list_contacts(&world.eve).await.unwrap(), &["abel"]);
    assert_lists(&service.list_contacts(&world.abel).await.unwrap(), &[]);
}

/// **Scenario: a family group**
///
/// 1. adam creates "family"; eve's attempt to claim the name fails
/// 2. adam adds eve; both see the group, abel does not
/// 3. abel cannot read or modify the group
/// 4. adam deletes the group; the name becomes free again
#[tokio::test]
async fn test_group_lifecycle() {
    let world = TestWorld::new().await;
    let service = world.service();

    // Phase 1: unique names
    let family = match service.create_group(&world.adam, "family").await.unwrap() {
        CreateOutcome::Created(handle) => handle,
        CreateOutcome::AlreadyExists => panic!("name was free"),
    };
    assert_eq!(service.create_group(&world.eve, "family").await.unwrap(), CreateOutcome::AlreadyExists);
    let registry = stored_container(&world.store, &RecordKey::group_registry()).await.unwrap();
    assert_eq!(registry.groups().count(), 1);
    assert_eq!(registry.group_id("family"), Some(&family.id));

    // Phase 2: membership-scoped visibility
    assert_eq!(service.add_group_member(&world.adam, "family", "eve").await.unwrap(), AddOutcome::Added);
    assert_eq!(
        service.add_group_member(&world.eve, "family", "adam").await.unwrap(),
        AddOutcome::AlreadyPresent
    );
    assert_group_names(&service.list_groups(&world.adam).await.unwrap(), &["family"]);
    assert_group_names(&service.list_groups(&world.eve).await.unwrap(), &["family"]);
    assert_group_names(&service.list_groups(&world.abel).await.unwrap(), &[]);
    assert_lists(&service.list_group_members(&world.eve, "family").await.unwrap(), &["adam", "eve"]);

    // Phase 3: outsiders
    assert_eq!(
        service.get_group(&world.abel, "family").await,
        Err(ContactError::Forbidden("family".to_string()))
    );
    assert_eq!(
        service.remove_group_member(&world.abel, "family", "eve").await,
        Err(ContactError::Forbidden("family".to_string()))
    );
    assert_eq!(
        service.delete_group(&world.abel, "family").await,
        Err(ContactError::Forbidden("family".to_string()))
    );

    // Phase 4: deletion
    assert_eq!(service.delete_group(&world.adam, "family").await.unwrap(), RemoveOutcome::Removed);
    assert_group_names(&service.list_groups(&world.eve).await.unwrap(), &[]);
    assert!(matches!(service.create_group(&world.abel, "family").await.unwrap(), CreateOutcome::Created(_)));
}

#[tokio::test]
async fn test_group_creation_rolls_back_on_registry_failure() {
    let world = TestWorld::new().await;
    let service = world.service();
    world.store.fail_writes_to(RecordKey::group_registry()).await;

    let result = service.create_group(&world.adam, "team").await;
    assert!(matches!(result, Err(ContactError::Storage(DirectoryError::Unavailable(_)))));
    assert_eq!(OpStatus::of(&result), OpStatus::Error);

    // No per-name record and no membership is left behind
    assert_eq!(stored_container(&world.store, &RecordKey::group("team")).await, None);
    let snapshot = world.resolver.snapshot().await;
    assert!(snapshot.groups.values().all(|roster| !roster.contains(&world.adam)));
    assert_eq!(
        service.get_group(&world.adam, "team").await,
        Err(ContactError::GroupNotFound("team".to_string()))
    );
}

#[tokio::test]
async fn test_address_book_is_shared() {
    let world = TestWorld::new().await;
    let service = world.service();

    assert_eq!(service.join_address_book(&world.eve).await.unwrap(), AddOutcome::Added);
    assert_eq!(service.join_address_book(&world.eve).await.unwrap(), AddOutcome::AlreadyPresent);
    assert_eq!(service.join_address_book(&world.abel).await.unwrap(), AddOutcome::Added);

    // Same view regardless of caller; adam never joined
    assert_lists(&service.list_address_book().await.unwrap(), &["eve", "abel"]);
    assert_eq!(service.leave_address_book(&world.adam).await.unwrap(), RemoveOutcome::NotPresent);
    assert_eq!(service.leave_address_book(&world.eve).await.unwrap(), RemoveOutcome::Removed);
    assert_lists(&service.list_address_book().await.unwrap(), &["abel"]);
}

#[tokio::test]
async fn test_stale_references_are_counted_not_surfaced() {
    let world = TestWorld::new().await;
    let service = world.service();

    service.add_contact(&world.adam, "eve").await.unwrap();
    service.add_contact(&world.adam, "abel").await.unwrap();
    service.join_address_book(&world.abel).await.unwrap();
    let team = match service.create_group(&world.adam, "team").await.unwrap() {
        CreateOutcome::Created(handle) => handle,
        CreateOutcome::AlreadyExists => panic!("name was free"),
    };

    world.resolver.forget_agent(&world.abel).await;
    world.resolver.dissolve_group(&team.id).await;

    let contacts = service.list_contacts(&world.adam).await.unwrap();
    assert_eq!(contacts.display_names(), vec!["eve"]);
    assert_eq!(contacts.stale, 1);

    let book = service.list_address_book().await.unwrap();
    assert!(book.is_empty());
    assert_eq!(book.stale, 1);

    let groups = service.list_groups(&world.adam).await.unwrap();
    assert!(groups.is_empty());
    assert_eq!(groups.stale, 1);
}
