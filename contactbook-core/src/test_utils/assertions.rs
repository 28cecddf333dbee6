//! Assertion helpers

use crate::core_contacts::{ContactEntry, GroupHandle, Listing};
use crate::core_directory::{ContactContainer, DirectoryStore, MemoryDirectoryStore, RecordKey};

/// Assert a listing holds exactly `names`, in any order, with nothing stale
pub fn assert_lists(listing: &Listing<ContactEntry>, names: &[&str]) {
    let mut actual = listing.display_names();
    actual.sort_unstable();
    let mut expected = names.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected, "unexpected listing");
    assert_eq!(listing.stale, 0, "listing skipped stale references");
}

/// Assert a group listing holds exactly `names`
pub fn assert_group_names(listing: &Listing<GroupHandle>, names: &[&str]) {
    let actual: Vec<&str> = listing.entries.iter().map(|h| h.name.as_str()).collect();
    let mut expected = names.to_vec();
    expected.sort_unstable();
    assert_eq!(actual, expected, "unexpected group listing");
}

/// Decode the container stored under `key`, if any
pub async fn stored_container(store: &MemoryDirectoryStore, key: &RecordKey) -> Option<ContactContainer> {
    let record = store.fetch(key).await.expect("fetch from memory store")?;
    Some(ContactContainer::from_bytes(key, &record.content).expect("decodable container"))
}
