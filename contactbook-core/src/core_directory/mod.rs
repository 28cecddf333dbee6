//! Directory Store contract and the fetch-modify-store discipline
//!
//! ## Architecture
//!
//! - **DirectoryStore**: external key-addressed store of opaque, versioned records
//! - **ContactContainer**: the only value type kept in those records
//! - **Directory**: fetch-or-fabricate, mutate, store back; no locking
//!
//! Records are owned by a [`Principal`]. Per-agent contact lists are private
//! to their agent, per-name group records to their group, and the group
//! registry and address book to the service identity.

pub mod container;
pub mod errors;
pub mod memory_store;
pub mod store;
pub mod sync;
pub mod types;

pub use container::ContactContainer;
pub use errors::{DirectoryError, DirectoryResult};
pub use memory_store::MemoryDirectoryStore;
pub use store::DirectoryStore;
pub use sync::{ConsistencyPolicy, Directory, Loaded, Modified, Mutation};
pub use types::{Principal, Record, RecordKey, Version, WriteMode};
