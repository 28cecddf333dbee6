//! Contact, group and address book operations
//!
//! Every mutation is a fetch-modify-store round through
//! [`crate::core_directory::Directory`]; group rosters live with the
//! identity resolver.

pub mod address_book;
pub mod contacts;
pub mod errors;
pub mod groups;
pub mod membership;
pub mod service;
pub mod types;

pub use address_book::AddressBook;
pub use contacts::ContactDirectory;
pub use errors::{ContactError, ContactResult};
pub use groups::GroupRegistry;
pub use membership::GroupMembership;
pub use service::ContactService;
pub use types::{AddOutcome, ContactEntry, CreateOutcome, GroupHandle, Listing, OpStatus, RemoveOutcome};
