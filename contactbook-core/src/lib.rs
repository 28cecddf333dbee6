//! Contactbook core
//!
//! Contact lists, named groups and a shared address book kept in an external
//! directory store, with group rosters held by an external identity system.

pub mod config;
pub mod core_contacts;
pub mod core_directory;
pub mod core_identity;
pub mod core_profile;
pub mod logging;
pub mod metrics;
pub mod test_utils;

pub use config::Config;
pub use core_contacts::{ContactError, ContactService, OpStatus};
pub use logging::{init_logging, LogLevel};
