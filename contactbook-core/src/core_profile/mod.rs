//! User information (profile) service contract

pub mod memory_service;
pub mod service;
pub mod types;

pub use memory_service::{MemoryUserInformationService, ProfileEntry};
pub use service::{ProfileError, ProfileResult, UserInformationService};
pub use types::{FieldPermissions, UserInformation};
