//! Identity handles and the Identity Resolver contract
//!
//! The identity system is external: it issues agent and group handles, maps
//! login names to handles and owns group rosters. This module defines the
//! contract the contact layer consumes and an in-memory implementation.

pub mod memory_resolver;
pub mod resolver;
pub mod types;

pub use memory_resolver::{MemoryIdentityResolver, ResolverSnapshot};
pub use resolver::{IdentityError, IdentityResolver, IdentityResult};
pub use types::{AgentId, GroupId, Profile};
