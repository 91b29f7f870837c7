//! Port traits - the seams between domain logic and infrastructure

mod accounts;
mod services;
mod store;

pub use accounts::{UserDirectory, Wallet};
pub use services::{Authenticator, ConnectorService, GameService, RegistryApi, RouteLookup};
pub use store::LeaseStore;

use crate::error::DomainError;

/// Result type for port operations
pub type RepoResult<T> = Result<T, DomainError>;
