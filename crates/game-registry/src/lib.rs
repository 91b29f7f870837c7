//! # game-registry
//!
//! Central directory of live game service instances.
//!
//! Backends hold a TTL lease that they renew by heartbeat; the registry
//! indexes their endpoints by service kind and by game ID so gateways can
//! route players. A periodic cleanup pass drops index entries whose lease
//! expired without a deregister. The same process also serves player login.

pub mod error;
pub mod handlers;
pub mod login;
pub mod registry;
pub mod server;

pub use error::{RegistryError, RegistryResult};
pub use login::{LoginService, FIRST_GUEST_ID};
pub use registry::{spawn_cleanup_task, CleanupReport, ServiceRegistry, DEFAULT_LEASE_TTL};
pub use server::{create_app, create_registry_state, create_router, run, run_server, RegistryState};
