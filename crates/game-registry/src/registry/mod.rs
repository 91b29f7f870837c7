//! Service registry

mod cleanup;
pub mod keys;
mod service_registry;

pub use cleanup::spawn_cleanup_task;
pub use service_registry::{CleanupReport, ServiceRegistry, DEFAULT_LEASE_TTL};
