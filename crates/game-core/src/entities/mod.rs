//! Domain entities - core business objects

mod service;
mod user;

pub use service::{GameId, LeaseRecord, ServiceKind, ServiceRoute};
pub use user::User;
