//! Store key layout
//!
//! - `services:lease:<lease_id>` lease record JSON, expires with the lease
//! - `services:<KIND>` set of endpoints of that kind
//! - `game:<game_id>` set of endpoints serving the game
//! - `game:<game_id>:meta` kind serving the game

use game_core::{GameId, ServiceKind};

pub const LEASE_PREFIX: &str = "services:lease:";
pub const KIND_PREFIX: &str = "services:";
pub const GAME_PREFIX: &str = "game:";
const META_SUFFIX: &str = ":meta";

pub fn lease_key(lease_id: &str) -> String {
    format!("{LEASE_PREFIX}{lease_id}")
}

pub fn kind_key(kind: ServiceKind) -> String {
    format!("{KIND_PREFIX}{}", kind.as_str())
}

pub fn game_key(game_id: GameId) -> String {
    format!("{GAME_PREFIX}{game_id}")
}

pub fn game_meta_key(game_id: GameId) -> String {
    format!("{GAME_PREFIX}{game_id}{META_SUFFIX}")
}

/// Whether a key under `services:` / `game:` is an endpoint set
pub fn is_index_key(key: &str) -> bool {
    if key.starts_with(LEASE_PREFIX) {
        return false;
    }
    if key.starts_with(GAME_PREFIX) {
        return !key.ends_with(META_SUFFIX);
    }
    key.starts_with(KIND_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(lease_key("abc"), "services:lease:abc");
        assert_eq!(kind_key(ServiceKind::Stateful), "services:STATEFUL");
        assert_eq!(game_key(1001), "game:1001");
        assert_eq!(game_meta_key(1001), "game:1001:meta");
    }

    #[test]
    fn test_index_key_classification() {
        assert!(is_index_key("services:STATELESS"));
        assert!(is_index_key("game:1001"));
        assert!(!is_index_key("game:1001:meta"));
        assert!(!is_index_key("services:lease:abc"));
        assert!(!is_index_key("wallet:u1"));
    }
}
