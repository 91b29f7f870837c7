//! Redis-backed store tests
//!
//! These tests require a running Redis instance and `REDIS_URL`; they skip
//! themselves otherwise.
//!
//! Run with: REDIS_URL=redis://127.0.0.1:6379 cargo test -p integration-tests --test redis_tests

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use game_cache::{RedisLeaseStore, RedisPool, RedisPoolConfig, RedisUserStore, RedisWallet};
use game_core::{ServiceKind, Wallet};
use game_registry::{LoginService, ServiceRegistry};
use integration_tests::redis_url;

fn pool(url: String) -> RedisPool {
    RedisPool::new(RedisPoolConfig {
        url,
        max_connections: 4,
    })
    .expect("Failed to create pool")
}

/// Suffix keeping keys of concurrent runs apart
fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_registry_over_redis() {
    let Some(url) = redis_url() else {
        return;
    };

    let store = Arc::new(RedisLeaseStore::new(pool(url)));
    let registry = ServiceRegistry::with_ttl(store, Duration::from_secs(5));

    // Game IDs from the high range so other data in the instance is untouched.
    let game_id = 1_900_000_000 + (unique_suffix() % 1_000_000) as i32;
    let endpoint = format!("10.0.0.1:{}", 20_000 + game_id % 1_000);

    let lease_id = registry
        .register(&endpoint, ServiceKind::Stateful, &[game_id])
        .await
        .unwrap();

    let route = registry.select_service_by_game(game_id).await.unwrap().unwrap();
    assert_eq!(route.endpoint, endpoint);
    assert_eq!(route.kind, ServiceKind::Stateful);

    registry.heartbeat(&lease_id, 3).await.unwrap();

    registry.deregister(&lease_id).await.unwrap();
    assert!(registry.select_service_by_game(game_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_over_redis_creates_guest() {
    let Some(url) = redis_url() else {
        return;
    };

    let pool = pool(url);
    let wallet = Arc::new(RedisWallet::new(pool.clone()));
    let login = LoginService::new(Arc::new(RedisUserStore::new(pool)), wallet.clone());

    let token = format!("it-token-{}", unique_suffix());
    let first = login.authenticate(&token).await.unwrap();
    let again = login.authenticate(&token).await.unwrap();
    assert_eq!(first.id, again.id);
    assert!(first.name.starts_with("guest-"));

    let balance = wallet.get_balance(&first.id).await.unwrap();
    assert!(balance >= 0);
}
