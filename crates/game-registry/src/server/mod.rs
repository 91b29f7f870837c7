//! Registry server setup
//!
//! Builds the HTTP surface and runs it next to the cleanup task.

mod state;

pub use state::RegistryState;

use crate::handlers::{auth, health, registry};
use crate::login::LoginService;
use crate::registry::{spawn_cleanup_task, ServiceRegistry};
use axum::{
    routing::{get, post},
    Router,
};
use game_cache::{RedisLeaseStore, RedisPool, RedisUserStore, RedisWallet};
use game_common::{shutdown_signal, AppError, RegistryConfig};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Create the registry router
pub fn create_router() -> Router<RegistryState> {
    Router::new()
        .route("/registry/register", post(registry::register))
        .route("/registry/heartbeat", post(registry::heartbeat))
        .route("/registry/deregister", post(registry::deregister))
        .route("/registry/route", post(registry::route))
        .route("/auth/login", post(auth::login))
        .route("/health", get(health::health_check))
}

/// Build the complete application
pub fn create_app(state: RegistryState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize Redis-backed stores and create `RegistryState`
pub async fn create_registry_state(config: &RegistryConfig) -> Result<RegistryState, AppError> {
    tracing::info!("Connecting to Redis...");
    let pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    pool.ping().await.map_err(|e| AppError::Cache(e.to_string()))?;
    tracing::info!("Redis connected");

    let store = Arc::new(RedisLeaseStore::new(pool.clone()));
    let registry = ServiceRegistry::new_shared(store, config.lease_ttl());
    let login = LoginService::new(
        Arc::new(RedisUserStore::new(pool.clone())),
        Arc::new(RedisWallet::new(pool)),
    );

    Ok(RegistryState::new(registry, Arc::new(login)))
}

/// Serve `app` on an already bound listener until `shutdown` resolves
pub async fn run_server<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Registry listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

/// Run the complete registry with configuration
pub async fn run(config: RegistryConfig) -> Result<(), AppError> {
    let state = create_registry_state(&config).await?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let cleanup = spawn_cleanup_task(state.registry().clone(), config.cleanup_interval(), stop_rx);

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::bind(&addr, e))?;

    let result = run_server(listener, create_app(state), shutdown_signal()).await;

    stop_tx.send_replace(true);
    if let Err(e) = cleanup.await {
        tracing::warn!(error = %e, "Cleanup task ended abnormally");
    }
    tracing::info!("Registry stopped");
    result
}
