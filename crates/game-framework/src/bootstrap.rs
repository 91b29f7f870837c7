//! Backend process bootstrap

use crate::handler::GameHandler;
use crate::server::{create_app, GameServer};
use game_cache::{RedisPool, RedisUserStore, RedisWallet};
use game_common::{shutdown_signal, AppError, GameConfig};
use game_rpc::{connector_pool, CentralClient, Registrar, RegistrarConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Run a game backend until shutdown.
///
/// Binds the game surface, registers with the central registry and keeps the
/// lease alive in the background. On shutdown the registrar deregisters
/// (best effort) before the listener closes.
pub async fn run_game_server(
    config: GameConfig,
    handler: Arc<dyn GameHandler>,
) -> Result<(), AppError> {
    tracing::info!("Connecting to Redis...");
    let pool = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    pool.ping().await.map_err(|e| AppError::Cache(e.to_string()))?;

    let connectors = Arc::new(connector_pool());
    let server = Arc::new(GameServer::new(
        config.service_name.clone(),
        config.kind,
        handler,
        Arc::new(RedisUserStore::new(pool.clone())),
        Arc::new(RedisWallet::new(pool)),
        connectors.clone(),
    ));

    let central = CentralClient::connect(&config.central_addr)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;
    let mut registrar_config = RegistrarConfig::new(
        config.service_name.clone(),
        config.kind,
        config.advertise_addr.clone(),
        config.game_ids.clone(),
    );
    registrar_config.heartbeat_interval = config.heartbeat_interval();
    registrar_config.retry_delay = config.register_retry();
    let registrar = Registrar::new(Arc::new(central), registrar_config);

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::bind(&addr, e))?;

    tracing::info!(
        service = %config.service_name,
        kind = %config.kind,
        game_ids = ?config.game_ids,
        advertise = %config.advertise_addr,
        "Game server listening on http://{}",
        addr
    );

    let heartbeat = registrar.spawn();

    let result = axum::serve(listener, create_app(server))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            registrar.stop().await;
        })
        .await
        .map_err(|e| AppError::Server(e.to_string()));

    if let Err(e) = heartbeat.await {
        tracing::warn!(error = %e, "Registrar task ended abnormally");
    }
    connectors.close();
    tracing::info!("Game server stopped");
    result
}
