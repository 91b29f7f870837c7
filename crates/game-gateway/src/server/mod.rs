//! Gateway server setup
//!
//! Client WebSocket server and the internal connector server, each on its
//! own listener.

mod connector;
mod handler;
mod state;

pub use connector::{create_connector_router, GatewayConnector};
pub use handler::gateway_handler;
pub use state::{GatewaySettings, GatewayState};

use crate::router::{Discovery, RegistryDiscovery, SmartRouter, StaticDiscovery};
use axum::{routing::get, Router};
use game_common::{shutdown_signal, AppError, GatewayConfig};
use game_core::Authenticator;
use game_rpc::{game_pool, CentralClient};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Create the client-facing router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the client-facing application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the connector application over the state's session table
pub fn create_connector_app(state: &GatewayState) -> Router {
    let connector = Arc::new(GatewayConnector::new(state.sessions().clone()));
    create_connector_router()
        .layer(TraceLayer::new_for_http())
        .with_state(connector)
}

/// Initialize all dependencies and create `GatewayState`
///
/// Routes come from `static_routes` when configured, otherwise from the
/// central registry. Login always goes through the central registry.
pub fn create_gateway_state(config: &GatewayConfig) -> Result<GatewayState, AppError> {
    let central = CentralClient::connect(&config.central_addr)
        .map_err(|e| AppError::ExternalService(e.to_string()))?;
    let central = Arc::new(central);

    let discovery: Arc<dyn Discovery> = if config.static_routes.is_empty() {
        tracing::info!(central = %config.central_addr, "Using registry discovery");
        Arc::new(RegistryDiscovery::new(central.clone()))
    } else {
        let table = StaticDiscovery::from_entries(&config.static_routes)
            .map_err(|e| AppError::Server(format!("Invalid static route: {e}")))?;
        tracing::info!(routes = table.len(), "Using static discovery");
        Arc::new(table)
    };

    let authenticator: Arc<dyn Authenticator> = central;
    Ok(GatewayState::new(
        GatewaySettings::from_config(config),
        SmartRouter::new(discovery),
        authenticator,
        Arc::new(game_pool()),
    ))
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn run_server<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}

/// Run the complete gateway with configuration
pub async fn run(config: GatewayConfig) -> Result<(), AppError> {
    let state = create_gateway_state(&config)?;

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::bind(&addr, e))?;
    let rpc_addr = config.rpc.address();
    let rpc_listener = TcpListener::bind(&rpc_addr)
        .await
        .map_err(|e| AppError::bind(&rpc_addr, e))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);
    tracing::info!(advertise = %config.advertise_addr, "Connector listening on http://{}", rpc_addr);

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        stop_tx.send_replace(true);
    });

    let connector_app = create_connector_app(&state);
    let (client, connector) = tokio::join!(
        run_server(listener, create_app(state), stopped(stop_rx.clone())),
        run_server(rpc_listener, connector_app, stopped(stop_rx)),
    );

    tracing::info!("Gateway stopped");
    client.and(connector)
}

async fn stopped(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}
