//! Gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p game-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use game_common::{try_init_tracing_with_config, GatewayConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        addr = %config.server.address(),
        rpc_addr = %config.rpc.address(),
        static_routes = config.static_routes.len(),
        "Starting gateway"
    );

    if let Err(e) = game_gateway::run(config).await {
        error!(error = %e, code = e.error_code(), "Gateway failed");
        std::process::exit(1);
    }
}
