//! Demo game backend
//!
//! Run with:
//! ```bash
//! GAME_SERVICE_NAME=echo GAME_KIND=stateless GAME_IDS=1001 cargo run -p game-framework --bin game-demo
//! ```
//!
//! Configuration is loaded from environment variables.

use game_common::{try_init_tracing_with_config, GameConfig, TracingConfig};
use game_framework::{demo::EchoHandler, run_game_server};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match GameConfig::from_env() {
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
        service = %config.service_name,
        kind = %config.kind,
        game_ids = ?config.game_ids,
        "Starting demo game"
    );

    let handler = Arc::new(EchoHandler::new(config.kind.is_stateful()));
    if let Err(e) = run_game_server(config, handler).await {
        error!(error = %e, code = e.error_code(), "Game server failed");
        std::process::exit(1);
    }
}
