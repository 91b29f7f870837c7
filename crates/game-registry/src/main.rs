//! Central registry entry point
//!
//! Run with:
//! ```bash
//! cargo run -p game-registry
//! ```
//!
//! Configuration is loaded from environment variables.

use game_common::{try_init_tracing_with_config, RegistryConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match RegistryConfig::from_env() {
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
        lease_ttl_secs = config.lease_ttl_secs,
        "Starting central registry"
    );

    if let Err(e) = game_registry::run(config).await {
        error!(error = %e, code = e.error_code(), "Registry failed");
        std::process::exit(1);
    }
}
