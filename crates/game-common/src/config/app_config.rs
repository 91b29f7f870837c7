//! Application configuration structs
//!
//! Each binary (registry, gateway, game server) loads its own section set
//! from environment variables, with `.env` support through dotenvy.

use game_core::{GameId, ServiceKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address other processes should dial to reach this listener
    #[must_use]
    pub fn reachable_address(&self) -> String {
        if self.host == "0.0.0.0" {
            format!("127.0.0.1:{}", self.port)
        } else {
            self.address()
        }
    }
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Central registry process configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub redis: RedisConfig,
    #[serde(default = "default_lease_ttl_secs")]
    pub lease_ttl_secs: u64,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl RegistryConfig {
    #[must_use]
    pub fn lease_ttl(&self) -> Duration {
        Duration::from_secs(self.lease_ttl_secs)
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Gateway process configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub app: AppSettings,
    /// Client WebSocket listener
    pub server: ServerConfig,
    /// Internal listener game servers push to
    pub rpc: ServerConfig,
    /// Address handed to game servers in join requests
    pub advertise_addr: String,
    /// Central registry address
    pub central_addr: String,
    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,
    #[serde(default = "default_enter_game_timeout_secs")]
    pub enter_game_timeout_secs: u64,
    /// Service name to `host:port[@kind]`; non-empty selects static discovery
    #[serde(default)]
    pub static_routes: HashMap<String, String>,
}

impl GatewayConfig {
    #[must_use]
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    #[must_use]
    pub fn enter_game_timeout(&self) -> Duration {
        Duration::from_secs(self.enter_game_timeout_secs)
    }
}

/// Game server process configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub redis: RedisConfig,
    pub service_name: String,
    pub kind: ServiceKind,
    pub game_ids: Vec<GameId>,
    /// Address registered with the central registry
    pub advertise_addr: String,
    pub central_addr: String,
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,
    #[serde(default = "default_register_retry_secs")]
    pub register_retry_secs: u64,
}

impl GameConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    #[must_use]
    pub fn register_retry(&self) -> Duration {
        Duration::from_secs(self.register_retry_secs)
    }
}

// Default value functions
fn default_app_name() -> String {
    "game-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_lease_ttl_secs() -> u64 {
    10
}

fn default_cleanup_interval_secs() -> u64 {
    30
}

fn default_login_timeout_secs() -> u64 {
    10
}

fn default_enter_game_timeout_secs() -> u64 {
    180 // 3 minutes
}

fn default_heartbeat_interval_secs() -> u64 {
    5
}

fn default_register_retry_secs() -> u64 {
    2
}

fn default_registry_port() -> u16 {
    8090
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_rpc_port() -> u16 {
    8081
}

fn default_game_port() -> u16 {
    9000
}

/// Variable source; `env::var` in production, a map in tests
trait Lookup {
    fn var(&self, key: &str) -> Option<String>;

    fn parsed<T: FromStr>(&self, key: &'static str) -> Result<Option<T>, ConfigError> {
        match self.var(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue(key, raw)),
            None => Ok(None),
        }
    }
}

impl<F: Fn(&str) -> Option<String>> Lookup for F {
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

impl AppSettings {
    fn load(vars: &impl Lookup) -> Self {
        Self {
            name: vars.var("APP_NAME").unwrap_or_else(default_app_name),
            env: vars
                .var("APP_ENV")
                .and_then(|s| match s.to_lowercase().as_str() {
                    "production" => Some(Environment::Production),
                    "staging" => Some(Environment::Staging),
                    "development" => Some(Environment::Development),
                    _ => None,
                })
                .unwrap_or_default(),
        }
    }
}

impl ServerConfig {
    fn load(
        vars: &impl Lookup,
        host_key: &'static str,
        port_key: &'static str,
        default_port: u16,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            host: vars.var(host_key).unwrap_or_else(default_host),
            port: vars.parsed(port_key)?.unwrap_or(default_port),
        })
    }
}

impl RedisConfig {
    fn load(vars: &impl Lookup) -> Result<Self, ConfigError> {
        Ok(Self {
            url: vars
                .var("REDIS_URL")
                .ok_or(ConfigError::MissingVar("REDIS_URL"))?,
            max_connections: vars
                .parsed("REDIS_MAX_CONNECTIONS")?
                .unwrap_or_else(default_redis_max_connections),
        })
    }
}

fn central_addr(vars: &impl Lookup) -> String {
    vars.var("CENTRAL_ADDR")
        .unwrap_or_else(|| format!("127.0.0.1:{}", default_registry_port()))
}

/// Parse `name=host:port,name2=host:port@stateful`
fn parse_routes(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, addr)) if !name.trim().is_empty() && !addr.trim().is_empty() => {
                Ok((name.trim().to_string(), addr.trim().to_string()))
            }
            _ => Err(ConfigError::InvalidValue(
                "GATEWAY_STATIC_ROUTES",
                entry.to_string(),
            )),
        })
        .collect()
}

fn parse_game_ids(raw: &str) -> Result<Vec<GameId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse()
                .map_err(|_| ConfigError::InvalidValue("GAME_IDS", id.to_string()))
        })
        .collect()
}

impl RegistryConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::load(&process_env)
    }

    fn load(vars: &impl Lookup) -> Result<Self, ConfigError> {
        Ok(Self {
            app: AppSettings::load(vars),
            server: ServerConfig::load(
                vars,
                "REGISTRY_HOST",
                "REGISTRY_PORT",
                default_registry_port(),
            )?,
            redis: RedisConfig::load(vars)?,
            lease_ttl_secs: vars
                .parsed("REGISTRY_LEASE_TTL_SECS")?
                .unwrap_or_else(default_lease_ttl_secs),
            cleanup_interval_secs: vars
                .parsed("REGISTRY_CLEANUP_INTERVAL_SECS")?
                .unwrap_or_else(default_cleanup_interval_secs),
        })
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(&process_env)
    }

    fn load(vars: &impl Lookup) -> Result<Self, ConfigError> {
        let server = ServerConfig::load(
            vars,
            "GATEWAY_HOST",
            "GATEWAY_PORT",
            default_gateway_port(),
        )?;
        let rpc = ServerConfig {
            host: server.host.clone(),
            port: vars
                .parsed("GATEWAY_RPC_PORT")?
                .unwrap_or_else(default_gateway_rpc_port),
        };

        Ok(Self {
            app: AppSettings::load(vars),
            advertise_addr: vars
                .var("GATEWAY_ADVERTISE_ADDR")
                .unwrap_or_else(|| rpc.reachable_address()),
            central_addr: central_addr(vars),
            login_timeout_secs: vars
                .parsed("GATEWAY_LOGIN_TIMEOUT_SECS")?
                .unwrap_or_else(default_login_timeout_secs),
            enter_game_timeout_secs: vars
                .parsed("GATEWAY_ENTER_GAME_TIMEOUT_SECS")?
                .unwrap_or_else(default_enter_game_timeout_secs),
            static_routes: vars
                .var("GATEWAY_STATIC_ROUTES")
                .map(|raw| parse_routes(&raw))
                .transpose()?
                .unwrap_or_default(),
            server,
            rpc,
        })
    }
}

impl GameConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(&process_env)
    }

    fn load(vars: &impl Lookup) -> Result<Self, ConfigError> {
        let server = ServerConfig::load(vars, "GAME_HOST", "GAME_PORT", default_game_port())?;
        let game_ids = parse_game_ids(
            &vars
                .var("GAME_IDS")
                .ok_or(ConfigError::MissingVar("GAME_IDS"))?,
        )?;

        Ok(Self {
            app: AppSettings::load(vars),
            redis: RedisConfig::load(vars)?,
            service_name: vars
                .var("GAME_SERVICE_NAME")
                .unwrap_or_else(default_app_name),
            kind: vars
                .parsed("GAME_KIND")?
                .unwrap_or(ServiceKind::Stateless),
            game_ids,
            advertise_addr: vars
                .var("GAME_ADVERTISE_ADDR")
                .unwrap_or_else(|| server.reachable_address()),
            central_addr: central_addr(vars),
            heartbeat_interval_secs: vars
                .parsed("GAME_HEARTBEAT_INTERVAL_SECS")?
                .unwrap_or_else(default_heartbeat_interval_secs),
            register_retry_secs: vars
                .parsed("GAME_REGISTER_RETRY_SECS")?
                .unwrap_or_else(default_register_retry_secs),
            server,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
