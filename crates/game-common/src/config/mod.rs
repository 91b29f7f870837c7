//! Configuration structs

mod app_config;

pub use app_config::{
    AppSettings, ConfigError, Environment, GameConfig, GatewayConfig, RedisConfig,
    RegistryConfig, ServerConfig,
};
