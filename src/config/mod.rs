//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, LogFormat, LoggingConfig, MetricsConfig,
    SeedConfig, ServerConfig, StorageBackend, StorageConfig,
};
