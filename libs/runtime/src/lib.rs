pub mod config;
pub mod logging;

pub use config::{
    AppConfig, AuthConfig, CacheConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig,
};
