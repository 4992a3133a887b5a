pub mod config;
pub mod logging;

pub use config::{
    AdminConfig, AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig,
};
