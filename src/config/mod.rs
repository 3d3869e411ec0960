//! Application configuration
//!
//! Loaded from `config/default.*` and `config/local.*` (both optional), then
//! from `TEAMSYNC__*` environment variables.

mod app_config;

pub use app_config::{AppConfig, GithubConfig, LogFormat, LoggingConfig, SyncConfig};
