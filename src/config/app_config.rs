use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::FailurePolicy;
use crate::infrastructure::github::RetryConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub org: Option<String>,
    pub per_page: u32,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory holding one desired-state document per team
    pub config_dir: PathBuf,
    pub max_concurrent_teams: usize,
    pub dry_run: bool,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token: None,
            org: None,
            per_page: 100,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("teams"),
            max_concurrent_teams: 1,
            dry_run: false,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("TEAMSYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.github.token.is_none());
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.sync.config_dir, PathBuf::from("teams"));
        assert_eq!(config.sync.max_concurrent_teams, 1);
        assert!(!config.sync.dry_run);
        assert_eq!(config.sync.failure_policy, FailurePolicy::AllFailed);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [github]
            org = "acme"

            [github.retry]
            max_retries = 5

            [sync]
            failure_policy = "any_failed"
            max_concurrent_teams = 4

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.github.org.as_deref(), Some("acme"));
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.retry.max_retries, 5);
        assert_eq!(config.github.retry.initial_delay_ms, 500);
        assert_eq!(config.sync.failure_policy, FailurePolicy::AnyFailed);
        assert_eq!(config.sync.max_concurrent_teams, 4);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }
}
