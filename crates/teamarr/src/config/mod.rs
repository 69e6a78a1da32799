use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub web: WebConfig,
    pub storage: StorageConfig,
    pub provider: ProviderConfig,
    pub matching: MatchingConfig,
    pub epg: EpgConfig,
    pub lifecycle: LifecycleConfig,
    pub scheduler: SchedulerConfig,
    pub host: HostConfig,
    pub observability: Option<ObservabilityConfig>,
    pub features: Option<FeaturesConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeaturesConfig {
    /// Simple boolean flags for enabling/disabling optional behaviour
    #[serde(default)]
    pub flags: std::collections::HashMap<String, bool>,

    /// Per-feature configuration settings
    #[serde(default)]
    pub config: std::collections::HashMap<String, std::collections::HashMap<String, serde_json::Value>>,
}

impl FeaturesConfig {
    pub fn is_feature_enabled(&self, feature_name: &str) -> bool {
        self.flags.get(feature_name).copied().unwrap_or(false)
    }

    pub fn get_feature_config(&self, feature_name: &str) -> &std::collections::HashMap<String, serde_json::Value> {
        use std::sync::LazyLock;
        static EMPTY_CONFIG: LazyLock<std::collections::HashMap<String, serde_json::Value>> =
            LazyLock::new(std::collections::HashMap::new);
        self.config.get(feature_name).unwrap_or(&EMPTY_CONFIG)
    }

    pub fn get_config_string(&self, feature_name: &str, config_key: &str) -> Option<String> {
        self.get_feature_config(feature_name)
            .get(config_key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub sqlite: SqliteConfig,
    #[serde(default)]
    pub postgresql: PostgreSqlConfig,
    #[serde(default)]
    pub mysql: MySqlConfig,
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            sqlite: SqliteConfig::default(),
            postgresql: PostgreSqlConfig::default(),
            mysql: MySqlConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout: String,
    #[serde(default = "default_journal_mode")]
    pub journal_mode: String,
    #[serde(default = "default_synchronous")]
    pub synchronous: String,
}

fn default_busy_timeout() -> String {
    "5000".to_string()
}
fn default_journal_mode() -> String {
    "WAL".to_string()
}
fn default_synchronous() -> String {
    "NORMAL".to_string()
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: default_busy_timeout(),
            journal_mode: default_journal_mode(),
            synchronous: default_synchronous(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgreSqlConfig {
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout: Option<String>,
}

fn default_statement_timeout() -> Option<String> {
    Some("30s".to_string())
}

impl Default for PostgreSqlConfig {
    fn default() -> Self {
        Self {
            statement_timeout: default_statement_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MySqlConfig {
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout: Option<u32>,
}

fn default_wait_timeout() -> Option<u32> {
    Some(28800)
}

impl Default for MySqlConfig {
    fn default() -> Self {
        Self {
            wait_timeout: default_wait_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_enable_request_logging")]
    pub enable_request_logging: bool,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_enable_request_logging() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the database file and generated XMLTV artefacts.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Filename (within `data_dir`) of the final published XMLTV file.
    #[serde(default = "default_published_filename")]
    pub published_filename: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}
fn default_published_filename() -> String {
    DEFAULT_PUBLISHED_FILENAME.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            published_filename: default_published_filename(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_provider_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_provider_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_provider_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_provider_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
}

fn default_provider_timeout_seconds() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECONDS
}
fn default_provider_max_attempts() -> u32 {
    DEFAULT_PROVIDER_MAX_ATTEMPTS
}
fn default_provider_base_delay_ms() -> u64 {
    DEFAULT_PROVIDER_BASE_DELAY_MS
}
fn default_provider_max_connections() -> usize {
    DEFAULT_PROVIDER_MAX_CONNECTIONS
}
fn default_provider_pool_max_idle_per_host() -> usize {
    DEFAULT_PROVIDER_POOL_MAX_IDLE_PER_HOST
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_provider_timeout_seconds(),
            max_attempts: default_provider_max_attempts(),
            base_delay_ms: default_provider_base_delay_ms(),
            max_connections: default_provider_max_connections(),
            pool_max_idle_per_host: default_provider_pool_max_idle_per_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum weighted fuzzy score (0-100) accepted as a match.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
    /// Generations since last touch before a cache entry is purged.
    #[serde(default = "default_cache_purge_generations")]
    pub cache_purge_generations: i64,
}

fn default_fuzzy_threshold() -> u8 {
    DEFAULT_FUZZY_THRESHOLD
}
fn default_cache_purge_generations() -> i64 {
    DEFAULT_CACHE_PURGE_GENERATIONS
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            cache_purge_generations: default_cache_purge_generations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpgConfig {
    /// How many days of upcoming schedule a team generator fetches per run.
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
    #[serde(default = "default_pregame_minutes")]
    pub pregame_minutes: i64,
    #[serde(default = "default_duration_hours")]
    pub default_duration_hours: i64,
}

fn default_days_ahead() -> u32 {
    DEFAULT_DAYS_AHEAD
}
fn default_pregame_minutes() -> i64 {
    DEFAULT_PREGAME_MINUTES
}
fn default_duration_hours() -> i64 {
    DEFAULT_DURATION_HOURS
}

impl Default for EpgConfig {
    fn default() -> Self {
        Self {
            days_ahead: default_days_ahead(),
            pregame_minutes: default_pregame_minutes(),
            default_duration_hours: default_duration_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Days a soft-deleted managed channel row survives before hard deletion.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

fn default_retention_days() -> i64 {
    DEFAULT_RETENTION_DAYS
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_scheduler_interval_minutes")]
    pub interval_minutes: u64,
}

fn default_scheduler_interval_minutes() -> u64 {
    DEFAULT_SCHEDULER_INTERVAL_MINUTES
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_scheduler_interval_minutes(),
        }
    }
}

/// Connection details for the external IPTV orchestration host whose
/// channel inventory Teamarr manages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HostConfig {
    pub base_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ObservabilityConfig {
    /// OTLP endpoint; when unset, tracing stays local (stdout) only.
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            web: WebConfig {
                host: default_host(),
                port: default_port(),
                base_url: default_base_url(),
                enable_request_logging: default_enable_request_logging(),
            },
            storage: StorageConfig::default(),
            provider: ProviderConfig::default(),
            matching: MatchingConfig::default(),
            epg: EpgConfig::default(),
            lifecycle: LifecycleConfig::default(),
            scheduler: SchedulerConfig::default(),
            host: HostConfig::default(),
            observability: Some(ObservabilityConfig {
                otlp_endpoint: None,
                log_level: default_log_level(),
            }),
            features: Some(FeaturesConfig::default()),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from_file(&config_file)
    }

    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !std::path::Path::new(config_file).exists() {
            tracing::warn!(
                "Config file '{}' not found, using default configuration values",
                config_file
            );

            let default_config = Self::default();
            let config: Config = Figment::new()
                .merge(figment::providers::Serialized::defaults(default_config))
                .merge(Env::prefixed("TEAMARR_").split("__"))
                .extract()?;

            return Ok(config);
        }

        let config: Config = Figment::new()
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("TEAMARR_").split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.web.port, DEFAULT_PORT);
        assert_eq!(config.matching.fuzzy_threshold, 75);
        assert_eq!(config.lifecycle.retention_days, 30);
    }

    #[test]
    fn features_config_defaults_to_disabled() {
        let features = FeaturesConfig::default();
        assert!(!features.is_feature_enabled("anything"));
    }
}
