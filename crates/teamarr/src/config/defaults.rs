//! Configuration default values
//!
//! This module contains default values for configuration options,
//! making them easily changeable in one central location.

// Database defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/teamarr.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Storage defaults
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_PUBLISHED_FILENAME: &str = "teamarr.xml";

// Provider HTTP client defaults
pub const DEFAULT_PROVIDER_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PROVIDER_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_PROVIDER_BASE_DELAY_MS: u64 = 500;
pub const DEFAULT_PROVIDER_POOL_MAX_IDLE_PER_HOST: usize = 10;
pub const DEFAULT_PROVIDER_MAX_CONNECTIONS: usize = 100;

// Matching defaults
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 75;
pub const DEFAULT_CACHE_PURGE_GENERATIONS: i64 = 5;

// EPG generation defaults
pub const DEFAULT_DAYS_AHEAD: u32 = 7;
pub const DEFAULT_PREGAME_MINUTES: i64 = 30;
pub const DEFAULT_DURATION_HOURS: i64 = 3;

// Channel lifecycle defaults
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

// Background scheduler defaults
pub const DEFAULT_SCHEDULER_INTERVAL_MINUTES: u64 = 15;
