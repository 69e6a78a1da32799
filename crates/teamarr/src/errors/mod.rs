//! Centralized error handling for Teamarr.
//!
//! This module unifies error types across all layers and provides
//! consistent error reporting.
//!
//! # Error categories
//!
//! - **Storage**: SeaORM/database operations, migrations
//! - **Provider**: upstream sports-data fetch and parse failures
//! - **Host**: the external IPTV orchestration host's channel CRUD API
//! - **Web**: HTTP request/response handling
//!
//! # Usage
//!
//! ```rust
//! use teamarr::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

pub type AppResult<T> = Result<T, AppError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type ProviderResult<T> = Result<T, ProviderError>;
pub type HostResult<T> = Result<T, HostError>;
pub type WebResult<T> = Result<T, WebError>;
