//! Error type definitions for Teamarr.
//!
//! Each layer gets its own `thiserror` enum; `AppError` is the only
//! variant that ever surfaces at the web layer.

use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),

    #[error("Web error: {0}")]
    Web(#[from] WebError),

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Operation already in progress: {operation_type} on {resource}")]
    OperationInProgress {
        operation_type: String,
        resource: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer (SeaORM) errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Migration failed: {version} - {message}")]
    MigrationFailed { version: String, message: String },

    #[error("Record not found: {table} with {field} = {value}")]
    RecordNotFound {
        table: String,
        field: String,
        value: String,
    },

    #[error("Constraint violation: {constraint} - {message}")]
    ConstraintViolation { constraint: String, message: String },

    #[error("Serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Datetime parse error: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}

/// Upstream sports-data provider errors. Per the error-handling design,
/// transient transport failures are retried internally and never reach
/// this enum; only the terminal outcome (degrade-to-none or a
/// parse-category failure the caller chose to surface) does.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP error from provider: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse provider response: {message}")]
    ParseError { message: String },

    #[error("League '{league}' is not supported by any configured provider")]
    UnsupportedLeague { league: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors talking to the external IPTV orchestration host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("HTTP error from host: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Host channel allocation failed: {message}")]
    AllocationFailed { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl HostError {
    /// The host's delete endpoint is treated as idempotent: a 404, or
    /// any error body containing "not found" (case-insensitive), is
    /// success from the caller's perspective.
    pub fn is_not_found(&self) -> bool {
        match self {
            HostError::Http { status, message } => {
                *status == 404 || message.to_lowercase().contains("not found")
            }
            _ => false,
        }
    }
}

/// Web layer errors, mapped to HTTP responses at the edge.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    pub fn operation_in_progress<O: Into<String>, R: Into<String>>(
        operation_type: O,
        resource: R,
    ) -> Self {
        Self::OperationInProgress {
            operation_type: operation_type.into(),
            resource: resource.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
