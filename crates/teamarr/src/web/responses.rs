//! HTTP response types and error mapping.
//!
//! Standardized response envelope and `AppError -> HTTP` mapping used
//! across every handler.

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            details: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page > 0 {
            (total as f64 / per_page as f64).ceil() as u32
        } else {
            1
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

pub fn handle_result<T>(result: Result<T, AppError>) -> impl IntoResponse
where
    T: Serialize,
{
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(error) => handle_error(error).into_response(),
    }
}

/// Convert `AppError` into the appropriate HTTP status and envelope.
pub fn handle_error(error: AppError) -> impl IntoResponse {
    let (status, message) = match &error {
        AppError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AppError::NotFound { resource, id } => (
            StatusCode::NOT_FOUND,
            format!("{resource} with id '{id}' not found"),
        ),
        AppError::Configuration { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Configuration error: {message}"),
        ),
        AppError::OperationInProgress {
            operation_type,
            resource,
        } => (
            StatusCode::CONFLICT,
            format!("Operation already in progress: {operation_type} on {resource}"),
        ),
        AppError::Storage(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Storage error: {e}"),
        ),
        AppError::Provider(e) => (StatusCode::BAD_GATEWAY, format!("Provider error: {e}")),
        AppError::Host(e) => (StatusCode::BAD_GATEWAY, format!("Host error: {e}")),
        AppError::Web(e) => (StatusCode::BAD_REQUEST, format!("Request error: {e}")),
        AppError::Internal { message } => {
            (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
        }
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(data)))
}

pub fn bad_request(message: &str) -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error(message.to_string())),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub field: String,
    pub message: String,
}

pub fn validation_error(errors: Vec<ValidationErrorResponse>) -> impl IntoResponse {
    let mut details = HashMap::new();
    for error in &errors {
        details.insert(error.field.clone(), error.message.clone());
    }

    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some("Validation failed".to_string()),
            details: Some(details),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// Response envelope for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub scheduler_running: bool,
}

impl HealthResponse {
    pub fn healthy(scheduler_running: bool) -> Self {
        Self {
            status: "ok".to_string(),
            database: true,
            scheduler_running,
        }
    }

    pub fn unhealthy(reason: &str) -> Self {
        Self {
            status: format!("unhealthy: {reason}"),
            database: false,
            scheduler_running: false,
        }
    }
}
