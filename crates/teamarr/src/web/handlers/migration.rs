//! Legacy-schema status and on-demand backup archiving/download.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::responses::{handle_result, ApiResponse};
use crate::web::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct MigrationStatusResponse {
    pub legacy_detected: bool,
    pub archived_path: Option<String>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl From<crate::services::migration::MigrationStatus> for MigrationStatusResponse {
    fn from(status: crate::services::migration::MigrationStatus) -> Self {
        Self {
            legacy_detected: status.legacy_detected,
            archived_path: status.archived_path,
            archived_at: status.archived_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/migration/status",
    tag = "migration",
    summary = "Reports whether a legacy schema was detected and archived at startup",
    responses((status = 200, description = "Migration status", body = ApiResponse<MigrationStatusResponse>))
)]
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    handle_result(Ok::<_, crate::errors::AppError>(MigrationStatusResponse::from(state.migration.status().await)))
}

#[utoipa::path(
    post,
    path = "/migration/archive",
    tag = "migration",
    summary = "Archives the current database file on demand",
    responses((status = 200, description = "Path to the archived file", body = ApiResponse<String>))
)]
pub async fn archive(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.migration.archive_now().await.map(|path| path.display().to_string());
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/migration/download-backup",
    tag = "migration",
    summary = "Downloads the most recently archived backup file",
    responses(
        (status = 200, description = "The backup file", content_type = "application/octet-stream"),
        (status = 404, description = "No backup has been archived yet"),
    )
)]
pub async fn download_backup(State(state): State<AppState>) -> impl IntoResponse {
    let path = match state.migration.latest_backup().await {
        Ok(path) => path,
        Err(error) => return crate::web::responses::handle_error(error).into_response(),
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "backup.bak".to_string());

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => crate::web::responses::handle_error(crate::errors::AppError::internal(format!(
            "failed to read backup file: {error}"
        )))
        .into_response(),
    }
}
