//! Team-schedule generation and on-demand `teams.xml` rendering.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::records::ProcessingRunRecord;
use crate::web::responses::{handle_result, ApiResponse};
use crate::web::utils::parse_comma_separated_uuids;
use crate::web::AppState;

fn default_days_ahead() -> u32 {
    7
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateTeamsRequest {
    pub team_ids: Option<Vec<Uuid>>,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamsXmltvParams {
    /// Comma-separated team ids; omitted means every configured team.
    pub team_ids: Option<String>,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessingRunResponse {
    pub id: Uuid,
    pub run_type: String,
    pub status: String,
    pub programmes_total: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl From<ProcessingRunRecord> for ProcessingRunResponse {
    fn from(run: ProcessingRunRecord) -> Self {
        Self {
            id: run.id,
            run_type: run.run_type,
            status: run.status,
            programmes_total: run.programmes_total,
            started_at: run.started_at,
            finished_at: run.finished_at,
            error_message: run.error_message,
        }
    }
}

#[utoipa::path(
    post,
    path = "/epg/generate",
    tag = "epg",
    summary = "Regenerates teams.xml for the given teams, or every configured team",
    request_body = GenerateTeamsRequest,
    responses((status = 200, description = "Completed run", body = ApiResponse<ProcessingRunResponse>))
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateTeamsRequest>,
) -> impl IntoResponse {
    let result = state
        .generation
        .generate_teams(request.team_ids, request.days_ahead)
        .await
        .map(ProcessingRunResponse::from);
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/epg/xmltv",
    tag = "epg",
    summary = "Renders a team-schedule XMLTV document on demand",
    params(TeamsXmltvParams),
    responses((status = 200, description = "XMLTV document", content_type = "application/xml"))
)]
pub async fn xmltv(
    State(state): State<AppState>,
    Query(params): Query<TeamsXmltvParams>,
) -> impl IntoResponse {
    let team_ids = parse_comma_separated_uuids(&params.team_ids);
    match state.generation.render_teams_xmltv(team_ids, params.days_ahead).await {
        Ok(document) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], document).into_response(),
        Err(error) => crate::web::responses::handle_error(error).into_response(),
    }
}
