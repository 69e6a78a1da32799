//! Matched-stream/channel-lifecycle event-group generation, on-demand
//! `events.xml` rendering, and the diagnostic "test a match" lookup.

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Event;
use crate::web::handlers::epg::ProcessingRunResponse;
use crate::web::responses::{handle_result, ApiResponse};
use crate::web::utils::parse_comma_separated;
use crate::web::AppState;

fn default_channel_prefix() -> String {
    String::new()
}

fn default_pregame_minutes() -> i64 {
    15
}

fn default_duration_hours() -> i64 {
    3
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateEventsRequest {
    #[serde(default)]
    pub leagues: Vec<String>,
    pub target_date: Option<NaiveDate>,
    #[serde(default = "default_channel_prefix")]
    pub channel_prefix: String,
    #[serde(default = "default_pregame_minutes")]
    pub pregame_minutes: i64,
    #[serde(default = "default_duration_hours")]
    pub duration_hours: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EventsXmltvParams {
    /// Comma-separated league codes; omitted means every configured group.
    pub leagues: Option<String>,
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MatchRequest {
    pub league: String,
    pub target_date: Option<NaiveDate>,
    pub team1_id: Option<String>,
    pub team2_id: Option<String>,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/epg/events/generate",
    tag = "events",
    summary = "Runs the matched-stream and channel-lifecycle pipeline for the given leagues",
    request_body = GenerateEventsRequest,
    responses((status = 200, description = "Completed run", body = ApiResponse<ProcessingRunResponse>))
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateEventsRequest>,
) -> impl IntoResponse {
    let result = state
        .generation
        .generate_events(
            request.leagues,
            request.target_date,
            request.channel_prefix,
            request.pregame_minutes,
            request.duration_hours,
        )
        .await
        .map(ProcessingRunResponse::from);
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/epg/events/xmltv",
    tag = "events",
    summary = "Renders an event-channel XMLTV document on demand",
    params(EventsXmltvParams),
    responses((status = 200, description = "XMLTV document", content_type = "application/xml"))
)]
pub async fn xmltv(
    State(state): State<AppState>,
    Query(params): Query<EventsXmltvParams>,
) -> impl IntoResponse {
    let leagues = parse_comma_separated(&params.leagues);
    match state.generation.render_events_xmltv(leagues, params.target_date).await {
        Ok(document) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], document).into_response(),
        Err(error) => crate::web::responses::handle_error(error).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/epg/events/match",
    tag = "events",
    summary = "Diagnostic lookup: finds candidate events for a league/date narrowed by team id or name",
    request_body = MatchRequest,
    responses((status = 200, description = "Matching candidate events", body = ApiResponse<Vec<Event>>))
)]
pub async fn test_match(State(state): State<AppState>, Json(request): Json<MatchRequest>) -> impl IntoResponse {
    let result = state
        .generation
        .diagnose_match(
            &request.league,
            request.target_date,
            request.team1_id,
            request.team2_id,
            request.team1_name,
            request.team2_name,
        )
        .await;
    handle_result(result)
}
