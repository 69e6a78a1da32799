//! Dashboard summaries, historical rollups, and run inspection for the
//! processing-run ledger.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::web::handlers::epg::ProcessingRunResponse;
use crate::web::responses::{handle_result, ApiResponse};
use crate::web::AppState;

fn default_history_days() -> i64 {
    14
}

fn default_runs_limit() -> u64 {
    50
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryParams {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunsParams {
    #[serde(default = "default_runs_limit")]
    pub limit: u64,
    pub run_type: Option<String>,
    pub group_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardSummaryResponse {
    pub total_runs: usize,
    pub successful_runs: usize,
    pub failed_runs: usize,
    pub streams_matched: i64,
    pub streams_unmatched: i64,
    pub programmes_total: i64,
}

impl From<crate::services::stats::DashboardSummary> for DashboardSummaryResponse {
    fn from(summary: crate::services::stats::DashboardSummary) -> Self {
        Self {
            total_runs: summary.total_runs,
            successful_runs: summary.successful_runs,
            failed_runs: summary.failed_runs,
            streams_matched: summary.streams_matched,
            streams_unmatched: summary.streams_unmatched,
            programmes_total: summary.programmes_total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyRollupResponse {
    pub date: NaiveDate,
    pub runs: usize,
    pub streams_matched: i64,
    pub streams_unmatched: i64,
}

impl From<crate::services::stats::DailyRollup> for DailyRollupResponse {
    fn from(rollup: crate::services::stats::DailyRollup) -> Self {
        Self {
            date: rollup.date,
            runs: rollup.runs,
            streams_matched: rollup.streams_matched,
            streams_unmatched: rollup.streams_unmatched,
        }
    }
}

/// Default lookback window for the top-level `/stats` overview.
const OVERVIEW_WINDOW_DAYS: i64 = 1;

#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    summary = "Processing-run summary over the last 24 hours",
    responses((status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryResponse>))
)]
pub async fn overview(State(state): State<AppState>) -> impl IntoResponse {
    let since = Utc::now() - Duration::days(OVERVIEW_WINDOW_DAYS);
    let result = state.stats.dashboard_summary(since).await.map(DashboardSummaryResponse::from);
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/stats/dashboard",
    tag = "stats",
    summary = "Processing-run summary over the last 24 hours",
    responses((status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummaryResponse>))
)]
pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    overview(State(state)).await
}

#[utoipa::path(
    get,
    path = "/stats/history",
    tag = "stats",
    summary = "Daily run totals over the requested window",
    params(HistoryParams),
    responses((status = 200, description = "Daily rollups, oldest first", body = ApiResponse<Vec<DailyRollupResponse>>))
)]
pub async fn history(State(state): State<AppState>, Query(params): Query<HistoryParams>) -> impl IntoResponse {
    let result = state
        .stats
        .history(params.days)
        .await
        .map(|rollups| rollups.into_iter().map(DailyRollupResponse::from).collect::<Vec<_>>());
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/stats/runs",
    tag = "stats",
    summary = "Lists recent processing runs, optionally filtered",
    params(RunsParams),
    responses((status = 200, description = "Recent runs", body = ApiResponse<Vec<ProcessingRunResponse>>))
)]
pub async fn runs(State(state): State<AppState>, Query(params): Query<RunsParams>) -> impl IntoResponse {
    let result = state
        .stats
        .recent_runs(params.limit, params.run_type.as_deref(), params.group_id, params.status.as_deref())
        .await
        .map(|runs| runs.into_iter().map(ProcessingRunResponse::from).collect::<Vec<_>>());
    handle_result(result)
}

#[utoipa::path(
    get,
    path = "/stats/runs/{id}",
    tag = "stats",
    summary = "Fetches a single processing run by id",
    responses(
        (status = 200, description = "The run", body = ApiResponse<ProcessingRunResponse>),
        (status = 404, description = "No run with that id"),
    )
)]
pub async fn run_by_id(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let result = state.stats.run_by_id(&id).await.and_then(|run| {
        run.map(ProcessingRunResponse::from)
            .ok_or_else(|| AppError::not_found("processing run", id.to_string()))
    });
    handle_result(result)
}
