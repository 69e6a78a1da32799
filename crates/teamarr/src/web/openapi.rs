//! OpenAPI documentation generation using utoipa.
//!
//! Handler functions are annotated with `#[utoipa::path]`; this module just
//! assembles them into one spec, served at `/api/openapi.json` and browsable
//! through Swagger UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Teamarr Admin API",
        version = "0.0.1",
        description = "Sports-oriented EPG/XMLTV generation and IPTV channel lifecycle management.",
        contact(name = "Teamarr"),
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/api/v1", description = "API Version 1"),
    ),
    tags(
        (name = "health", description = "Service health monitoring"),
        (name = "epg", description = "Team-schedule EPG generation and XMLTV rendering"),
        (name = "events", description = "Matched-stream event-group generation, XMLTV rendering, and match diagnostics"),
        (name = "stats", description = "Processing-run dashboards and history"),
        (name = "migration", description = "Legacy-schema detection and backup archiving"),
    ),
    components(
        schemas(
            crate::web::responses::HealthResponse,
            crate::web::handlers::epg::GenerateTeamsRequest,
            crate::web::handlers::epg::TeamsXmltvParams,
            crate::web::handlers::epg::ProcessingRunResponse,
            crate::web::handlers::events::GenerateEventsRequest,
            crate::web::handlers::events::EventsXmltvParams,
            crate::web::handlers::events::MatchRequest,
            crate::web::handlers::stats::HistoryParams,
            crate::web::handlers::stats::RunsParams,
            crate::web::handlers::stats::DashboardSummaryResponse,
            crate::web::handlers::stats::DailyRollupResponse,
            crate::web::handlers::migration::MigrationStatusResponse,
            crate::models::Event,
            crate::models::Team,
            crate::models::EventStatus,
            crate::models::EventStatusState,
            crate::models::Venue,
            crate::models::Broadcast,
            crate::models::Odds,
        )
    ),
    paths(
        crate::web::handlers::health::health_check,
        crate::web::handlers::epg::generate,
        crate::web::handlers::epg::xmltv,
        crate::web::handlers::events::generate,
        crate::web::handlers::events::xmltv,
        crate::web::handlers::events::test_match,
        crate::web::handlers::stats::overview,
        crate::web::handlers::stats::dashboard,
        crate::web::handlers::stats::history,
        crate::web::handlers::stats::runs,
        crate::web::handlers::stats::run_by_id,
        crate::web::handlers::migration::status,
        crate::web::handlers::migration::archive,
        crate::web::handlers::migration::download_backup,
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi
}
