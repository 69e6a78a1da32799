//! Web layer
//!
//! Thin HTTP handlers over the service layer: admin endpoints for
//! on-demand EPG generation, XMLTV rendering, stats, and database
//! migration status, plus a health check and OpenAPI/Swagger docs.
//!
//! # Design Principles
//!
//! - **Thin Handlers**: handlers parse/validate and delegate to services
//! - **Consistent Responses**: every endpoint uses the same envelope
//! - **Proper Error Handling**: `AppError` maps to the right HTTP status

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::database::Database;
use crate::services::generation::GenerationService;
use crate::services::migration::MigrationService;
use crate::services::stats::StatsService;

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod utils;

pub use extractors::{ListParams, PaginationParams, RequestContext, SearchParams};
pub use responses::{handle_error, handle_result, ApiResponse, PaginatedResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub config: Config,
    pub generation: Arc<GenerationService>,
    pub stats: Arc<StatsService>,
    pub migration: Arc<MigrationService>,
    pub scheduler_running: Arc<AtomicBool>,
}

pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(
        config: Config,
        database: Database,
        generation: Arc<GenerationService>,
        stats: Arc<StatsService>,
        migration: Arc<MigrationService>,
        scheduler_running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let state = AppState {
            database,
            config,
            generation,
            stats,
            migration,
            scheduler_running,
        };

        Ok(Self {
            app: Self::create_router(state),
            addr,
        })
    }

    fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .merge(Self::openapi_routes())
            .nest("/api/v1", Self::api_v1_routes())
            .layer(axum::middleware::from_fn(middleware::security_headers_middleware))
            .layer(axum::middleware::from_fn(middleware::request_logging_middleware))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// OpenAPI spec plus an interactive Swagger UI at `/docs`.
    fn openapi_routes() -> Router<AppState> {
        use utoipa_swagger_ui::SwaggerUi;

        Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", openapi::get_openapi_spec()))
    }

    fn api_v1_routes() -> Router<AppState> {
        Router::new()
            .route("/epg/generate", post(handlers::epg::generate))
            .route("/epg/xmltv", get(handlers::epg::xmltv))
            .route("/epg/events/generate", post(handlers::events::generate))
            .route("/epg/events/xmltv", get(handlers::events::xmltv))
            .route("/epg/events/match", post(handlers::events::test_match))
            .route("/stats", get(handlers::stats::overview))
            .route("/stats/dashboard", get(handlers::stats::dashboard))
            .route("/stats/history", get(handlers::stats::history))
            .route("/stats/runs", get(handlers::stats::runs))
            .route("/stats/runs/{id}", get(handlers::stats::run_by_id))
            .route("/migration/status", get(handlers::migration::status))
            .route("/migration/archive", post(handlers::migration::archive))
            .route("/migration/download-backup", get(handlers::migration::download_backup))
    }

    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app).await?;
        Ok(())
    }

    pub async fn serve_with_shutdown(self, shutdown: impl std::future::Future<Output = ()> + Send + 'static) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Marks the scheduler as no longer running once its background task exits,
/// whether cleanly or by panic; read by the `/health` handler.
pub fn mark_scheduler_stopped(flag: &Arc<AtomicBool>) {
    flag.store(false, Ordering::Relaxed);
}
