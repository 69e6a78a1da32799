use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamarr::config::Config;
use teamarr::database::Database;
use teamarr::database::repositories::{
    EventEpgGroupRepository, FailedMatchRepository, ManagedChannelRepository, MatchedStreamRepository,
    ProcessingRunRepository, SettingsRepository, StreamMatchCacheRepository, TeamAliasRepository, TeamConfigRepository,
    TemplateRepository,
};
use teamarr::providers::espn::EspnProvider;
use teamarr::providers::http::ProviderHttpClient;
use teamarr::scheduler::Scheduler;
use teamarr::services::cache::CacheService;
use teamarr::services::epg::consolidator::Consolidator;
use teamarr::services::generation::GenerationService;
use teamarr::services::host_client::{HostClient, HttpHostClient};
use teamarr::services::lifecycle::LifecycleManager;
use teamarr::services::migration::MigrationService;
use teamarr::services::sports_data::SportsDataService;
use teamarr::services::stats::StatsService;
use teamarr::web::{self, WebServer};

/// Get dependencies from the build-time SBOM.
fn get_dependencies() -> Result<Value, Box<dyn std::error::Error>> {
    let sbom_str = include_str!(concat!(env!("OUT_DIR"), "/sbom.json"));
    let sbom: Value = serde_json::from_str(sbom_str)?;
    Ok(sbom)
}

/// Print version information including dependency versions pulled from the SBOM.
fn print_version_info() {
    println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("Build Information:");
    println!("  Target: {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    println!();
    println!("Software Bill of Materials:");

    match get_dependencies() {
        Ok(sbom) => {
            let mut dependencies = Vec::new();
            if let Some(packages) = sbom["packages"].as_array() {
                for package in packages {
                    if let (Some(name), Some(version)) = (package["name"].as_str(), package["versionInfo"].as_str()) {
                        if name != env!("CARGO_PKG_NAME") && !version.contains("path+") {
                            dependencies.push((name.to_string(), version.to_string()));
                        }
                    }
                }
            }
            dependencies.sort_by(|a, b| a.0.cmp(&b.0));
            if dependencies.is_empty() {
                println!("  (No external components found in SBOM)");
            } else {
                for (name, version) in dependencies {
                    println!("  {name}: {version}");
                }
            }
        }
        Err(_) => println!("  (Unable to read SBOM data)"),
    }
}

#[derive(Parser)]
#[command(name = "teamarr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sports-oriented EPG/XMLTV generation and IPTV channel lifecycle management")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Database URL (overrides config file)
    #[arg(short = 'd', long, value_name = "URL")]
    database_url: Option<String>,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Print version information including dependency versions
    #[arg(short = 'v', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        print_version_info();
        return Ok(());
    }

    let log_filter = format!("teamarr={}", cli.log_level);
    let filter_layer =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter.into());
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting teamarr v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("configuration loaded from: {}", cli.config);

    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(database_url) = cli.database_url {
        config.database.url = database_url;
    }

    let database = Database::new(&config.database).await?;
    info!("database connection established");

    let migration = Arc::new(MigrationService::new(
        database.clone(),
        MigrationService::sqlite_path_from_url(&config.database.url),
    ));
    migration.detect_and_archive_legacy().await?;
    database.migrate().await?;
    info!("migrations applied");

    let connection = database.connection();
    let runs = ProcessingRunRepository::new(connection.clone());
    let settings = SettingsRepository::new(connection.clone());
    let team_configs = TeamConfigRepository::new(connection.clone());
    let event_groups = EventEpgGroupRepository::new(connection.clone());
    let templates = TemplateRepository::new(connection.clone());
    let managed_channels = ManagedChannelRepository::new(connection.clone());
    let matched_streams = MatchedStreamRepository::new(connection.clone());
    let failed_matches = FailedMatchRepository::new(connection.clone());
    let stream_match_cache = StreamMatchCacheRepository::new(connection.clone());
    let team_aliases = TeamAliasRepository::new(connection.clone());

    let provider_http = ProviderHttpClient::new(&config.provider)?;
    let espn_provider = Arc::new(EspnProvider::new(provider_http));
    let sports_data = Arc::new(SportsDataService::new(vec![espn_provider]));

    let host_client: Arc<dyn HostClient> = Arc::new(HttpHostClient::new(&config.host)?);
    let lifecycle = Arc::new(LifecycleManager::new(managed_channels.clone(), host_client.clone()));

    let files = sandboxed_file_manager::SandboxedManager::builder()
        .base_directory(&config.storage.data_dir)
        .build()
        .await?;
    let consolidator = Consolidator::new(files, config.storage.published_filename.clone());

    let cache = CacheService::new(stream_match_cache.clone());

    let stats = Arc::new(StatsService::new(runs.clone()));
    let generation = Arc::new(GenerationService::new(
        sports_data,
        cache,
        lifecycle.clone(),
        host_client,
        consolidator,
        runs,
        settings.clone(),
        team_configs,
        event_groups,
        templates,
        managed_channels,
        matched_streams,
        failed_matches,
        team_aliases,
        config.matching.fuzzy_threshold,
    ));

    let scheduler_running = Arc::new(AtomicBool::new(true));
    let scheduler = Scheduler::new(
        lifecycle,
        stream_match_cache,
        settings,
        &config.scheduler,
        &config.lifecycle,
        &config.matching,
    );
    let cancellation_token = CancellationToken::new();
    let scheduler_token = cancellation_token.clone();
    let scheduler_running_flag = scheduler_running.clone();
    tokio::spawn(async move {
        scheduler.run(scheduler_token).await;
        web::mark_scheduler_stopped(&scheduler_running_flag);
    });

    let web_server = WebServer::new(config, database, generation, stats, migration, scheduler_running)?;
    info!("starting web server on {}:{}", web_server.host(), web_server.port());

    let shutdown = {
        let cancellation_token = cancellation_token.clone();
        async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            cancellation_token.cancel();
        }
    };

    web_server.serve_with_shutdown(shutdown).await?;
    Ok(())
}
