//! A single long-lived cooperative tick, independent of the on-demand
//! generation runs, that sweeps scheduled channel deletions and purges
//! stale stream-match cache entries.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{LifecycleConfig, MatchingConfig, SchedulerConfig};
use crate::database::repositories::settings::SettingsRepository;
use crate::database::repositories::stream_match_cache::StreamMatchCacheRepository;
use crate::services::lifecycle::LifecycleManager;

pub struct Scheduler {
    lifecycle: Arc<LifecycleManager>,
    stream_match_cache: StreamMatchCacheRepository,
    settings: SettingsRepository,
    interval: Duration,
    retention: chrono::Duration,
    cache_purge_generations: i64,
}

impl Scheduler {
    pub fn new(
        lifecycle: Arc<LifecycleManager>,
        stream_match_cache: StreamMatchCacheRepository,
        settings: SettingsRepository,
        scheduler_config: &SchedulerConfig,
        lifecycle_config: &LifecycleConfig,
        matching_config: &MatchingConfig,
    ) -> Self {
        Self {
            lifecycle,
            stream_match_cache,
            settings,
            interval: Duration::from_secs(scheduler_config.interval_minutes * 60),
            retention: chrono::Duration::days(lifecycle_config.retention_days),
            cache_purge_generations: matching_config.cache_purge_generations,
        }
    }

    /// Runs until `cancellation_token` fires. Cancellation interrupts an
    /// in-progress sleep immediately, so shutdown is bounded by a small
    /// constant rather than by the tick interval.
    pub async fn run(&self, cancellation_token: CancellationToken) {
        info!("starting background scheduler with a {:?} interval", self.interval);
        let mut tick = interval(self.interval);
        tick.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(error) = self.run_once().await {
                        error!("scheduled tick failed: {}", error);
                    }
                }
                _ = cancellation_token.cancelled() => {
                    info!("scheduler received cancellation signal, shutting down");
                    break;
                }
            }
        }
    }

    async fn run_once(&self) -> crate::errors::AppResult<()> {
        let now = chrono::Utc::now();

        self.lifecycle.run_scheduled_deletion_sweep(now).await?;
        self.lifecycle.purge_retained(now, self.retention).await?;

        let generation = self.settings.get().await?.generation_counter;
        let purged = self
            .stream_match_cache
            .purge_stale(generation, self.cache_purge_generations)
            .await?;
        if purged > 0 {
            info!("purged {} stale stream-match cache entries", purged);
        }

        Ok(())
    }
}
