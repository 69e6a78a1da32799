//! Channel lifecycle manager: coordinates the host's channel inventory
//! with the locally matched-stream set for groups configured to manage
//! channels (i.e. with a `channel_start`).

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::repositories::managed_channel::{
    ManagedChannelCreateRequest, ManagedChannelRepository,
};
use crate::errors::{AppResult, HostError};
use crate::models::records::{EventEpgGroupRecord, ManagedChannelRecord};
use crate::services::host_client::{CreateChannelRequest, HostClient};
use crate::utils::time::{local_date, local_midnight_utc};

/// A single matched-and-included stream awaiting a create-timing
/// decision, assembled by the event generator from a fresh [`crate::models::Event`]
/// and its rendered channel name.
#[derive(Debug, Clone)]
pub struct PendingChannelCreate {
    pub event_id: String,
    pub league: String,
    pub stream_id: String,
    pub stream_name: String,
    pub start_time: DateTime<Utc>,
    pub channel_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreateTiming {
    DayOf,
    DayBefore,
    TwoDaysBefore,
    WeekBefore,
}

impl CreateTiming {
    fn parse(value: &str) -> Self {
        match value {
            "day_before" => Self::DayBefore,
            "2_days_before" => Self::TwoDaysBefore,
            "week_before" => Self::WeekBefore,
            "day_of" => Self::DayOf,
            other => {
                warn!("unrecognized create_timing '{}', defaulting to day_of", other);
                Self::DayOf
            }
        }
    }

    fn lead_days(self) -> i64 {
        match self {
            Self::DayOf => 0,
            Self::DayBefore => 1,
            Self::TwoDaysBefore => 2,
            Self::WeekBefore => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteTiming {
    StreamRemoved,
    Manual,
    EndOfDay,
    EndOfNextDay,
}

impl DeleteTiming {
    fn parse(value: &str) -> Self {
        match value {
            "end_of_day" => Self::EndOfDay,
            "end_of_next_day" => Self::EndOfNextDay,
            "manual" => Self::Manual,
            "stream_removed" => Self::StreamRemoved,
            other => {
                warn!("unrecognized delete_timing '{}', defaulting to stream_removed", other);
                Self::StreamRemoved
            }
        }
    }

    fn is_reactive(self) -> bool {
        matches!(self, Self::StreamRemoved)
    }

    /// `event_date` and the midnight boundary are both evaluated in
    /// `timezone`, the owning group's local timezone.
    fn scheduled_delete_at(self, event_date: chrono::NaiveDate, timezone: &str) -> Option<DateTime<Utc>> {
        match self {
            Self::StreamRemoved | Self::Manual => None,
            Self::EndOfDay => Some(local_midnight_utc(timezone, event_date + chrono::Duration::days(1))),
            Self::EndOfNextDay => Some(local_midnight_utc(timezone, event_date + chrono::Duration::days(2))),
        }
    }
}

pub struct LifecycleManager {
    managed_channels: ManagedChannelRepository,
    host: Arc<dyn HostClient>,
}

impl LifecycleManager {
    pub fn new(managed_channels: ManagedChannelRepository, host: Arc<dyn HostClient>) -> Self {
        Self {
            managed_channels,
            host,
        }
    }

    /// (a) Creation: for each pending match with no active managed channel
    /// yet, apply the group's create-timing policy, allocate a channel
    /// number, create it on the host, and persist the local row.
    pub async fn process_creations(
        &self,
        group: &EventEpgGroupRecord,
        pending: &[PendingChannelCreate],
        now: DateTime<Utc>,
    ) -> AppResult<Vec<ManagedChannelRecord>> {
        let Some(channel_start) = group.channel_start else {
            return Ok(Vec::new());
        };
        let create_timing = CreateTiming::parse(&group.create_timing);
        let delete_timing = DeleteTiming::parse(&group.delete_timing);

        let mut created = Vec::new();
        for candidate in pending {
            if self
                .managed_channels
                .find_active_by_event(&group.id, &candidate.event_id)
                .await
                .map_err(crate::errors::AppError::from)?
                .is_some()
            {
                continue;
            }

            let lead = local_date(&group.timezone, now) + chrono::Duration::days(create_timing.lead_days());
            if lead < local_date(&group.timezone, candidate.start_time) {
                continue;
            }

            let number = self
                .managed_channels
                .lowest_unused_channel_number(&group.id, channel_start)
                .await
                .map_err(crate::errors::AppError::from)?;

            let scheduled_delete_at = delete_timing
                .scheduled_delete_at(local_date(&group.timezone, candidate.start_time), &group.timezone);

            let host_channel_id = match self
                .host
                .create_channel(CreateChannelRequest {
                    name: candidate.channel_name.clone(),
                    number,
                    stream_ids: vec![candidate.stream_id.clone()],
                })
                .await
            {
                Ok(id) => id,
                Err(error) => {
                    warn!(
                        "failed to create host channel for event {}: {}",
                        candidate.event_id, error
                    );
                    continue;
                }
            };

            if let Some(epg_source_id) = &group.epg_source_id {
                if let Err(error) = self.host.set_channel_epg(&host_channel_id, epg_source_id).await {
                    warn!("failed to bind EPG source to channel {}: {}", host_channel_id, error);
                }
            }

            let persisted = self
                .managed_channels
                .create(ManagedChannelCreateRequest {
                    event_epg_group_id: group.id,
                    host_channel_id: host_channel_id.clone(),
                    host_stream_id: candidate.stream_id.clone(),
                    channel_number: number,
                    event_id: candidate.event_id.clone(),
                    league: candidate.league.clone(),
                    channel_name: candidate.channel_name.clone(),
                    scheduled_delete_at,
                })
                .await;

            match persisted {
                Ok(record) => created.push(record),
                Err(error) => {
                    warn!(
                        "failed to persist managed channel for host channel {}, rolling back: {}",
                        host_channel_id, error
                    );
                    if let Err(rollback_error) = self.host.delete_channel(&host_channel_id).await {
                        warn!(
                            "compensating delete of orphaned host channel {} also failed: {}",
                            host_channel_id, rollback_error
                        );
                    }
                }
            }
        }

        Ok(created)
    }

    /// (b) Reactive deletion: for `stream_removed` groups, soft-delete and
    /// host-delete any active managed channel whose stream is no longer
    /// present on the host.
    pub async fn process_reactive_deletions(
        &self,
        group: &EventEpgGroupRecord,
        current_host_stream_ids: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> AppResult<usize> {
        if !DeleteTiming::parse(&group.delete_timing).is_reactive() {
            return Ok(0);
        }

        let active = self
            .managed_channels
            .find_active_by_group(&group.id)
            .await
            .map_err(crate::errors::AppError::from)?;

        let mut removed = 0;
        for channel in active {
            if current_host_stream_ids.contains(&channel.host_stream_id) {
                continue;
            }
            self.delete_channel(&channel, now).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// (c) Scheduled deletion: the background tick's sweep across every
    /// group for channels whose `scheduled_delete_at` has passed.
    pub async fn run_scheduled_deletion_sweep(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let due = self
            .managed_channels
            .find_due_for_scheduled_deletion(now)
            .await
            .map_err(crate::errors::AppError::from)?;

        let count = due.len();
        for channel in due {
            self.delete_channel(&channel, now).await?;
        }
        if count > 0 {
            info!("scheduled-deletion sweep removed {} channel(s)", count);
        }
        Ok(count)
    }

    /// (d) Retention: hard-delete soft-deleted rows older than `retention`.
    pub async fn purge_retained(&self, now: DateTime<Utc>, retention: chrono::Duration) -> AppResult<u64> {
        let purged = self
            .managed_channels
            .purge_retained(now, retention)
            .await
            .map_err(crate::errors::AppError::from)?;
        if purged > 0 {
            info!("retention purge hard-deleted {} channel row(s)", purged);
        }
        Ok(purged)
    }

    async fn delete_channel(&self, channel: &ManagedChannelRecord, now: DateTime<Utc>) -> AppResult<()> {
        match self.host.delete_channel(&channel.host_channel_id).await {
            Ok(()) => {}
            Err(error) if error.is_not_found() => {}
            Err(error) => return Err(crate::errors::AppError::from(error)),
        }
        self.managed_channels
            .soft_delete(&channel.id, now)
            .await
            .map_err(crate::errors::AppError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::Migrator;
    use crate::database::repositories::event_epg_group::{
        EventEpgGroupCreateRequest, EventEpgGroupRepository,
    };
    use crate::database::repositories::template::{TemplateCreateRequest, TemplateRepository};
    use crate::models::FillerConfig;
    use async_trait::async_trait;
    use sea_orm::DatabaseConnection;
    use sea_orm_migration::MigratorTrait;
    use std::sync::Mutex as StdMutex;

    struct FakeHost {
        next_id: StdMutex<u32>,
        created: StdMutex<Vec<CreateChannelRequest>>,
        deleted: StdMutex<Vec<String>>,
    }

    impl FakeHost {
        fn new() -> Self {
            Self {
                next_id: StdMutex::new(0),
                created: StdMutex::new(Vec::new()),
                deleted: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HostClient for FakeHost {
        async fn list_streams(&self) -> crate::errors::HostResult<Vec<crate::services::host_client::HostStream>> {
            Ok(vec![])
        }

        async fn list_channels(&self) -> crate::errors::HostResult<Vec<crate::services::host_client::HostChannel>> {
            Ok(vec![])
        }

        async fn create_channel(&self, request: CreateChannelRequest) -> crate::errors::HostResult<String> {
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            self.created.lock().unwrap().push(request);
            Ok(format!("host-chan-{id}"))
        }

        async fn delete_channel(&self, channel_id: &str) -> crate::errors::HostResult<()> {
            self.deleted.lock().unwrap().push(channel_id.to_string());
            Ok(())
        }

        async fn set_channel_epg(&self, _channel_id: &str, _epg_source_id: &str) -> crate::errors::HostResult<()> {
            Ok(())
        }
    }

    async fn test_connection() -> Arc<DatabaseConnection> {
        let conn = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        Arc::new(conn)
    }

    async fn seed_group(conn: Arc<DatabaseConnection>, create_timing: &str) -> EventEpgGroupRecord {
        let templates = TemplateRepository::new(conn.clone());
        let template = templates
            .create(TemplateCreateRequest {
                name: format!("tmpl-{}", Uuid::new_v4()),
                template_type: "event".into(),
                title_pattern: "{away} @ {home}".into(),
                subtitle_pattern: None,
                description_pattern: None,
                pregame_minutes: 30,
                default_duration_minutes: 180,
                filler_config: FillerConfig::default(),
                description_options: vec![],
            })
            .await
            .unwrap();

        let groups = EventEpgGroupRepository::new(conn);
        groups
            .create(EventEpgGroupCreateRequest {
                host_group_id: "host-group-1".into(),
                name: "NFL".into(),
                leagues: vec!["nfl".into()],
                include_leagues: vec!["nfl".into()],
                exception_keywords: vec![],
                refresh_interval_minutes: 15,
                channel_start: Some(500),
                create_timing: create_timing.into(),
                delete_timing: "stream_removed".into(),
                timezone: "UTC".into(),
                template_id: template.id,
                epg_source_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn skips_creation_before_the_create_timing_window() {
        let conn = test_connection().await;
        let group = seed_group(conn.clone(), "day_before").await;
        let host = Arc::new(FakeHost::new());
        let manager = LifecycleManager::new(ManagedChannelRepository::new(conn), host.clone());

        let now = Utc::now();
        let pending = vec![PendingChannelCreate {
            event_id: "evt-1".into(),
            league: "nfl".into(),
            stream_id: "stream-1".into(),
            stream_name: "Away vs Home".into(),
            start_time: now + chrono::Duration::days(5),
            channel_name: "Away @ Home".into(),
        }];

        let created = manager.process_creations(&group, &pending, now).await.unwrap();
        assert!(created.is_empty());
        assert!(host.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn creates_a_channel_once_the_window_opens() {
        let conn = test_connection().await;
        let group = seed_group(conn.clone(), "day_of").await;
        let host = Arc::new(FakeHost::new());
        let manager = LifecycleManager::new(ManagedChannelRepository::new(conn), host.clone());

        let now = Utc::now();
        let pending = vec![PendingChannelCreate {
            event_id: "evt-1".into(),
            league: "nfl".into(),
            stream_id: "stream-1".into(),
            stream_name: "Away vs Home".into(),
            start_time: now,
            channel_name: "Away @ Home".into(),
        }];

        let created = manager.process_creations(&group, &pending, now).await.unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].channel_number, 500);
        assert_eq!(host.created.lock().unwrap().len(), 1);
    }
}
