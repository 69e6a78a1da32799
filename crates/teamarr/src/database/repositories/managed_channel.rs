//! SeaORM-backed repository for
//! [`managed_channels`](crate::entities::managed_channel).
//!
//! Owns the two invariants the lifecycle manager depends on: a channel
//! number is unique among active rows of a group, and an event has at most
//! one active managed channel within a group.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{managed_channel, prelude::ManagedChannels};
use crate::errors::StorageResult;
use crate::models::records::ManagedChannelRecord;

#[derive(Debug, Clone)]
pub struct ManagedChannelCreateRequest {
    pub event_epg_group_id: Uuid,
    pub host_channel_id: String,
    pub host_stream_id: String,
    pub channel_number: i32,
    pub event_id: String,
    pub league: String,
    pub channel_name: String,
    pub scheduled_delete_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ManagedChannelRepository {
    connection: Arc<DatabaseConnection>,
}

impl ManagedChannelRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(
        &self,
        request: ManagedChannelCreateRequest,
    ) -> StorageResult<ManagedChannelRecord> {
        let now = chrono::Utc::now();
        let active_model = managed_channel::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_epg_group_id: Set(request.event_epg_group_id),
            host_channel_id: Set(request.host_channel_id),
            host_stream_id: Set(request.host_stream_id),
            channel_number: Set(request.channel_number),
            event_id: Set(request.event_id),
            league: Set(request.league),
            channel_name: Set(request.channel_name),
            scheduled_delete_at: Set(request.scheduled_delete_at),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<ManagedChannelRecord>> {
        Ok(ManagedChannels::find_by_id(*id)
            .one(&*self.connection)
            .await?
            .map(Self::model_to_domain))
    }

    /// Active (not soft-deleted) managed channels for a group.
    pub async fn find_active_by_group(
        &self,
        group_id: &Uuid,
    ) -> StorageResult<Vec<ManagedChannelRecord>> {
        let models = ManagedChannels::find()
            .filter(managed_channel::Column::EventEpgGroupId.eq(*group_id))
            .filter(managed_channel::Column::DeletedAt.is_null())
            .order_by_asc(managed_channel::Column::ChannelNumber)
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    /// The existing active channel for an event in a group, if any.
    /// Duplicate discovery of an already-matched event resolves to this row.
    pub async fn find_active_by_event(
        &self,
        group_id: &Uuid,
        event_id: &str,
    ) -> StorageResult<Option<ManagedChannelRecord>> {
        let model = ManagedChannels::find()
            .filter(managed_channel::Column::EventEpgGroupId.eq(*group_id))
            .filter(managed_channel::Column::EventId.eq(event_id))
            .filter(managed_channel::Column::DeletedAt.is_null())
            .one(&*self.connection)
            .await?;
        Ok(model.map(Self::model_to_domain))
    }

    /// Lowest channel number `>= channel_start` not in use by an active row.
    pub async fn lowest_unused_channel_number(
        &self,
        group_id: &Uuid,
        channel_start: i32,
    ) -> StorageResult<i32> {
        let active = self.find_active_by_group(group_id).await?;
        let mut used: Vec<i32> = active.iter().map(|c| c.channel_number).collect();
        used.sort_unstable();

        let mut candidate = channel_start;
        for number in used {
            if number == candidate {
                candidate += 1;
            } else if number > candidate {
                break;
            }
        }
        Ok(candidate)
    }

    /// Managed channels due for the scheduled-deletion tick.
    pub async fn find_due_for_scheduled_deletion(
        &self,
        now: DateTime<Utc>,
    ) -> StorageResult<Vec<ManagedChannelRecord>> {
        let models = ManagedChannels::find()
            .filter(managed_channel::Column::DeletedAt.is_null())
            .filter(managed_channel::Column::ScheduledDeleteAt.is_not_null())
            .filter(managed_channel::Column::ScheduledDeleteAt.lte(now))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    pub async fn soft_delete(&self, id: &Uuid, deleted_at: DateTime<Utc>) -> StorageResult<()> {
        if let Some(model) = ManagedChannels::find_by_id(*id).one(&*self.connection).await? {
            let mut active: managed_channel::ActiveModel = model.into();
            active.deleted_at = Set(Some(deleted_at));
            active.updated_at = Set(deleted_at);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    /// Swaps the `channel_number` of two managed channels in place. Used by
    /// the keyword-ordering enforcement pass; the host's own channel
    /// numbering is not re-issued, only the local mirror.
    pub async fn swap_channel_numbers(&self, a: &Uuid, b: &Uuid) -> StorageResult<()> {
        let (Some(model_a), Some(model_b)) = (
            ManagedChannels::find_by_id(*a).one(&*self.connection).await?,
            ManagedChannels::find_by_id(*b).one(&*self.connection).await?,
        ) else {
            return Ok(());
        };

        let now = chrono::Utc::now();
        let (number_a, number_b) = (model_a.channel_number, model_b.channel_number);

        let mut active_a: managed_channel::ActiveModel = model_a.into();
        active_a.channel_number = Set(number_b);
        active_a.updated_at = Set(now);
        active_a.update(&*self.connection).await?;

        let mut active_b: managed_channel::ActiveModel = model_b.into();
        active_b.channel_number = Set(number_a);
        active_b.updated_at = Set(now);
        active_b.update(&*self.connection).await?;

        Ok(())
    }

    /// Rolls back a created row after a post-persistence failure leaves the
    /// host channel orphaned relative to local state.
    pub async fn hard_delete(&self, id: &Uuid) -> StorageResult<()> {
        ManagedChannels::delete_by_id(*id).exec(&*self.connection).await?;
        Ok(())
    }

    /// Soft-deleted rows whose `deleted_at` is older than `retention` ago.
    pub async fn purge_retained(
        &self,
        now: DateTime<Utc>,
        retention: chrono::Duration,
    ) -> StorageResult<u64> {
        let cutoff = now - retention;
        let result = ManagedChannels::delete_many()
            .filter(managed_channel::Column::DeletedAt.is_not_null())
            .filter(managed_channel::Column::DeletedAt.lte(cutoff))
            .exec(&*self.connection)
            .await?;
        Ok(result.rows_affected)
    }

    fn model_to_domain(model: managed_channel::Model) -> ManagedChannelRecord {
        ManagedChannelRecord {
            id: model.id,
            event_epg_group_id: model.event_epg_group_id,
            host_channel_id: model.host_channel_id,
            host_stream_id: model.host_stream_id,
            channel_number: model.channel_number,
            event_id: model.event_id,
            league: model.league,
            channel_name: model.channel_name,
            scheduled_delete_at: model.scheduled_delete_at,
            deleted_at: model.deleted_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::Migrator;
    use crate::database::repositories::{
        event_epg_group::{EventEpgGroupCreateRequest, EventEpgGroupRepository},
        template::{TemplateCreateRequest, TemplateRepository},
    };
    use crate::models::FillerConfig;
    use sea_orm_migration::MigratorTrait;

    async fn test_connection() -> Arc<DatabaseConnection> {
        let conn = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        Arc::new(conn)
    }

    async fn seed_group(conn: Arc<DatabaseConnection>) -> Uuid {
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
        let group = groups
            .create(EventEpgGroupCreateRequest {
                host_group_id: "host-group-1".into(),
                name: "NFL".into(),
                leagues: vec!["nfl".into()],
                include_leagues: vec!["nfl".into()],
                exception_keywords: vec![],
                refresh_interval_minutes: 15,
                channel_start: Some(500),
                create_timing: "day_of".into(),
                delete_timing: "stream_removed".into(),
                timezone: "UTC".into(),
                template_id: template.id,
                epg_source_id: None,
            })
            .await
            .unwrap();
        group.id
    }

    #[tokio::test]
    async fn allocates_lowest_unused_number_around_gaps() {
        let conn = test_connection().await;
        let group_id = seed_group(conn.clone()).await;
        let repo = ManagedChannelRepository::new(conn);

        repo.create(ManagedChannelCreateRequest {
            event_epg_group_id: group_id,
            host_channel_id: "hc-1".into(),
            host_stream_id: "hs-1".into(),
            channel_number: 500,
            event_id: "evt-1".into(),
            league: "nfl".into(),
            channel_name: "Away @ Home".into(),
            scheduled_delete_at: None,
        })
        .await
        .unwrap();

        repo.create(ManagedChannelCreateRequest {
            event_epg_group_id: group_id,
            host_channel_id: "hc-2".into(),
            host_stream_id: "hs-2".into(),
            channel_number: 502,
            event_id: "evt-2".into(),
            league: "nfl".into(),
            channel_name: "Away2 @ Home2".into(),
            scheduled_delete_at: None,
        })
        .await
        .unwrap();

        let next = repo.lowest_unused_channel_number(&group_id, 500).await.unwrap();
        assert_eq!(next, 501);
    }

    #[tokio::test]
    async fn soft_deleted_rows_free_their_channel_number() {
        let conn = test_connection().await;
        let group_id = seed_group(conn.clone()).await;
        let repo = ManagedChannelRepository::new(conn);

        let created = repo
            .create(ManagedChannelCreateRequest {
                event_epg_group_id: group_id,
                host_channel_id: "hc-1".into(),
                host_stream_id: "hs-1".into(),
                channel_number: 500,
                event_id: "evt-1".into(),
                league: "nfl".into(),
                channel_name: "Away @ Home".into(),
                scheduled_delete_at: None,
            })
            .await
            .unwrap();

        repo.soft_delete(&created.id, chrono::Utc::now()).await.unwrap();

        let next = repo.lowest_unused_channel_number(&group_id, 500).await.unwrap();
        assert_eq!(next, 500);
    }
}
