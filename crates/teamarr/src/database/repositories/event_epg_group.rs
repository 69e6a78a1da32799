//! SeaORM-backed repository for
//! [`event_epg_groups`](crate::entities::event_epg_group).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use super::traits::ConversionUtils;
use crate::entities::{event_epg_group, prelude::EventEpgGroups};
use crate::errors::{StorageError, StorageResult};
use crate::models::records::EventEpgGroupRecord;
use crate::utils::time::validate_timezone;

#[derive(Debug, Clone)]
pub struct EventEpgGroupCreateRequest {
    pub host_group_id: String,
    pub name: String,
    pub leagues: Vec<String>,
    pub include_leagues: Vec<String>,
    pub exception_keywords: Vec<String>,
    pub refresh_interval_minutes: i32,
    pub channel_start: Option<i32>,
    pub create_timing: String,
    pub delete_timing: String,
    pub timezone: String,
    pub template_id: Uuid,
    pub epg_source_id: Option<String>,
}

#[derive(Clone)]
pub struct EventEpgGroupRepository {
    connection: Arc<DatabaseConnection>,
}

impl EventEpgGroupRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(
        &self,
        request: EventEpgGroupCreateRequest,
    ) -> StorageResult<EventEpgGroupRecord> {
        let timezone = validate_timezone(&request.timezone).map_err(|message| {
            StorageError::ConstraintViolation {
                constraint: "event_epg_groups.timezone".into(),
                message,
            }
        })?;

        let now = chrono::Utc::now();
        let active_model = event_epg_group::ActiveModel {
            id: Set(Uuid::new_v4()),
            host_group_id: Set(request.host_group_id),
            name: Set(request.name),
            leagues: Set(ConversionUtils::to_json(&request.leagues)?),
            include_leagues: Set(ConversionUtils::to_json(&request.include_leagues)?),
            exception_keywords: Set(ConversionUtils::to_json(&request.exception_keywords)?),
            refresh_interval_minutes: Set(request.refresh_interval_minutes),
            channel_start: Set(request.channel_start),
            create_timing: Set(request.create_timing),
            delete_timing: Set(request.delete_timing),
            timezone: Set(timezone),
            template_id: Set(request.template_id),
            epg_source_id: Set(request.epg_source_id),
            stream_count: Set(0),
            matched_count: Set(0),
            last_refresh: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        self.model_to_domain(model)
    }

    pub async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<EventEpgGroupRecord>> {
        match EventEpgGroups::find_by_id(*id).one(&*self.connection).await? {
            Some(model) => Ok(Some(self.model_to_domain(model)?)),
            None => Ok(None),
        }
    }

    pub async fn find_all(&self) -> StorageResult<Vec<EventEpgGroupRecord>> {
        let models = EventEpgGroups::find().all(&*self.connection).await?;
        models.into_iter().map(|m| self.model_to_domain(m)).collect()
    }

    /// Updates the denormalized dashboard counters after a generation run
    /// so the dashboard never has to aggregate `matched_streams` itself.
    pub async fn record_refresh(
        &self,
        id: &Uuid,
        stream_count: i32,
        matched_count: i32,
        refreshed_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        if let Some(model) = EventEpgGroups::find_by_id(*id).one(&*self.connection).await? {
            let mut active: event_epg_group::ActiveModel = model.into();
            active.stream_count = Set(stream_count);
            active.matched_count = Set(matched_count);
            active.last_refresh = Set(Some(refreshed_at));
            active.updated_at = Set(refreshed_at);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn delete(&self, id: &Uuid) -> StorageResult<()> {
        EventEpgGroups::delete_by_id(*id).exec(&*self.connection).await?;
        Ok(())
    }

    fn model_to_domain(&self, model: event_epg_group::Model) -> StorageResult<EventEpgGroupRecord> {
        Ok(EventEpgGroupRecord {
            id: model.id,
            host_group_id: model.host_group_id,
            name: model.name,
            leagues: ConversionUtils::from_json(model.leagues)?,
            include_leagues: ConversionUtils::from_json(model.include_leagues)?,
            exception_keywords: ConversionUtils::from_json(model.exception_keywords)?,
            refresh_interval_minutes: model.refresh_interval_minutes,
            channel_start: model.channel_start,
            create_timing: model.create_timing,
            delete_timing: model.delete_timing,
            timezone: model.timezone,
            template_id: model.template_id,
            epg_source_id: model.epg_source_id,
            stream_count: model.stream_count,
            matched_count: model.matched_count,
            last_refresh: model.last_refresh,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
