//! SeaORM-backed repository for
//! [`processing_runs`](crate::entities::processing_run), the append-only
//! run ledger the stats surface reads from.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::ProcessingRuns, processing_run};
use crate::errors::StorageResult;
use crate::models::records::ProcessingRunRecord;

#[derive(Debug, Clone)]
pub struct ProcessingRunStart {
    pub run_type: String,
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcessingRunCounts {
    pub streams_fetched: i32,
    pub streams_matched: i32,
    pub streams_unmatched: i32,
    pub streams_cached: i32,
    pub programmes_total: i32,
    pub programmes_events: i32,
    pub programmes_pregame: i32,
    pub programmes_postgame: i32,
    pub programmes_idle: i32,
}

#[derive(Clone)]
pub struct ProcessingRunRepository {
    connection: Arc<DatabaseConnection>,
}

impl ProcessingRunRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn start(&self, request: ProcessingRunStart) -> StorageResult<ProcessingRunRecord> {
        let now = chrono::Utc::now();
        let active_model = processing_run::ActiveModel {
            id: Set(Uuid::new_v4()),
            run_type: Set(request.run_type),
            group_id: Set(request.group_id),
            status: Set("running".to_string()),
            started_at: Set(now),
            finished_at: Set(None),
            streams_fetched: Set(0),
            streams_matched: Set(0),
            streams_unmatched: Set(0),
            streams_cached: Set(0),
            programmes_total: Set(0),
            programmes_events: Set(0),
            programmes_pregame: Set(0),
            programmes_postgame: Set(0),
            programmes_idle: Set(0),
            error_message: Set(None),
            metrics: Set(serde_json::json!({})),
            created_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn complete(
        &self,
        id: &Uuid,
        counts: ProcessingRunCounts,
        finished_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        self.finish(id, "completed", counts, None, finished_at).await
    }

    pub async fn fail(
        &self,
        id: &Uuid,
        error_message: String,
        finished_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        self.finish(
            id,
            "failed",
            ProcessingRunCounts::default(),
            Some(error_message),
            finished_at,
        )
        .await
    }

    async fn finish(
        &self,
        id: &Uuid,
        status: &str,
        counts: ProcessingRunCounts,
        error_message: Option<String>,
        finished_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        if let Some(model) = ProcessingRuns::find_by_id(*id).one(&*self.connection).await? {
            let mut active: processing_run::ActiveModel = model.into();
            active.status = Set(status.to_string());
            active.finished_at = Set(Some(finished_at));
            active.streams_fetched = Set(counts.streams_fetched);
            active.streams_matched = Set(counts.streams_matched);
            active.streams_unmatched = Set(counts.streams_unmatched);
            active.streams_cached = Set(counts.streams_cached);
            active.programmes_total = Set(counts.programmes_total);
            active.programmes_events = Set(counts.programmes_events);
            active.programmes_pregame = Set(counts.programmes_pregame);
            active.programmes_postgame = Set(counts.programmes_postgame);
            active.programmes_idle = Set(counts.programmes_idle);
            active.error_message = Set(error_message);
            active.update(&*self.connection).await?;
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<ProcessingRunRecord>> {
        Ok(ProcessingRuns::find_by_id(*id)
            .one(&*self.connection)
            .await?
            .map(Self::model_to_domain))
    }

    pub async fn find_recent(
        &self,
        limit: u64,
        run_type: Option<&str>,
        group_id: Option<Uuid>,
        status: Option<&str>,
    ) -> StorageResult<Vec<ProcessingRunRecord>> {
        let mut query = ProcessingRuns::find().order_by_desc(processing_run::Column::StartedAt);

        if let Some(run_type) = run_type {
            query = query.filter(processing_run::Column::RunType.eq(run_type));
        }
        if let Some(group_id) = group_id {
            query = query.filter(processing_run::Column::GroupId.eq(group_id));
        }
        if let Some(status) = status {
            query = query.filter(processing_run::Column::Status.eq(status));
        }

        let models = query.limit(limit).all(&*self.connection).await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    /// Runs started within the last `days`, oldest first, for the dashboard
    /// history chart.
    pub async fn find_since(
        &self,
        since: DateTime<Utc>,
    ) -> StorageResult<Vec<ProcessingRunRecord>> {
        let models = ProcessingRuns::find()
            .filter(processing_run::Column::StartedAt.gte(since))
            .order_by_asc(processing_run::Column::StartedAt)
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    fn model_to_domain(model: processing_run::Model) -> ProcessingRunRecord {
        ProcessingRunRecord {
            id: model.id,
            run_type: model.run_type,
            group_id: model.group_id,
            status: model.status,
            started_at: model.started_at,
            finished_at: model.finished_at,
            streams_fetched: model.streams_fetched,
            streams_matched: model.streams_matched,
            streams_unmatched: model.streams_unmatched,
            streams_cached: model.streams_cached,
            programmes_total: model.programmes_total,
            programmes_events: model.programmes_events,
            programmes_pregame: model.programmes_pregame,
            programmes_postgame: model.programmes_postgame,
            programmes_idle: model.programmes_idle,
            error_message: model.error_message,
            metrics: model.metrics,
            created_at: model.created_at,
        }
    }
}
