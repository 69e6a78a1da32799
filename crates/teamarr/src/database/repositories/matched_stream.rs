//! SeaORM-backed repository for
//! [`matched_streams`](crate::entities::matched_stream).

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{matched_stream, prelude::MatchedStreams};
use crate::errors::StorageResult;
use crate::models::records::MatchedStreamRecord;

#[derive(Debug, Clone)]
pub struct MatchedStreamCreateRequest {
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub event_id: String,
    pub league: String,
    pub included: bool,
    pub reason: Option<String>,
}

#[derive(Clone)]
pub struct MatchedStreamRepository {
    connection: Arc<DatabaseConnection>,
}

impl MatchedStreamRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(
        &self,
        request: MatchedStreamCreateRequest,
    ) -> StorageResult<MatchedStreamRecord> {
        let now = chrono::Utc::now();
        let active_model = matched_stream::ActiveModel {
            id: Set(Uuid::new_v4()),
            run_id: Set(request.run_id),
            group_id: Set(request.group_id),
            stream_id: Set(request.stream_id),
            stream_name: Set(request.stream_name),
            event_id: Set(request.event_id),
            league: Set(request.league),
            included: Set(request.included),
            reason: Set(request.reason),
            created_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_run(&self, run_id: &Uuid) -> StorageResult<Vec<MatchedStreamRecord>> {
        let models = MatchedStreams::find()
            .filter(matched_stream::Column::RunId.eq(*run_id))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    /// Stream ids currently matched and present for a group, used by the
    /// lifecycle manager's reactive-deletion pass to diff against the
    /// host's current stream inventory.
    pub async fn find_stream_ids_by_group(&self, group_id: &Uuid) -> StorageResult<Vec<String>> {
        let models = MatchedStreams::find()
            .filter(matched_stream::Column::GroupId.eq(*group_id))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(|m| m.stream_id).collect())
    }

    fn model_to_domain(model: matched_stream::Model) -> MatchedStreamRecord {
        MatchedStreamRecord {
            id: model.id,
            run_id: model.run_id,
            group_id: model.group_id,
            stream_id: model.stream_id,
            stream_name: model.stream_name,
            event_id: model.event_id,
            league: model.league,
            included: model.included,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
