//! SeaORM-backed repository for
//! [`failed_matches`](crate::entities::failed_match).

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{failed_match, prelude::FailedMatches};
use crate::errors::StorageResult;
use crate::models::records::FailedMatchRecord;

#[derive(Debug, Clone)]
pub struct FailedMatchCreateRequest {
    pub run_id: Uuid,
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub reason: String,
}

#[derive(Clone)]
pub struct FailedMatchRepository {
    connection: Arc<DatabaseConnection>,
}

impl FailedMatchRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(
        &self,
        request: FailedMatchCreateRequest,
    ) -> StorageResult<FailedMatchRecord> {
        let now = chrono::Utc::now();
        let active_model = failed_match::ActiveModel {
            id: Set(Uuid::new_v4()),
            run_id: Set(request.run_id),
            group_id: Set(request.group_id),
            stream_id: Set(request.stream_id),
            stream_name: Set(request.stream_name),
            reason: Set(request.reason),
            created_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_run(&self, run_id: &Uuid) -> StorageResult<Vec<FailedMatchRecord>> {
        let models = FailedMatches::find()
            .filter(failed_match::Column::RunId.eq(*run_id))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    fn model_to_domain(model: failed_match::Model) -> FailedMatchRecord {
        FailedMatchRecord {
            id: model.id,
            run_id: model.run_id,
            group_id: model.group_id,
            stream_id: model.stream_id,
            stream_name: model.stream_name,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
