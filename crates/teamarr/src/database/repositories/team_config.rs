//! SeaORM-backed repository for [`team_configs`](crate::entities::team_config).

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::TeamConfigs, team_config};
use crate::errors::StorageResult;
use crate::models::records::TeamConfigRecord;

#[derive(Debug, Clone)]
pub struct TeamConfigCreateRequest {
    pub provider: String,
    pub provider_team_id: String,
    pub league: String,
    pub channel_id: String,
    pub display_name: Option<String>,
    pub template_id: Uuid,
}

#[derive(Clone)]
pub struct TeamConfigRepository {
    connection: Arc<DatabaseConnection>,
}

impl TeamConfigRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(&self, request: TeamConfigCreateRequest) -> StorageResult<TeamConfigRecord> {
        let now = chrono::Utc::now();
        let active_model = team_config::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider: Set(request.provider),
            provider_team_id: Set(request.provider_team_id),
            league: Set(request.league),
            channel_id: Set(request.channel_id),
            display_name: Set(request.display_name),
            template_id: Set(request.template_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<TeamConfigRecord>> {
        Ok(TeamConfigs::find_by_id(*id)
            .one(&*self.connection)
            .await?
            .map(Self::model_to_domain))
    }

    pub async fn find_all(&self) -> StorageResult<Vec<TeamConfigRecord>> {
        let models = TeamConfigs::find().all(&*self.connection).await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    pub async fn find_by_league(&self, league: &str) -> StorageResult<Vec<TeamConfigRecord>> {
        let models = TeamConfigs::find()
            .filter(team_config::Column::League.eq(league))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    pub async fn delete(&self, id: &Uuid) -> StorageResult<()> {
        TeamConfigs::delete_by_id(*id).exec(&*self.connection).await?;
        Ok(())
    }

    fn model_to_domain(model: team_config::Model) -> TeamConfigRecord {
        TeamConfigRecord {
            id: model.id,
            provider: model.provider,
            provider_team_id: model.provider_team_id,
            league: model.league,
            channel_id: model.channel_id,
            display_name: model.display_name,
            template_id: model.template_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
