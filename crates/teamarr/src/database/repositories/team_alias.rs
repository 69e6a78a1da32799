//! SeaORM-backed repository for
//! [`team_aliases`](crate::entities::team_alias) — operator overrides that
//! bypass fuzzy matching entirely when an alias is recognized.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{prelude::TeamAliases, team_alias};
use crate::errors::StorageResult;
use crate::models::records::TeamAliasRecord;

#[derive(Debug, Clone)]
pub struct TeamAliasCreateRequest {
    pub alias: String,
    pub league: String,
    pub provider_team_id: String,
    pub provider_team_name: String,
}

#[derive(Clone)]
pub struct TeamAliasRepository {
    connection: Arc<DatabaseConnection>,
}

impl TeamAliasRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(&self, request: TeamAliasCreateRequest) -> StorageResult<TeamAliasRecord> {
        let now = chrono::Utc::now();
        let active_model = team_alias::ActiveModel {
            id: Set(Uuid::new_v4()),
            alias: Set(request.alias),
            league: Set(request.league),
            provider_team_id: Set(request.provider_team_id),
            provider_team_name: Set(request.provider_team_name),
            created_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        Ok(Self::model_to_domain(model))
    }

    pub async fn find_by_alias(
        &self,
        alias: &str,
        league: &str,
    ) -> StorageResult<Option<TeamAliasRecord>> {
        let model = TeamAliases::find()
            .filter(team_alias::Column::Alias.eq(alias))
            .filter(team_alias::Column::League.eq(league))
            .one(&*self.connection)
            .await?;
        Ok(model.map(Self::model_to_domain))
    }

    pub async fn find_by_league(&self, league: &str) -> StorageResult<Vec<TeamAliasRecord>> {
        let models = TeamAliases::find()
            .filter(team_alias::Column::League.eq(league))
            .all(&*self.connection)
            .await?;
        Ok(models.into_iter().map(Self::model_to_domain).collect())
    }

    pub async fn delete(&self, id: &Uuid) -> StorageResult<()> {
        TeamAliases::delete_by_id(*id).exec(&*self.connection).await?;
        Ok(())
    }

    fn model_to_domain(model: team_alias::Model) -> TeamAliasRecord {
        TeamAliasRecord {
            id: model.id,
            alias: model.alias,
            league: model.league,
            provider_team_id: model.provider_team_id,
            provider_team_name: model.provider_team_name,
            created_at: model.created_at,
        }
    }
}
