//! SeaORM-backed repository for the [`settings`](crate::entities::settings)
//! singleton row that holds the generation counter.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;

use crate::entities::{prelude::Settings as SettingsEntity, settings};
use crate::errors::{StorageError, StorageResult};
use crate::models::records::SettingsRecord;

const SETTINGS_ROW_ID: i32 = 1;

#[derive(Clone)]
pub struct SettingsRepository {
    connection: Arc<DatabaseConnection>,
}

impl SettingsRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn get(&self) -> StorageResult<SettingsRecord> {
        let model = SettingsEntity::find_by_id(SETTINGS_ROW_ID)
            .one(&*self.connection)
            .await?
            .ok_or_else(|| StorageError::RecordNotFound {
                table: "settings".to_string(),
                field: "id".to_string(),
                value: SETTINGS_ROW_ID.to_string(),
            })?;
        Ok(Self::model_to_domain(model))
    }

    /// Increments and returns the generation counter. Called exactly once
    /// at the start of each full generation run.
    pub async fn next_generation(&self) -> StorageResult<i64> {
        let model = SettingsEntity::find_by_id(SETTINGS_ROW_ID)
            .one(&*self.connection)
            .await?
            .ok_or_else(|| StorageError::RecordNotFound {
                table: "settings".to_string(),
                field: "id".to_string(),
                value: SETTINGS_ROW_ID.to_string(),
            })?;

        let next = model.generation_counter + 1;
        let mut active: settings::ActiveModel = model.into();
        active.generation_counter = Set(next);
        active.updated_at = Set(chrono::Utc::now());
        active.update(&*self.connection).await?;

        Ok(next)
    }

    fn model_to_domain(model: settings::Model) -> SettingsRecord {
        SettingsRecord {
            generation_counter: model.generation_counter,
            schema_version: model.schema_version,
            updated_at: model.updated_at,
        }
    }
}
