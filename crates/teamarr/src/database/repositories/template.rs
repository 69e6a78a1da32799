//! SeaORM-backed repository for [`templates`](crate::entities::template).

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use super::traits::ConversionUtils;
use crate::entities::{prelude::Templates, template};
use crate::errors::{StorageError, StorageResult};
use crate::models::records::TemplateRecord;
use crate::models::{DescriptionOption, FillerConfig};

#[derive(Debug, Clone)]
pub struct TemplateCreateRequest {
    pub name: String,
    pub template_type: String,
    pub title_pattern: String,
    pub subtitle_pattern: Option<String>,
    pub description_pattern: Option<String>,
    pub pregame_minutes: i32,
    pub default_duration_minutes: i32,
    pub filler_config: FillerConfig,
    pub description_options: Vec<DescriptionOption>,
}

#[derive(Clone)]
pub struct TemplateRepository {
    connection: Arc<DatabaseConnection>,
}

impl TemplateRepository {
    pub fn new(connection: Arc<DatabaseConnection>) -> Self {
        Self { connection }
    }

    pub async fn create(&self, request: TemplateCreateRequest) -> StorageResult<TemplateRecord> {
        let now = chrono::Utc::now();
        let id = Uuid::new_v4();

        let active_model = template::ActiveModel {
            id: Set(id),
            name: Set(request.name),
            template_type: Set(request.template_type),
            title_pattern: Set(request.title_pattern),
            subtitle_pattern: Set(request.subtitle_pattern),
            description_pattern: Set(request.description_pattern),
            pregame_minutes: Set(request.pregame_minutes),
            default_duration_minutes: Set(request.default_duration_minutes),
            filler_config: Set(ConversionUtils::to_json(&request.filler_config)?),
            description_options: Set(ConversionUtils::to_json(&request.description_options)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&*self.connection).await?;
        self.model_to_domain(model)
    }

    pub async fn find_by_id(&self, id: &Uuid) -> StorageResult<Option<TemplateRecord>> {
        match Templates::find_by_id(*id).one(&*self.connection).await? {
            Some(model) => Ok(Some(self.model_to_domain(model)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> StorageResult<Option<TemplateRecord>> {
        match Templates::find()
            .filter(template::Column::Name.eq(name))
            .one(&*self.connection)
            .await?
        {
            Some(model) => Ok(Some(self.model_to_domain(model)?)),
            None => Ok(None),
        }
    }

    pub async fn find_all(&self) -> StorageResult<Vec<TemplateRecord>> {
        let models = Templates::find().all(&*self.connection).await?;
        models.into_iter().map(|m| self.model_to_domain(m)).collect()
    }

    pub async fn delete(&self, id: &Uuid) -> StorageResult<()> {
        Templates::delete_by_id(*id).exec(&*self.connection).await?;
        Ok(())
    }

    fn model_to_domain(&self, model: template::Model) -> StorageResult<TemplateRecord> {
        Ok(TemplateRecord {
            id: model.id,
            name: model.name,
            template_type: model.template_type,
            title_pattern: model.title_pattern,
            subtitle_pattern: model.subtitle_pattern,
            description_pattern: model.description_pattern,
            pregame_minutes: model.pregame_minutes,
            default_duration_minutes: model.default_duration_minutes,
            filler_config: ConversionUtils::from_json(model.filler_config)?,
            description_options: ConversionUtils::from_json(model.description_options)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_connection() -> Arc<DatabaseConnection> {
        use crate::database::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        let conn = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        Arc::new(conn)
    }

    #[tokio::test]
    async fn creates_and_finds_a_template() {
        let repo = TemplateRepository::new(test_connection().await);

        let created = repo
            .create(TemplateCreateRequest {
                name: "default-team".into(),
                template_type: "team".into(),
                title_pattern: "{team.name} vs {opponent.name}".into(),
                subtitle_pattern: None,
                description_pattern: None,
                pregame_minutes: 30,
                default_duration_minutes: 180,
                filler_config: FillerConfig::default(),
                description_options: vec![DescriptionOption {
                    priority: 100,
                    condition: None,
                    body: "{team.name} game coverage".into(),
                }],
            })
            .await
            .unwrap();

        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "default-team");
        assert_eq!(found.description_options.len(), 1);

        let by_name = repo.find_by_name("default-team").await.unwrap();
        assert!(by_name.is_some());
    }
}
