//! Seeds the singleton settings row the generation counter lives in.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

impl Migration {
    fn create_timestamp_value(
        manager: &SchemaManager<'_>,
        timestamp: &chrono::DateTime<chrono::Utc>,
    ) -> SimpleExpr {
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => {
                Expr::cust(format!("'{}'::timestamptz", timestamp.to_rfc3339()))
            }
            sea_orm::DatabaseBackend::MySql => {
                Expr::value(timestamp.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
            }
            _ => Expr::value(timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now();

        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Settings::Table)
                    .columns([
                        Settings::Id,
                        Settings::GenerationCounter,
                        Settings::SchemaVersion,
                        Settings::UpdatedAt,
                    ])
                    .values_panic([
                        1i32.into(),
                        0i64.into(),
                        1i32.into(),
                        Self::create_timestamp_value(manager, &now),
                    ])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Settings::Table)
                    .and_where(Expr::col(Settings::Id).eq(1))
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    GenerationCounter,
    SchemaVersion,
    UpdatedAt,
}
