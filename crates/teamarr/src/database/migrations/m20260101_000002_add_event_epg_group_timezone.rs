//! Adds the per-group timezone used to evaluate create/delete lead times
//! against local midnight instead of UTC.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EventEpgGroups::Table)
                    .add_column(
                        ColumnDef::new(EventEpgGroups::Timezone)
                            .string()
                            .not_null()
                            .default("UTC"),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(EventEpgGroups::Table)
                    .drop_column(EventEpgGroups::Timezone)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum EventEpgGroups {
    Table,
    Timezone,
}
