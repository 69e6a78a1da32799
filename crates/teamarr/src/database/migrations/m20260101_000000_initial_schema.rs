//! Initial schema: templates, team/event configuration, the managed-channel
//! inventory, the stream-match cache, and the run ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_templates_table(manager).await?;
        self.create_team_configs_table(manager).await?;
        self.create_event_epg_groups_table(manager).await?;
        self.create_managed_channels_table(manager).await?;
        self.create_stream_match_cache_table(manager).await?;
        self.create_processing_runs_table(manager).await?;
        self.create_matched_streams_table(manager).await?;
        self.create_failed_matches_table(manager).await?;
        self.create_team_aliases_table(manager).await?;
        self.create_settings_table(manager).await?;

        self.create_indexes(manager).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Settings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamAliases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FailedMatches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MatchedStreams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcessingRuns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StreamMatchCache::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManagedChannels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventEpgGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeamConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Templates::Table).to_owned())
            .await?;

        Ok(())
    }
}

impl Migration {
    fn create_id_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.uuid().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_uuid_fk_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.uuid().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_timestamp_column(&self, manager: &SchemaManager, column: impl IntoIden) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone().not_null(),
            _ => col.string().not_null(),
        };
        col
    }

    fn create_nullable_timestamp_column(
        &self,
        manager: &SchemaManager,
        column: impl IntoIden,
    ) -> ColumnDef {
        let mut col = ColumnDef::new(column);
        match manager.get_database_backend() {
            sea_orm::DatabaseBackend::Postgres => col.timestamp_with_time_zone(),
            _ => col.string(),
        };
        col
    }

    async fn create_templates_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Templates::Table)
                    .if_not_exists()
                    .col(self.create_id_column(manager, Templates::Id).primary_key())
                    .col(ColumnDef::new(Templates::Name).string().not_null())
                    .col(ColumnDef::new(Templates::TemplateType).string().not_null())
                    .col(ColumnDef::new(Templates::TitlePattern).string().not_null())
                    .col(ColumnDef::new(Templates::SubtitlePattern).string())
                    .col(ColumnDef::new(Templates::DescriptionPattern).string())
                    .col(ColumnDef::new(Templates::PregameMinutes).integer().not_null())
                    .col(
                        ColumnDef::new(Templates::DefaultDurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Templates::FillerConfig).json().not_null())
                    .col(ColumnDef::new(Templates::DescriptionOptions).json().not_null())
                    .col(self.create_timestamp_column(manager, Templates::CreatedAt))
                    .col(self.create_timestamp_column(manager, Templates::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_team_configs_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamConfigs::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, TeamConfigs::Id)
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamConfigs::Provider).string().not_null())
                    .col(
                        ColumnDef::new(TeamConfigs::ProviderTeamId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TeamConfigs::League).string().not_null())
                    .col(ColumnDef::new(TeamConfigs::ChannelId).string().not_null())
                    .col(ColumnDef::new(TeamConfigs::DisplayName).string())
                    .col(self.create_uuid_fk_column(manager, TeamConfigs::TemplateId))
                    .col(self.create_timestamp_column(manager, TeamConfigs::CreatedAt))
                    .col(self.create_timestamp_column(manager, TeamConfigs::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_configs_template_id")
                            .from(TeamConfigs::Table, TeamConfigs::TemplateId)
                            .to(Templates::Table, Templates::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_event_epg_groups_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventEpgGroups::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, EventEpgGroups::Id)
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EventEpgGroups::HostGroupId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventEpgGroups::Name).string().not_null())
                    .col(ColumnDef::new(EventEpgGroups::Leagues).json().not_null())
                    .col(
                        ColumnDef::new(EventEpgGroups::IncludeLeagues)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventEpgGroups::ExceptionKeywords)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventEpgGroups::RefreshIntervalMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EventEpgGroups::ChannelStart).integer())
                    .col(
                        ColumnDef::new(EventEpgGroups::CreateTiming)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventEpgGroups::DeleteTiming)
                            .string()
                            .not_null(),
                    )
                    .col(self.create_uuid_fk_column(manager, EventEpgGroups::TemplateId))
                    .col(ColumnDef::new(EventEpgGroups::EpgSourceId).string())
                    .col(
                        ColumnDef::new(EventEpgGroups::StreamCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EventEpgGroups::MatchedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(self.create_nullable_timestamp_column(manager, EventEpgGroups::LastRefresh))
                    .col(self.create_timestamp_column(manager, EventEpgGroups::CreatedAt))
                    .col(self.create_timestamp_column(manager, EventEpgGroups::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_epg_groups_template_id")
                            .from(EventEpgGroups::Table, EventEpgGroups::TemplateId)
                            .to(Templates::Table, Templates::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_managed_channels_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ManagedChannels::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, ManagedChannels::Id)
                            .primary_key(),
                    )
                    .col(self.create_uuid_fk_column(manager, ManagedChannels::EventEpgGroupId))
                    .col(
                        ColumnDef::new(ManagedChannels::HostChannelId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManagedChannels::HostStreamId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ManagedChannels::ChannelNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ManagedChannels::EventId).string().not_null())
                    .col(ColumnDef::new(ManagedChannels::League).string().not_null())
                    .col(
                        ColumnDef::new(ManagedChannels::ChannelName)
                            .string()
                            .not_null(),
                    )
                    .col(self.create_nullable_timestamp_column(
                        manager,
                        ManagedChannels::ScheduledDeleteAt,
                    ))
                    .col(self.create_nullable_timestamp_column(manager, ManagedChannels::DeletedAt))
                    .col(self.create_timestamp_column(manager, ManagedChannels::CreatedAt))
                    .col(self.create_timestamp_column(manager, ManagedChannels::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_managed_channels_event_epg_group_id")
                            .from(ManagedChannels::Table, ManagedChannels::EventEpgGroupId)
                            .to(EventEpgGroups::Table, EventEpgGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_stream_match_cache_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StreamMatchCache::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, StreamMatchCache::Id)
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StreamMatchCache::Fingerprint)
                            .string()
                            .not_null(),
                    )
                    .col(self.create_uuid_fk_column(manager, StreamMatchCache::GroupId))
                    .col(ColumnDef::new(StreamMatchCache::StreamId).string().not_null())
                    .col(
                        ColumnDef::new(StreamMatchCache::StreamName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StreamMatchCache::EventId).string().not_null())
                    .col(ColumnDef::new(StreamMatchCache::League).string().not_null())
                    .col(
                        ColumnDef::new(StreamMatchCache::CachedEventData)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StreamMatchCache::LastSeenGeneration)
                            .big_integer()
                            .not_null(),
                    )
                    .col(self.create_timestamp_column(manager, StreamMatchCache::CreatedAt))
                    .col(self.create_timestamp_column(manager, StreamMatchCache::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stream_match_cache_group_id")
                            .from(StreamMatchCache::Table, StreamMatchCache::GroupId)
                            .to(EventEpgGroups::Table, EventEpgGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_processing_runs_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProcessingRuns::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, ProcessingRuns::Id)
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProcessingRuns::RunType).string().not_null())
                    .col({
                        let mut col = ColumnDef::new(ProcessingRuns::GroupId);
                        match manager.get_database_backend() {
                            sea_orm::DatabaseBackend::Postgres => col.uuid(),
                            _ => col.string(),
                        };
                        col
                    })
                    .col(ColumnDef::new(ProcessingRuns::Status).string().not_null())
                    .col(self.create_timestamp_column(manager, ProcessingRuns::StartedAt))
                    .col(self.create_nullable_timestamp_column(manager, ProcessingRuns::FinishedAt))
                    .col(
                        ColumnDef::new(ProcessingRuns::StreamsFetched)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::StreamsMatched)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::StreamsUnmatched)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::StreamsCached)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::ProgrammesTotal)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::ProgrammesEvents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::ProgrammesPregame)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::ProgrammesPostgame)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProcessingRuns::ProgrammesIdle)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ProcessingRuns::ErrorMessage).string())
                    .col(ColumnDef::new(ProcessingRuns::Metrics).json().not_null())
                    .col(self.create_timestamp_column(manager, ProcessingRuns::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_matched_streams_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MatchedStreams::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, MatchedStreams::Id)
                            .primary_key(),
                    )
                    .col(self.create_uuid_fk_column(manager, MatchedStreams::RunId))
                    .col(self.create_uuid_fk_column(manager, MatchedStreams::GroupId))
                    .col(ColumnDef::new(MatchedStreams::StreamId).string().not_null())
                    .col(
                        ColumnDef::new(MatchedStreams::StreamName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MatchedStreams::EventId).string().not_null())
                    .col(ColumnDef::new(MatchedStreams::League).string().not_null())
                    .col(
                        ColumnDef::new(MatchedStreams::Included)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(MatchedStreams::Reason).string())
                    .col(self.create_timestamp_column(manager, MatchedStreams::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matched_streams_run_id")
                            .from(MatchedStreams::Table, MatchedStreams::RunId)
                            .to(ProcessingRuns::Table, ProcessingRuns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matched_streams_group_id")
                            .from(MatchedStreams::Table, MatchedStreams::GroupId)
                            .to(EventEpgGroups::Table, EventEpgGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_failed_matches_table(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FailedMatches::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, FailedMatches::Id)
                            .primary_key(),
                    )
                    .col(self.create_uuid_fk_column(manager, FailedMatches::RunId))
                    .col(self.create_uuid_fk_column(manager, FailedMatches::GroupId))
                    .col(ColumnDef::new(FailedMatches::StreamId).string().not_null())
                    .col(
                        ColumnDef::new(FailedMatches::StreamName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FailedMatches::Reason).string().not_null())
                    .col(self.create_timestamp_column(manager, FailedMatches::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_failed_matches_run_id")
                            .from(FailedMatches::Table, FailedMatches::RunId)
                            .to(ProcessingRuns::Table, ProcessingRuns::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_failed_matches_group_id")
                            .from(FailedMatches::Table, FailedMatches::GroupId)
                            .to(EventEpgGroups::Table, EventEpgGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn create_team_aliases_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TeamAliases::Table)
                    .if_not_exists()
                    .col(
                        self.create_id_column(manager, TeamAliases::Id)
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TeamAliases::Alias).string().not_null())
                    .col(ColumnDef::new(TeamAliases::League).string().not_null())
                    .col(
                        ColumnDef::new(TeamAliases::ProviderTeamId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TeamAliases::ProviderTeamName)
                            .string()
                            .not_null(),
                    )
                    .col(self.create_timestamp_column(manager, TeamAliases::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_settings_table(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Settings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Settings::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Settings::GenerationCounter)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Settings::SchemaVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(self.create_timestamp_column(manager, Settings::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn create_indexes(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_team_configs_template_id")
                    .table(TeamConfigs::Table)
                    .col(TeamConfigs::TemplateId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_event_epg_groups_template_id")
                    .table(EventEpgGroups::Table)
                    .col(EventEpgGroups::TemplateId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_managed_channels_event_epg_group_id")
                    .table(ManagedChannels::Table)
                    .col(ManagedChannels::EventEpgGroupId)
                    .to_owned(),
            )
            .await?;
        // Not a unique index: uniqueness of (group, channel_number) only holds
        // among rows with deleted_at IS NULL, which a portable index across
        // SQLite/Postgres/MySQL can't express. Enforced in the lifecycle
        // manager's allocation path instead.
        manager
            .create_index(
                Index::create()
                    .name("idx_managed_channels_numbering")
                    .table(ManagedChannels::Table)
                    .col(ManagedChannels::EventEpgGroupId)
                    .col(ManagedChannels::ChannelNumber)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_managed_channels_event_id")
                    .table(ManagedChannels::Table)
                    .col(ManagedChannels::EventEpgGroupId)
                    .col(ManagedChannels::EventId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_managed_channels_scheduled_delete_at")
                    .table(ManagedChannels::Table)
                    .col(ManagedChannels::ScheduledDeleteAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stream_match_cache_fingerprint")
                    .table(StreamMatchCache::Table)
                    .col(StreamMatchCache::Fingerprint)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stream_match_cache_group_id")
                    .table(StreamMatchCache::Table)
                    .col(StreamMatchCache::GroupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_stream_match_cache_last_seen_generation")
                    .table(StreamMatchCache::Table)
                    .col(StreamMatchCache::LastSeenGeneration)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_processing_runs_group_id")
                    .table(ProcessingRuns::Table)
                    .col(ProcessingRuns::GroupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_matched_streams_run_id")
                    .table(MatchedStreams::Table)
                    .col(MatchedStreams::RunId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_matched_streams_group_id")
                    .table(MatchedStreams::Table)
                    .col(MatchedStreams::GroupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_failed_matches_run_id")
                    .table(FailedMatches::Table)
                    .col(FailedMatches::RunId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_failed_matches_group_id")
                    .table(FailedMatches::Table)
                    .col(FailedMatches::GroupId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_team_aliases_alias_league")
                    .table(TeamAliases::Table)
                    .col(TeamAliases::Alias)
                    .col(TeamAliases::League)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Templates {
    Table,
    Id,
    Name,
    TemplateType,
    TitlePattern,
    SubtitlePattern,
    DescriptionPattern,
    PregameMinutes,
    DefaultDurationMinutes,
    FillerConfig,
    DescriptionOptions,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamConfigs {
    Table,
    Id,
    Provider,
    ProviderTeamId,
    League,
    ChannelId,
    DisplayName,
    TemplateId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventEpgGroups {
    Table,
    Id,
    HostGroupId,
    Name,
    Leagues,
    IncludeLeagues,
    ExceptionKeywords,
    RefreshIntervalMinutes,
    ChannelStart,
    CreateTiming,
    DeleteTiming,
    TemplateId,
    EpgSourceId,
    StreamCount,
    MatchedCount,
    LastRefresh,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ManagedChannels {
    Table,
    Id,
    EventEpgGroupId,
    HostChannelId,
    HostStreamId,
    ChannelNumber,
    EventId,
    League,
    ChannelName,
    ScheduledDeleteAt,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StreamMatchCache {
    Table,
    Id,
    Fingerprint,
    GroupId,
    StreamId,
    StreamName,
    EventId,
    League,
    CachedEventData,
    LastSeenGeneration,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProcessingRuns {
    Table,
    Id,
    RunType,
    GroupId,
    Status,
    StartedAt,
    FinishedAt,
    StreamsFetched,
    StreamsMatched,
    StreamsUnmatched,
    StreamsCached,
    ProgrammesTotal,
    ProgrammesEvents,
    ProgrammesPregame,
    ProgrammesPostgame,
    ProgrammesIdle,
    ErrorMessage,
    Metrics,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MatchedStreams {
    Table,
    Id,
    RunId,
    GroupId,
    StreamId,
    StreamName,
    EventId,
    League,
    Included,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FailedMatches {
    Table,
    Id,
    RunId,
    GroupId,
    StreamId,
    StreamName,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamAliases {
    Table,
    Id,
    Alias,
    League,
    ProviderTeamId,
    ProviderTeamName,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Settings {
    Table,
    Id,
    GenerationCounter,
    SchemaVersion,
    UpdatedAt,
}
