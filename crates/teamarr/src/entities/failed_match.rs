//! A stream that could not be matched to any event during a run.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "failed_matches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub run_id: Uuid,
    #[sea_orm(indexed)]
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    /// e.g. `no_candidates`, `below_threshold`, `allocation_failed`.
    pub reason: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::processing_run::Entity",
        from = "Column::RunId",
        to = "super::processing_run::Column::Id"
    )]
    ProcessingRun,
    #[sea_orm(
        belongs_to = "super::event_epg_group::Entity",
        from = "Column::GroupId",
        to = "super::event_epg_group::Column::Id"
    )]
    EventEpgGroup,
}

impl Related<super::processing_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingRun.def()
    }
}

impl Related<super::event_epg_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventEpgGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
