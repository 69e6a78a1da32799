//! A single scheduler tick or manually-triggered generation run.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "processing_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// `team_epg`, `event_epg`, or `lifecycle`.
    pub run_type: String,
    #[sea_orm(indexed)]
    pub group_id: Option<Uuid>,
    /// `running`, `completed`, or `failed`.
    pub status: String,
    pub started_at: DateTimeUtc,
    pub finished_at: Option<DateTimeUtc>,
    pub streams_fetched: i32,
    pub streams_matched: i32,
    pub streams_unmatched: i32,
    pub streams_cached: i32,
    pub programmes_total: i32,
    pub programmes_events: i32,
    pub programmes_pregame: i32,
    pub programmes_postgame: i32,
    pub programmes_idle: i32,
    pub error_message: Option<String>,
    /// Free-form counters not worth their own columns.
    pub metrics: Json,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::matched_stream::Entity")]
    MatchedStreams,
    #[sea_orm(has_many = "super::failed_match::Entity")]
    FailedMatches,
}

impl Related<super::matched_stream::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchedStreams.def()
    }
}

impl Related<super::failed_match::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FailedMatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
