//! Fingerprint cache entries short-circuiting re-matching of known streams.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stream_match_cache")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// 16 hex chars: truncated SHA-256 of `group_id:stream_id:stream_name`.
    #[sea_orm(unique)]
    pub fingerprint: String,
    #[sea_orm(indexed)]
    pub group_id: Uuid,
    pub stream_id: String,
    pub stream_name: String,
    pub event_id: String,
    pub league: String,
    /// Full normalized-event snapshot plus per-team derived payload.
    pub cached_event_data: Json,
    #[sea_orm(indexed)]
    pub last_seen_generation: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_epg_group::Entity",
        from = "Column::GroupId",
        to = "super::event_epg_group::Column::Id"
    )]
    EventEpgGroup,
}

impl Related<super::event_epg_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventEpgGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
