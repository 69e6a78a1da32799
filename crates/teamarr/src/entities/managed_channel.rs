//! A channel Teamarr has created on the host for a matched event.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "managed_channels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub event_epg_group_id: Uuid,
    pub host_channel_id: String,
    pub host_stream_id: String,
    pub channel_number: i32,
    pub event_id: String,
    pub league: String,
    pub channel_name: String,
    #[sea_orm(indexed)]
    pub scheduled_delete_at: Option<DateTimeUtc>,
    pub deleted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_epg_group::Entity",
        from = "Column::EventEpgGroupId",
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
