//! A host-side bundle of streams Teamarr matches events against and,
//! optionally, manages channels for.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "event_epg_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub host_group_id: String,
    pub name: String,
    /// Ordered `Vec<String>` of league codes, evaluated in order.
    pub leagues: Json,
    /// Whitelist gate: leagues allowed to actually create channels.
    pub include_leagues: Json,
    /// Lowercased substrings that route a stream to the exception path.
    pub exception_keywords: Json,
    pub refresh_interval_minutes: i32,
    /// `None` means matches are recorded but no channels are created.
    pub channel_start: Option<i32>,
    pub create_timing: String,
    pub delete_timing: String,
    /// IANA name (e.g. `"America/New_York"`) or fixed UTC offset (e.g.
    /// `"+01:00"`) create/delete lead times are evaluated against.
    pub timezone: String,
    #[sea_orm(indexed)]
    pub template_id: Uuid,
    pub epg_source_id: Option<String>,
    pub stream_count: i32,
    pub matched_count: i32,
    pub last_refresh: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::template::Entity",
        from = "Column::TemplateId",
        to = "super::template::Column::Id"
    )]
    Template,
    #[sea_orm(has_many = "super::managed_channel::Entity")]
    ManagedChannels,
    #[sea_orm(has_many = "super::stream_match_cache::Entity")]
    StreamMatchCache,
}

impl Related<super::template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::managed_channel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagedChannels.def()
    }
}

impl Related<super::stream_match_cache::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StreamMatchCache.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
