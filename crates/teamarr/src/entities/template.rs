//! Title/description patterns and filler-window configuration, shared by
//! team configs and event EPG groups.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    /// `team` or `event`; informational discriminator on description options.
    pub template_type: String,
    pub title_pattern: String,
    pub subtitle_pattern: Option<String>,
    pub description_pattern: Option<String>,
    pub pregame_minutes: i32,
    pub default_duration_minutes: i32,
    /// `FillerConfig` (pregame/postgame periods, idle, no_game) as JSON.
    pub filler_config: Json,
    /// Ordered `Vec<DescriptionOption>` as JSON.
    pub description_options: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
