//! Singleton row holding process-wide generation state.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    /// Always `1`; enforced by application code, never by a DB check.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Monotonic counter bumped each time dynamic event fields are refreshed.
    pub generation_counter: i64,
    pub schema_version: i32,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
