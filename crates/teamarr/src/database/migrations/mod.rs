//! SeaORM migrations for multi-database support.
//!
//! Database-agnostic migrations that work across SQLite, PostgreSQL, and
//! MySQL. Database-specific optimizations are applied where necessary.

use sea_orm_migration::prelude::*;

/// Derives a migration's name from its containing folder when the migration
/// is implemented as `folder_name/mod.rs`.
///
/// Avoids the `DeriveMigrationName` pitfall that yields the non-unique "mod"
/// for every folder-based migration. The folder name must follow the
/// convention `mYYYYMMDD_HHMMSS_description`.
#[macro_export]
macro_rules! folder_migration_name {
    () => {
        impl sea_orm_migration::MigrationName for Migration {
            fn name(&self) -> &str {
                static NAME: ::std::sync::OnceLock<String> = ::std::sync::OnceLock::new();
                NAME.get_or_init(|| {
                    let f = file!();
                    let trimmed = f
                        .trim_end_matches("mod.rs")
                        .trim_end_matches(|c| c == '/' || c == '\\');
                    trimmed
                        .rsplit(|c| c == '/' || c == '\\')
                        .next()
                        .unwrap()
                        .to_string()
                })
            }
        }
    };
}

mod m20260101_000000_initial_schema;
mod m20260101_000001_insert_default_settings;
mod m20260101_000002_add_event_epg_group_timezone;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000000_initial_schema::Migration),
            Box::new(m20260101_000001_insert_default_settings::Migration),
            Box::new(m20260101_000002_add_event_epg_group_timezone::Migration),
        ]
    }
}
