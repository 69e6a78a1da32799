//! Legacy-schema detection and on-demand backup archiving for the
//! persisted store, backing the admin surface's `/migration/*` routes.
//!
//! The storage adapter's bootstrap calls [`MigrationService::detect_and_archive_legacy`]
//! before running migrations; everything else here is read-only status
//! reporting plus an operator-triggered backup, independent of that
//! startup check.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, Statement};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::database::{Database, DatabaseType};
use crate::errors::{AppError, AppResult, StorageError};

/// Tables present only in the schema this project's storage layer was
/// distilled from. Their presence means the configured database file
/// predates Teamarr's own schema and must be archived rather than
/// migrated in place.
const LEGACY_V1_TABLES: &[&str] = &["stream_sources", "epg_sources", "proxies"];

#[derive(Debug, Clone, Default)]
pub struct MigrationStatus {
    pub legacy_detected: bool,
    pub archived_path: Option<String>,
    pub archived_at: Option<DateTime<Utc>>,
}

pub struct MigrationService {
    database: Database,
    db_path: Option<PathBuf>,
    status: RwLock<MigrationStatus>,
}

impl MigrationService {
    pub fn new(database: Database, db_path: Option<PathBuf>) -> Self {
        Self {
            database,
            db_path,
            status: RwLock::new(MigrationStatus::default()),
        }
    }

    /// Derives the on-disk file path from a `sqlite:` connection URL, or
    /// `None` for `:memory:` and non-file backends.
    pub fn sqlite_path_from_url(url: &str) -> Option<PathBuf> {
        let stripped = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
        let path = stripped.split('?').next().unwrap_or(stripped);
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Some(PathBuf::from(path))
    }

    /// Checks for legacy V1 tables and, if found, moves the database file
    /// aside. Must be called before [`Database::migrate`] runs.
    pub async fn detect_and_archive_legacy(&self) -> AppResult<()> {
        if self.database.database_type() != DatabaseType::SQLite {
            return Ok(());
        }
        if !self.has_any_legacy_table().await? {
            return Ok(());
        }

        let Some(path) = self.db_path.as_ref() else {
            warn!("legacy schema detected but no on-disk database path is configured, skipping archive");
            return Ok(());
        };
        if !path.exists() {
            return Ok(());
        }

        let archived = Self::archive_file(path, "v1").await?;
        let mut status = self.status.write().await;
        status.legacy_detected = true;
        status.archived_path = Some(archived.display().to_string());
        status.archived_at = Some(Utc::now());
        info!("detected legacy schema, archived database to {}", archived.display());
        Ok(())
    }

    async fn has_any_legacy_table(&self) -> AppResult<bool> {
        let conn = self.database.connection();
        for table in LEGACY_V1_TABLES {
            let stmt = Statement::from_string(
                self.database.backend(),
                format!("SELECT name FROM sqlite_master WHERE type = 'table' AND name = '{table}'"),
            );
            let found = conn
                .query_one(stmt)
                .await
                .map_err(StorageError::from)?
                .is_some();
            if found {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn status(&self) -> MigrationStatus {
        self.status.read().await.clone()
    }

    /// Archives the current database file on demand (an operator-triggered
    /// backup), independent of legacy detection.
    pub async fn archive_now(&self) -> AppResult<PathBuf> {
        if self.database.database_type() != DatabaseType::SQLite {
            return Err(AppError::configuration("on-demand archiving is only supported for SQLite"));
        }
        let path = self
            .db_path
            .as_ref()
            .ok_or_else(|| AppError::configuration("no on-disk database path is configured"))?;

        let archived = Self::archive_file(path, "backup").await?;
        let mut status = self.status.write().await;
        status.archived_path = Some(archived.display().to_string());
        status.archived_at = Some(Utc::now());
        Ok(archived)
    }

    /// The most recently archived file, for download.
    pub async fn latest_backup(&self) -> AppResult<PathBuf> {
        let status = self.status.read().await;
        status
            .archived_path
            .as_ref()
            .map(PathBuf::from)
            .ok_or_else(|| AppError::not_found("backup", "none archived yet"))
    }

    async fn archive_file(path: &Path, tag: &str) -> AppResult<PathBuf> {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S");
        let archived = path.with_extension(format!("{tag}.{timestamp}.bak"));
        tokio::fs::copy(path, &archived)
            .await
            .map_err(|e| AppError::internal(format!("failed to archive database file: {e}")))?;
        Ok(archived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_sqlite_path_from_url() {
        assert_eq!(
            MigrationService::sqlite_path_from_url("sqlite://./data/teamarr.db?mode=rwc"),
            Some(PathBuf::from("./data/teamarr.db"))
        );
        assert_eq!(MigrationService::sqlite_path_from_url("sqlite::memory:"), None);
        assert_eq!(MigrationService::sqlite_path_from_url("postgres://localhost/db"), None);
    }
}
