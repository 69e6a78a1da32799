//! Dashboard aggregates and historical rollups read from the processing
//! run ledger. The ledger writes themselves stay in
//! [`ProcessingRunRepository`]; this is purely read-side shaping for the
//! admin surface.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::database::repositories::processing_run::ProcessingRunRepository;
use crate::errors::AppResult;
use crate::models::records::ProcessingRunRecord;

pub struct StatsService {
    runs: ProcessingRunRepository,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardSummary {
    pub total_runs: usize,
    pub successful_runs: usize,
    pub failed_runs: usize,
    pub streams_matched: i64,
    pub streams_unmatched: i64,
    pub programmes_total: i64,
}

/// One day's totals, for the dashboard's history chart.
#[derive(Debug, Clone)]
pub struct DailyRollup {
    pub date: chrono::NaiveDate,
    pub runs: usize,
    pub streams_matched: i64,
    pub streams_unmatched: i64,
}

impl StatsService {
    pub fn new(runs: ProcessingRunRepository) -> Self {
        Self { runs }
    }

    pub async fn recent_runs(
        &self,
        limit: u64,
        run_type: Option<&str>,
        group_id: Option<Uuid>,
        status: Option<&str>,
    ) -> AppResult<Vec<ProcessingRunRecord>> {
        Ok(self.runs.find_recent(limit, run_type, group_id, status).await?)
    }

    pub async fn run_by_id(&self, id: &Uuid) -> AppResult<Option<ProcessingRunRecord>> {
        Ok(self.runs.find_by_id(id).await?)
    }

    pub async fn dashboard_summary(&self, since: DateTime<Utc>) -> AppResult<DashboardSummary> {
        let records = self.runs.find_since(since).await?;
        let mut summary = DashboardSummary::default();

        for run in &records {
            summary.total_runs += 1;
            match run.status.as_str() {
                "completed" => summary.successful_runs += 1,
                "failed" => summary.failed_runs += 1,
                _ => {}
            }
            summary.streams_matched += run.streams_matched as i64;
            summary.streams_unmatched += run.streams_unmatched as i64;
            summary.programmes_total += run.programmes_total as i64;
        }

        Ok(summary)
    }

    /// Daily totals over the last `days` days, oldest first.
    pub async fn history(&self, days: i64) -> AppResult<Vec<DailyRollup>> {
        let since = Utc::now() - Duration::days(days);
        let records = self.runs.find_since(since).await?;

        let mut by_day: std::collections::BTreeMap<chrono::NaiveDate, DailyRollup> =
            std::collections::BTreeMap::new();
        for run in records {
            let date = run.started_at.date_naive();
            let entry = by_day.entry(date).or_insert_with(|| DailyRollup {
                date,
                runs: 0,
                streams_matched: 0,
                streams_unmatched: 0,
            });
            entry.runs += 1;
            entry.streams_matched += run.streams_matched as i64;
            entry.streams_unmatched += run.streams_unmatched as i64;
        }

        Ok(by_day.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::migrations::Migrator;
    use crate::database::repositories::processing_run::ProcessingRunStart;
    use sea_orm_migration::MigratorTrait;

    async fn connection() -> std::sync::Arc<sea_orm::DatabaseConnection> {
        let conn = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        std::sync::Arc::new(conn)
    }

    #[tokio::test]
    async fn dashboard_summary_counts_by_status() {
        let conn = connection().await;
        let repo = ProcessingRunRepository::new(conn);
        let service = StatsService::new(repo.clone());

        let run = repo
            .start(ProcessingRunStart {
                run_type: "event".into(),
                group_id: None,
            })
            .await
            .unwrap();
        repo.complete(&run.id, Default::default(), Utc::now()).await.unwrap();

        let summary = service.dashboard_summary(Utc::now() - Duration::days(1)).await.unwrap();
        assert_eq!(summary.total_runs, 1);
        assert_eq!(summary.successful_runs, 1);
    }
}
