//! Analytics retention: periodically drops trigger events past their
//! retention window.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Register the analytics prune job on `config.analytics_prune_cron`.
pub(super) async fn register_analytics_prune_job(
    scheduler: &JobScheduler,
    pool: SqlitePool,
    config: &giftbooster_core::AppConfig,
) -> Result<(), JobSchedulerError> {
    let cron = config.analytics_prune_cron.clone();
    let retention_days = config.analytics_retention_days;
    let pool = Arc::new(pool);

    let job = Job::new_async(cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);

        Box::pin(async move {
            tracing::info!("scheduler: starting analytics prune run");
            run_analytics_prune(&pool, retention_days, Utc::now()).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %cron, retention_days, "scheduler: registered analytics prune job");
    Ok(())
}

fn retention_cutoff(now: DateTime<Utc>, retention_days: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(retention_days))
}

/// Delete events older than the retention window. Failures are logged only.
async fn run_analytics_prune(pool: &SqlitePool, retention_days: u32, now: DateTime<Utc>) {
    let cutoff = retention_cutoff(now, retention_days);
    match giftbooster_db::prune_analytics_before(pool, cutoff).await {
        Ok(removed) => {
            tracing::info!(removed, cutoff = %cutoff, "scheduler: analytics prune run complete");
        }
        Err(e) => {
            tracing::error!(error = %e, "scheduler: analytics prune failed");
        }
    }
}
