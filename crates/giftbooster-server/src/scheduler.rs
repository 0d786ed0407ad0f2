//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring maintenance jobs.

mod retention;

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_cron_scheduler::{JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: SqlitePool,
    config: Arc<giftbooster_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    retention::register_analytics_prune_job(&scheduler, pool, &config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}
