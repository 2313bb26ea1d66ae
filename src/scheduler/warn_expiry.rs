use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::service::moderation::warn::WarnService;

/// Starts the warning expiry sweep.
///
/// Runs at the top of every hour and applies each guild's configured expiry action
/// to warnings older than its `warn_expire_hours`.
pub async fn start_scheduler(db: DatabaseConnection) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();

    let job = Job::new_async("0 0 * * * *", move |_uuid, _lock| {
        let db = job_db.clone();

        Box::pin(async move {
            match WarnService::new(&db).expire_warnings(Utc::now()).await {
                Ok(0) => tracing::debug!("No warnings expired"),
                Ok(expired) => tracing::info!("Expired {} warnings", expired),
                Err(e) => tracing::error!("Error expiring warnings: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Warning expiry scheduler started");

    Ok(())
}
