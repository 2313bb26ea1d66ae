use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::error::AppError;
use crate::service::reminder::ReminderService;
use crate::service::ticket::draft::DraftStore;

/// Starts the reminder dispatcher.
///
/// Runs every 10 seconds, delivering reminders whose time has passed. Expired ticket
/// button drafts are pruned by the same job.
///
/// # Arguments
/// - `db`: Database connection
/// - `discord_http`: Discord HTTP client used to deliver reminders
/// - `drafts`: Ticket button wizard drafts
pub async fn start_scheduler(
    db: DatabaseConnection,
    discord_http: Arc<Http>,
    drafts: DraftStore,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();
    let job_http = discord_http.clone();
    let job_drafts = drafts.clone();

    let job = Job::new_async("*/10 * * * * *", move |_uuid, _lock| {
        let db = job_db.clone();
        let http = job_http.clone();
        let drafts = job_drafts.clone();

        Box::pin(async move {
            let now = Utc::now();

            match ReminderService::new(&db).dispatch_due(&http, now).await {
                Ok(0) => {}
                Ok(delivered) => tracing::info!("Delivered {} reminders", delivered),
                Err(e) => tracing::error!("Error dispatching reminders: {}", e),
            }

            let pruned = drafts.prune(now);
            if pruned > 0 {
                tracing::debug!("Pruned {} expired ticket button drafts", pruned);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Reminder scheduler started");

    Ok(())
}
