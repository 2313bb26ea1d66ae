use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, CreateMessage, Http, UserId};

use crate::data::reminder::ReminderRepository;
use crate::error::AppError;
use crate::model::reminder::{CreateReminderParam, Reminder};
use crate::util::embed;
use crate::util::time::parse_duration;

pub const MAX_REMINDER_DELAY: Duration = Duration::days(365);

pub struct ReminderService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReminderService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Schedules a reminder `time` from `now`.
    ///
    /// # Arguments
    /// - `is_private` - Deliver by DM instead of in `channel_id`
    /// - `time` - Delay such as `1d2h30m`, at most one year
    ///
    /// # Returns
    /// - `Ok(Reminder)` - The stored reminder
    /// - `Err(AppError::TimeParseErr)` - `time` is malformed or too long
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: u64,
        channel_id: u64,
        guild_id: Option<u64>,
        is_private: bool,
        time: &str,
        message: String,
        now: DateTime<Utc>,
    ) -> Result<Reminder, AppError> {
        let delay = parse_duration(time, MAX_REMINDER_DELAY)?;

        let message = message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::BadRequest(
                "Tell me what to remind you about".to_string(),
            ));
        }

        let reminder = ReminderRepository::new(self.db)
            .create(CreateReminderParam {
                user_id,
                channel_id,
                guild_id,
                message,
                is_private,
                remind_at: now + delay,
            })
            .await?;

        tracing::debug!("Reminder {} set for {}", reminder.id, reminder.remind_at);

        Ok(reminder)
    }

    pub async fn list(&self, user_id: u64) -> Result<Vec<Reminder>, AppError> {
        Ok(ReminderRepository::new(self.db).get_by_user(user_id).await?)
    }

    /// Deletes a reminder by its 1-based position in the user's list.
    pub async fn delete_by_index(&self, user_id: u64, index: usize) -> Result<Reminder, AppError> {
        let repo = ReminderRepository::new(self.db);

        let reminders = repo.get_by_user(user_id).await?;
        let reminder = index
            .checked_sub(1)
            .and_then(|i| reminders.into_iter().nth(i))
            .ok_or_else(|| AppError::NotFound(format!("You have no reminder #{}", index)))?;

        repo.delete(reminder.id).await?;

        Ok(reminder)
    }

    /// Delivers every due reminder and deletes it.
    ///
    /// Reminders that fail to deliver are still deleted so that a closed DM or a
    /// removed channel does not retry forever.
    ///
    /// # Returns
    /// - `Ok(usize)` - Reminders delivered successfully
    pub async fn dispatch_due(&self, http: &Http, now: DateTime<Utc>) -> Result<usize, AppError> {
        let repo = ReminderRepository::new(self.db);
        let due = repo.get_due(now).await?;

        let mut delivered = 0;
        for reminder in due {
            match deliver(http, &reminder).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Failed to deliver reminder {}: {:?}", reminder.id, e);
                }
            }

            repo.delete(reminder.id).await?;
        }

        Ok(delivered)
    }
}

async fn deliver(http: &Http, reminder: &Reminder) -> Result<(), AppError> {
    let embed = embed::info_embed()
        .title("⏰ Reminder")
        .description(&reminder.message)
        .footer(serenity::all::CreateEmbedFooter::new(format!(
            "Set {}",
            reminder.created_at.format("%Y-%m-%d %H:%M UTC")
        )));

    if reminder.is_private {
        let dm = UserId::new(reminder.user_id).create_dm_channel(http).await?;
        dm.send_message(http, CreateMessage::new().embed(embed))
            .await?;
    } else {
        ChannelId::new(reminder.channel_id)
            .send_message(
                http,
                CreateMessage::new()
                    .content(format!("<@{}>", reminder.user_id))
                    .embed(embed),
            )
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;
    use test_utils::factory::reminder::create_reminder;

    /// Tests that reminders are scheduled relative to `now`.
    ///
    /// Expected: remind_at is 90 minutes after now, delivered in the channel
    #[tokio::test]
    async fn create_schedules_from_now() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Reminder)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        let reminder = ReminderService::new(db)
            .create(1, 2, Some(3), false, "1h30m", "stretch".to_string(), now)
            .await?;

        let expected = now + Duration::minutes(90);
        assert!((reminder.remind_at - expected).num_seconds().abs() < 1);
        assert!(!reminder.is_private);

        Ok(())
    }

    /// Tests that delays over a year are rejected.
    ///
    /// Expected: Err(TimeParseErr)
    #[tokio::test]
    async fn create_rejects_too_long_delay() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Reminder)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let result = ReminderService::new(db)
            .create(1, 2, None, true, "400d", "x".to_string(), Utc::now())
            .await;

        assert!(matches!(result, Err(AppError::TimeParseErr(_))));

        Ok(())
    }

    /// Tests deleting by list position.
    ///
    /// Expected: the second soonest reminder is removed
    #[tokio::test]
    async fn delete_by_index_uses_soonest_first_order() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Reminder)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        create_reminder(db, 1, now + Duration::hours(3)).await?;
        let second = create_reminder(db, 1, now + Duration::hours(2)).await?;
        create_reminder(db, 1, now + Duration::hours(1)).await?;

        let service = ReminderService::new(db);
        let deleted = service.delete_by_index(1, 2).await?;

        assert_eq!(deleted.id, second.id);
        assert_eq!(service.list(1).await?.len(), 2);
        assert!(matches!(
            service.delete_by_index(1, 0).await,
            Err(AppError::NotFound(_))
        ));

        Ok(())
    }
}
