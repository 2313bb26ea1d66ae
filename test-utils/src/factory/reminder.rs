//! Reminder factory for creating test reminder entities.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_id;

/// Creates a channel reminder for the user due at `remind_at`.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - Discord user the reminder belongs to
/// - `remind_at` - Time the reminder becomes due
///
/// # Returns
/// - `Ok(entity::reminder::Model)` - Created reminder entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_reminder(
    db: &DatabaseConnection,
    user_id: i64,
    remind_at: DateTime<Utc>,
) -> Result<entity::reminder::Model, DbErr> {
    entity::reminder::ActiveModel {
        id: ActiveValue::NotSet,
        user_id: ActiveValue::Set(user_id),
        channel_id: ActiveValue::Set(555555555),
        guild_id: ActiveValue::Set(Some(987654321)),
        message: ActiveValue::Set(format!("Reminder {}", next_id())),
        is_private: ActiveValue::Set(false),
        remind_at: ActiveValue::Set(remind_at),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
