//! Repeater factory for creating test repeater entities.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::{next_id, next_snowflake};

/// Creates an hourly repeater in a fresh channel of the given guild.
pub async fn create_repeater(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<entity::repeater::Model, DbErr> {
    entity::repeater::ActiveModel {
        id: ActiveValue::NotSet,
        guild_id: ActiveValue::Set(guild_id),
        channel_id: ActiveValue::Set(next_snowflake()),
        message: ActiveValue::Set(format!("Repeated message {}", next_id())),
        interval_seconds: ActiveValue::Set(3600),
        no_redundant: ActiveValue::Set(false),
        last_message_id: ActiveValue::Set(None),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}
