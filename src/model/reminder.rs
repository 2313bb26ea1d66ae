//! Reminder models.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: i32,
    pub user_id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub message: String,
    /// Delivered by DM instead of in the channel.
    pub is_private: bool,
    pub remind_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn from_entity(entity: entity::reminder::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id as u64,
            channel_id: entity.channel_id as u64,
            guild_id: entity.guild_id.map(|id| id as u64),
            message: entity.message,
            is_private: entity.is_private,
            remind_at: entity.remind_at,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateReminderParam {
    pub user_id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub message: String,
    pub is_private: bool,
    pub remind_at: DateTime<Utc>,
}
