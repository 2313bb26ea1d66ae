//! Repeating channel message models.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Repeaters may not post more often than once a minute.
pub const MIN_REPEATER_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct Repeater {
    pub id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
    pub message: String,
    pub interval: Duration,
    /// Skip posting when the bot's previous repeat is still the newest message.
    pub no_redundant: bool,
    pub last_message_id: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Repeater {
    pub fn from_entity(entity: entity::repeater::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            channel_id: entity.channel_id as u64,
            message: entity.message,
            interval: Duration::from_secs(entity.interval_seconds.max(0) as u64),
            no_redundant: entity.no_redundant,
            last_message_id: entity.last_message_id.map(|id| id as u64),
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateRepeaterParam {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message: String,
    pub interval: Duration,
    pub no_redundant: bool,
}
