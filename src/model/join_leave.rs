//! Member join/leave events and per-day statistics.

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct JoinLeaveEvent {
    pub id: i32,
    pub guild_id: u64,
    pub user_id: u64,
    pub is_join: bool,
    pub created_at: DateTime<Utc>,
}

impl JoinLeaveEvent {
    pub fn from_entity(entity: entity::join_leave_event::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            user_id: entity.user_id as u64,
            is_join: entity.is_join,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinLeaveStats {
    /// One entry per day, oldest first, including days without events.
    pub days: Vec<DayCount>,
    pub total: u64,
    /// Busiest day, `None` when there were no events at all.
    pub peak: Option<DayCount>,
}
