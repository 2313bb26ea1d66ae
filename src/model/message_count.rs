//! Message count aggregation keys and leaderboard rows.

use chrono::{DateTime, Utc};

/// Identifies one counter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountKey {
    pub guild_id: u64,
    pub channel_id: u64,
    pub user_id: u64,
}

/// Increments merged for one key while waiting to be flushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCount {
    pub count: u64,
    pub last_message_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub count: u64,
}
