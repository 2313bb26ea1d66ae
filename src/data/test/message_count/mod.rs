use crate::{
    data::message_count::MessageCountRepository,
    model::message_count::{CountKey, PendingCount},
};
use chrono::Utc;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod apply_increments;
mod leaderboard;
mod reset;

fn key(channel_id: u64, user_id: u64) -> CountKey {
    CountKey {
        guild_id: 1,
        channel_id,
        user_id,
    }
}

fn pending(count: u64) -> PendingCount {
    PendingCount {
        count,
        last_message_at: Utc::now(),
    }
}
