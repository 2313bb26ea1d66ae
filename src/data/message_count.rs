//! Message count data repository.
//!
//! Counts are stored per `(guild, channel, user)`. Increments arrive in batches from the
//! background aggregator and are applied in a single transaction; resets read and delete
//! inside a transaction as well so a concurrent flush cannot slip in between.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::model::message_count::{CountKey, LeaderboardEntry, PendingCount};

pub struct MessageCountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MessageCountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a batch of merged increments.
    ///
    /// # Arguments
    /// - `increments` - One entry per counter key
    ///
    /// # Returns
    /// - `Ok(())` - All increments were applied
    /// - `Err(DbErr)` - Database error, nothing from the batch was applied
    pub async fn apply_increments(&self, increments: &[(CountKey, PendingCount)]) -> Result<(), DbErr> {
        if increments.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;

        for (key, pending) in increments {
            let existing = entity::prelude::MessageCount::find()
                .filter(entity::message_count::Column::GuildId.eq(key.guild_id as i64))
                .filter(entity::message_count::Column::ChannelId.eq(key.channel_id as i64))
                .filter(entity::message_count::Column::UserId.eq(key.user_id as i64))
                .one(&txn)
                .await?;

            match existing {
                Some(row) => {
                    let count = row.count + pending.count as i64;
                    let last_message_at = row.last_message_at.max(pending.last_message_at);
                    let mut active: entity::message_count::ActiveModel = row.into();
                    active.count = ActiveValue::Set(count);
                    active.last_message_at = ActiveValue::Set(last_message_at);
                    active.update(&txn).await?;
                }
                None => {
                    entity::message_count::ActiveModel {
                        id: ActiveValue::NotSet,
                        guild_id: ActiveValue::Set(key.guild_id as i64),
                        channel_id: ActiveValue::Set(key.channel_id as i64),
                        user_id: ActiveValue::Set(key.user_id as i64),
                        count: ActiveValue::Set(pending.count as i64),
                        last_message_at: ActiveValue::Set(pending.last_message_at),
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        txn.commit().await
    }

    /// Total messages of a member in a guild, optionally limited to one channel.
    pub async fn get_count(
        &self,
        guild_id: u64,
        user_id: u64,
        channel_id: Option<u64>,
    ) -> Result<u64, DbErr> {
        sum_counts(self.db, guild_id, Some(user_id), channel_id).await
    }

    /// Members with the most messages in a guild across all channels.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `limit` - Maximum number of entries
    ///
    /// # Returns
    /// - `Ok(Vec<LeaderboardEntry>)` - Entries ordered by count, highest first
    /// - `Err(DbErr)` - Database error during query
    pub async fn leaderboard(&self, guild_id: u64, limit: u64) -> Result<Vec<LeaderboardEntry>, DbErr> {
        let rows: Vec<(i64, i64)> = entity::prelude::MessageCount::find()
            .select_only()
            .column(entity::message_count::Column::UserId)
            .column_as(entity::message_count::Column::Count.sum(), "total")
            .filter(entity::message_count::Column::GuildId.eq(guild_id as i64))
            .group_by(entity::message_count::Column::UserId)
            .order_by_desc(entity::message_count::Column::Count.sum())
            .order_by_asc(entity::message_count::Column::UserId)
            .limit(limit)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, count)| LeaderboardEntry {
                user_id: user_id as u64,
                count: count.max(0) as u64,
            })
            .collect())
    }

    /// Deletes counts for a guild, or for one member of it, inside a transaction.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of messages that were counted before the reset
    /// - `Err(DbErr)` - Database error, the transaction is rolled back
    pub async fn reset(&self, guild_id: u64, user_id: Option<u64>) -> Result<u64, DbErr> {
        let txn = self.db.begin().await?;

        let removed = sum_counts(&txn, guild_id, user_id, None).await?;

        let mut delete = entity::prelude::MessageCount::delete_many()
            .filter(entity::message_count::Column::GuildId.eq(guild_id as i64));
        if let Some(user_id) = user_id {
            delete = delete.filter(entity::message_count::Column::UserId.eq(user_id as i64));
        }
        delete.exec(&txn).await?;

        txn.commit().await?;

        Ok(removed)
    }
}

async fn sum_counts<C: ConnectionTrait>(
    db: &C,
    guild_id: u64,
    user_id: Option<u64>,
    channel_id: Option<u64>,
) -> Result<u64, DbErr> {
    let mut query = entity::prelude::MessageCount::find()
        .select_only()
        .column_as(entity::message_count::Column::Count.sum(), "total")
        .filter(entity::message_count::Column::GuildId.eq(guild_id as i64));

    if let Some(user_id) = user_id {
        query = query.filter(entity::message_count::Column::UserId.eq(user_id as i64));
    }
    if let Some(channel_id) = channel_id {
        query = query.filter(entity::message_count::Column::ChannelId.eq(channel_id as i64));
    }

    let total: Option<Option<i64>> = query.into_tuple().one(db).await?;

    Ok(total.flatten().unwrap_or(0).max(0) as u64)
}
