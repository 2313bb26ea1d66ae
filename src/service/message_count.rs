//! Batched message counting.
//!
//! The message handler only pushes increments into a bounded channel. A background
//! worker merges them per `(guild, channel, user)` and writes them in one transaction
//! when `batch_size` increments are buffered or the flush interval elapses. Failed
//! writes are retried with exponential backoff; a batch that still fails is merged
//! back into the pending set for the next flush.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_retry2::strategy::{jitter, ExponentialBackoff};
use tokio_retry2::{Retry, RetryError};

use crate::data::guild_config::GuildConfigRepository;
use crate::data::message_count::MessageCountRepository;
use crate::error::AppError;
use crate::model::message_count::{CountKey, LeaderboardEntry, PendingCount};

const FLUSH_RETRIES: usize = 3;

enum CountCommand {
    Increment { key: CountKey, at: DateTime<Utc> },
    Flush(oneshot::Sender<()>),
}

/// Increments waiting to be written, merged per key.
#[derive(Debug, Default)]
pub struct PendingCounts {
    counts: HashMap<CountKey, PendingCount>,
    buffered: usize,
}

impl PendingCounts {
    pub fn add(&mut self, key: CountKey, at: DateTime<Utc>) {
        self.counts
            .entry(key)
            .and_modify(|pending| {
                pending.count += 1;
                pending.last_message_at = pending.last_message_at.max(at);
            })
            .or_insert(PendingCount {
                count: 1,
                last_message_at: at,
            });
        self.buffered += 1;
    }

    /// Number of increments received since the last flush, before merging.
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn take(&mut self) -> Vec<(CountKey, PendingCount)> {
        self.buffered = 0;
        self.counts.drain().collect()
    }

    /// Returns a batch that failed to write so it is retried with the next flush.
    pub fn merge_back(&mut self, batch: Vec<(CountKey, PendingCount)>) {
        for (key, failed) in batch {
            self.buffered += failed.count as usize;
            self.counts
                .entry(key)
                .and_modify(|pending| {
                    pending.count += failed.count;
                    pending.last_message_at = pending.last_message_at.max(failed.last_message_at);
                })
                .or_insert(failed);
        }
    }
}

/// Cheap, cloneable handle to the counting worker.
#[derive(Clone)]
pub struct MessageCountHandle {
    sender: mpsc::Sender<CountCommand>,
    enabled: Arc<DashMap<u64, bool>>,
}

impl MessageCountHandle {
    /// Queues one message for counting without waiting.
    ///
    /// Drops the increment with a warning when the channel is full.
    pub fn record(&self, guild_id: u64, channel_id: u64, user_id: u64, at: DateTime<Utc>) {
        let key = CountKey {
            guild_id,
            channel_id,
            user_id,
        };

        match self.sender.try_send(CountCommand::Increment { key, at }) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Message count channel is full, dropping increment");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::error!("Message count worker has stopped");
            }
        }
    }

    /// Writes all pending increments and waits for the write to finish.
    pub async fn flush_pending(&self) {
        let (reply, done) = oneshot::channel();

        if self.sender.send(CountCommand::Flush(reply)).await.is_err() {
            tracing::error!("Message count worker has stopped");
            return;
        }

        let _ = done.await;
    }
}

/// Starts the counting worker.
///
/// # Arguments
/// - `db` - Database connection used for flushes
/// - `batch_size` - Buffered increments that trigger an early flush
/// - `flush_interval` - Maximum time increments stay buffered
///
/// # Returns
/// - Handle for recording increments and the worker task
pub fn start_worker(
    db: DatabaseConnection,
    batch_size: usize,
    flush_interval: Duration,
) -> (MessageCountHandle, JoinHandle<()>) {
    let batch_size = batch_size.max(1);
    let (sender, receiver) = mpsc::channel(batch_size * 10);

    let task = tokio::spawn(run_worker(db, receiver, batch_size, flush_interval));

    tracing::info!(
        "Message count worker started (batch size {}, flush every {}s)",
        batch_size,
        flush_interval.as_secs()
    );

    (
        MessageCountHandle {
            sender,
            enabled: Arc::new(DashMap::new()),
        },
        task,
    )
}

async fn run_worker(
    db: DatabaseConnection,
    mut receiver: mpsc::Receiver<CountCommand>,
    batch_size: usize,
    flush_interval: Duration,
) {
    let mut pending = PendingCounts::default();
    let mut ticker = tokio::time::interval(flush_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            command = receiver.recv() => match command {
                Some(CountCommand::Increment { key, at }) => {
                    pending.add(key, at);
                    if pending.buffered() >= batch_size {
                        flush(&db, &mut pending).await;
                    }
                }
                Some(CountCommand::Flush(reply)) => {
                    flush(&db, &mut pending).await;
                    let _ = reply.send(());
                }
                None => {
                    flush(&db, &mut pending).await;
                    tracing::info!("Message count worker stopped");
                    break;
                }
            },
            _ = ticker.tick() => flush(&db, &mut pending).await,
        }
    }
}

async fn flush(db: &DatabaseConnection, pending: &mut PendingCounts) {
    if pending.is_empty() {
        return;
    }

    let batch = pending.take();
    let repo = MessageCountRepository::new(db);

    let strategy = ExponentialBackoff::from_millis(100)
        .factor(2)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(FLUSH_RETRIES);

    let batch_ref = &batch;
    let repo = &repo;

    let result = Retry::spawn(strategy, move || async move {
        repo.apply_increments(batch_ref).await.map_err(|e| {
            tracing::warn!("Message count flush failed, retrying: {}", e);
            RetryError::Transient {
                err: e,
                retry_after: None,
            }
        })
    })
    .await;

    match result {
        Ok(()) => tracing::debug!("Flushed {} message count keys", batch.len()),
        Err(e) => {
            tracing::error!(
                "Failed to flush {} message count keys, keeping them pending: {:?}",
                batch.len(),
                e
            );
            pending.merge_back(batch);
        }
    }
}

pub struct MessageCountService<'a> {
    db: &'a DatabaseConnection,
    handle: &'a MessageCountHandle,
}

impl<'a> MessageCountService<'a> {
    pub fn new(db: &'a DatabaseConnection, handle: &'a MessageCountHandle) -> Self {
        Self { db, handle }
    }

    /// Whether counting is on for the guild. Cached after the first lookup.
    pub async fn is_enabled(&self, guild_id: u64) -> Result<bool, AppError> {
        if let Some(enabled) = self.handle.enabled.get(&guild_id) {
            return Ok(*enabled);
        }

        let enabled = GuildConfigRepository::new(self.db)
            .get(guild_id)
            .await?
            .is_some_and(|config| config.message_count_enabled);

        self.handle.enabled.insert(guild_id, enabled);

        Ok(enabled)
    }

    /// Flips counting for the guild and returns the new state.
    pub async fn toggle(&self, guild_id: u64) -> Result<bool, AppError> {
        let enabled = GuildConfigRepository::new(self.db)
            .toggle_message_count(guild_id)
            .await?;

        self.handle.enabled.insert(guild_id, enabled);

        tracing::info!(
            "Message counting {} in guild {}",
            if enabled { "enabled" } else { "disabled" },
            guild_id
        );

        Ok(enabled)
    }

    pub async fn get_count(
        &self,
        guild_id: u64,
        user_id: u64,
        channel_id: Option<u64>,
    ) -> Result<u64, AppError> {
        self.handle.flush_pending().await;

        Ok(MessageCountRepository::new(self.db)
            .get_count(guild_id, user_id, channel_id)
            .await?)
    }

    pub async fn leaderboard(
        &self,
        guild_id: u64,
        limit: u64,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        self.handle.flush_pending().await;

        Ok(MessageCountRepository::new(self.db)
            .leaderboard(guild_id, limit)
            .await?)
    }

    /// Deletes counts of one member, or the whole guild when `user_id` is `None`.
    pub async fn reset(&self, guild_id: u64, user_id: Option<u64>) -> Result<u64, AppError> {
        self.handle.flush_pending().await;

        let removed = MessageCountRepository::new(self.db)
            .reset(guild_id, user_id)
            .await?;

        tracing::info!("Reset {} message count rows in guild {}", removed, guild_id);

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_utils::builder::TestBuilder;

    fn key(user_id: u64) -> CountKey {
        CountKey {
            guild_id: 1,
            channel_id: 2,
            user_id,
        }
    }

    #[test]
    fn merges_increments_per_key() {
        let early = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 1, 1, 12, 5, 0).unwrap();
        let mut pending = PendingCounts::default();

        pending.add(key(10), late);
        pending.add(key(10), early);
        pending.add(key(11), early);

        assert_eq!(pending.buffered(), 3);

        let mut batch = pending.take();
        batch.sort_by_key(|(k, _)| k.user_id);

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].1.count, 2);
        assert_eq!(batch[0].1.last_message_at, late);
        assert!(pending.is_empty());
        assert_eq!(pending.buffered(), 0);
    }

    #[test]
    fn failed_batch_merges_with_new_increments() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut pending = PendingCounts::default();

        pending.add(key(10), at);
        pending.add(key(10), at);
        let failed = pending.take();

        pending.add(key(10), at);
        pending.merge_back(failed);

        let batch = pending.take();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].1.count, 3);
    }

    #[tokio::test]
    async fn record_drops_when_channel_is_full() {
        let (sender, mut receiver) = mpsc::channel(1);
        let handle = MessageCountHandle {
            sender,
            enabled: Arc::new(DashMap::new()),
        };

        handle.record(1, 2, 3, Utc::now());
        handle.record(1, 2, 4, Utc::now());

        assert!(matches!(
            receiver.try_recv(),
            Ok(CountCommand::Increment { key, .. }) if key.user_id == 3
        ));
        assert!(receiver.try_recv().is_err());
    }

    /// Tests that reads flush buffered increments before querying.
    ///
    /// Expected: both recorded messages are counted without waiting for the interval
    #[tokio::test]
    async fn get_count_includes_buffered_increments() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::GuildConfig)
            .with_table(entity::prelude::MessageCount)
            .build()
            .await
            .unwrap();
        let db = test.db.clone().unwrap();

        let (handle, _worker) = start_worker(db.clone(), 100, Duration::from_secs(3600));
        handle.record(1, 2, 3, Utc::now());
        handle.record(1, 5, 3, Utc::now());

        let service = MessageCountService::new(&db, &handle);

        assert_eq!(service.get_count(1, 3, None).await?, 2);
        assert_eq!(service.get_count(1, 3, Some(5)).await?, 1);

        Ok(())
    }

    /// Tests that toggling updates the cached enabled state.
    ///
    /// Expected: disabled by default, enabled after one toggle
    #[tokio::test]
    async fn toggle_updates_cache() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::GuildConfig)
            .build()
            .await
            .unwrap();
        let db = test.db.clone().unwrap();

        let (handle, _worker) = start_worker(db.clone(), 10, Duration::from_secs(3600));
        let service = MessageCountService::new(&db, &handle);

        assert!(!service.is_enabled(7).await?);
        assert!(service.toggle(7).await?);
        assert!(service.is_enabled(7).await?);

        Ok(())
    }
}
