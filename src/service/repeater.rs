//! Repeating channel messages.
//!
//! Each persisted repeater gets its own tokio task that posts on a fixed interval. The
//! task handles are kept in [`RepeaterRunners`] so removing a repeater stops it.

use dashmap::DashMap;
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, CreateMessage, GetMessages, Http};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::data::repeater::RepeaterRepository;
use crate::error::AppError;
use crate::model::repeater::{CreateRepeaterParam, Repeater, MIN_REPEATER_INTERVAL};

/// Longest interval a repeater may use.
pub const MAX_REPEATER_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Whether a run should be skipped because the previous repeat is still the newest
/// message in the channel.
pub fn should_skip(no_redundant: bool, last_posted: Option<u64>, newest: Option<u64>) -> bool {
    no_redundant && last_posted.is_some() && last_posted == newest
}

#[derive(Clone, Default)]
pub struct RepeaterRunners {
    runners: Arc<DashMap<i32, JoinHandle<()>>>,
}

impl RepeaterRunners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) the runner of a repeater.
    pub fn spawn(&self, db: DatabaseConnection, http: Arc<Http>, repeater: Repeater) {
        let id = repeater.id;
        let handle = tokio::spawn(run_repeater(db, http, repeater));

        if let Some(previous) = self.runners.insert(id, handle) {
            previous.abort();
        }
    }

    pub fn stop(&self, id: i32) -> bool {
        match self.runners.remove(&id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&self) {
        self.runners.retain(|_, handle| {
            handle.abort();
            false
        });
    }

    pub fn is_running(&self, id: i32) -> bool {
        self.runners.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Starts runners for every persisted repeater.
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of runners started
    pub async fn start_all(
        &self,
        db: &DatabaseConnection,
        http: Arc<Http>,
    ) -> Result<usize, AppError> {
        let repeaters = RepeaterRepository::new(db).get_all().await?;
        let count = repeaters.len();

        for repeater in repeaters {
            self.spawn(db.clone(), http.clone(), repeater);
        }

        tracing::info!("Started {} repeaters", count);

        Ok(count)
    }
}

async fn run_repeater(db: DatabaseConnection, http: Arc<Http>, repeater: Repeater) {
    let channel = ChannelId::new(repeater.channel_id);
    let mut last_posted = repeater.last_message_id;

    let mut ticker = interval_at(Instant::now() + repeater.interval, repeater.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        if repeater.no_redundant {
            let newest = match channel.messages(&*http, GetMessages::new().limit(1)).await {
                Ok(messages) => messages.first().map(|m| m.id.get()),
                Err(e) => {
                    tracing::debug!("Failed to read channel of repeater {}: {:?}", repeater.id, e);
                    None
                }
            };

            if should_skip(repeater.no_redundant, last_posted, newest) {
                tracing::debug!("Repeater {} skipped, its last message is newest", repeater.id);
                continue;
            }
        }

        let message = match channel
            .send_message(&*http, CreateMessage::new().content(&repeater.message))
            .await
        {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Repeater {} failed to post: {:?}", repeater.id, e);
                continue;
            }
        };

        last_posted = Some(message.id.get());

        if let Err(e) = RepeaterRepository::new(&db)
            .set_last_message_id(repeater.id, message.id.get())
            .await
        {
            tracing::error!("Failed to store last message of repeater {}: {:?}", repeater.id, e);
        }
    }
}

pub struct RepeaterService<'a> {
    db: &'a DatabaseConnection,
    runners: &'a RepeaterRunners,
}

impl<'a> RepeaterService<'a> {
    pub fn new(db: &'a DatabaseConnection, runners: &'a RepeaterRunners) -> Self {
        Self { db, runners }
    }

    /// Stores a repeater and starts its runner.
    ///
    /// # Returns
    /// - `Ok(Repeater)` - The running repeater
    /// - `Err(AppError::BadRequest)` - Interval outside one minute to 30 days, or empty message
    pub async fn add(
        &self,
        http: Arc<Http>,
        param: CreateRepeaterParam,
    ) -> Result<Repeater, AppError> {
        if param.interval < MIN_REPEATER_INTERVAL || param.interval > MAX_REPEATER_INTERVAL {
            return Err(AppError::BadRequest(
                "The interval must be between 1 minute and 30 days".to_string(),
            ));
        }
        if param.message.trim().is_empty() {
            return Err(AppError::BadRequest(
                "The message can't be empty".to_string(),
            ));
        }

        let repeater = RepeaterRepository::new(self.db).create(param).await?;

        self.runners.spawn(self.db.clone(), http, repeater.clone());

        tracing::info!(
            "Repeater {} added in guild {} every {}s",
            repeater.id,
            repeater.guild_id,
            repeater.interval.as_secs()
        );

        Ok(repeater)
    }

    pub async fn remove(&self, guild_id: u64, id: i32) -> Result<(), AppError> {
        if !RepeaterRepository::new(self.db).delete(guild_id, id).await? {
            return Err(AppError::NotFound(format!("There is no repeater #{}", id)));
        }

        self.runners.stop(id);

        Ok(())
    }

    pub async fn list(&self, guild_id: u64) -> Result<Vec<Repeater>, AppError> {
        Ok(RepeaterRepository::new(self.db).get_by_guild(guild_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;
    use test_utils::factory::repeater::create_repeater;

    #[test]
    fn skips_only_when_own_repeat_is_newest() {
        assert!(should_skip(true, Some(5), Some(5)));
        assert!(!should_skip(true, Some(5), Some(6)));
        assert!(!should_skip(false, Some(5), Some(5)));
        assert!(!should_skip(true, None, None));
    }

    /// Tests that a too short interval is rejected before anything is stored.
    ///
    /// Expected: Err(BadRequest), no runner started
    #[tokio::test]
    async fn add_rejects_short_interval() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Repeater)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let runners = RepeaterRunners::new();

        let result = RepeaterService::new(db, &runners)
            .add(
                Arc::new(Http::new("")),
                CreateRepeaterParam {
                    guild_id: 1,
                    channel_id: 2,
                    message: "hello".to_string(),
                    interval: Duration::from_secs(30),
                    no_redundant: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(runners.is_empty());

        Ok(())
    }

    /// Tests that runners are started for persisted repeaters and stopped on removal.
    ///
    /// Expected: two runners after start_all, one after removing a repeater
    #[tokio::test]
    async fn start_all_and_remove() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_table(entity::prelude::Repeater)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_repeater(db, 1).await?;
        create_repeater(db, 1).await?;

        let runners = RepeaterRunners::new();
        let started = runners.start_all(db, Arc::new(Http::new(""))).await?;
        assert_eq!(started, 2);

        RepeaterService::new(db, &runners).remove(1, first.id).await?;

        assert!(!runners.is_running(first.id));
        assert_eq!(runners.len(), 1);

        runners.stop_all();
        assert!(runners.is_empty());

        Ok(())
    }
}
