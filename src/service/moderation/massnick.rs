//! Mass nickname runs.
//!
//! A run renames every eligible member one request at a time. Progress lives in memory
//! so `massnick_status` can report on it and `massnick_cancel` can stop it between
//! members. Only one run per guild may be active.

use dashmap::DashMap;
use serenity::all::{EditMember, GuildId, Http, UserId};
use std::sync::Arc;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MassNickProgress {
    pub total: usize,
    pub changed: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub finished: bool,
}

impl MassNickProgress {
    pub fn processed(&self) -> usize {
        self.changed + self.failed
    }
}

#[derive(Clone, Default)]
pub struct MassNickTracker {
    runs: Arc<DashMap<u64, MassNickProgress>>,
}

impl MassNickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new run.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - A run is already in progress for the guild
    pub fn start(&self, guild_id: u64, total: usize) -> Result<(), AppError> {
        let mut entry = self.runs.entry(guild_id).or_default();
        if entry.total > 0 && !entry.finished {
            return Err(AppError::BadRequest(
                "A mass nickname run is already in progress".to_string(),
            ));
        }

        *entry = MassNickProgress {
            total,
            ..Default::default()
        };

        Ok(())
    }

    pub fn record(&self, guild_id: u64, changed: bool) {
        if let Some(mut progress) = self.runs.get_mut(&guild_id) {
            if changed {
                progress.changed += 1;
            } else {
                progress.failed += 1;
            }
        }
    }

    /// Asks the active run to stop. Returns `false` when nothing is running.
    pub fn cancel(&self, guild_id: u64) -> bool {
        match self.runs.get_mut(&guild_id) {
            Some(mut progress) if !progress.finished => {
                progress.cancelled = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_cancelled(&self, guild_id: u64) -> bool {
        self.runs
            .get(&guild_id)
            .is_some_and(|progress| progress.cancelled)
    }

    pub fn finish(&self, guild_id: u64) -> Option<MassNickProgress> {
        let mut progress = self.runs.get_mut(&guild_id)?;
        progress.finished = true;
        Some(*progress)
    }

    pub fn status(&self, guild_id: u64) -> Option<MassNickProgress> {
        self.runs.get(&guild_id).map(|progress| *progress)
    }
}

/// Renames `targets`, clearing their nickname when `nickname` is `None`.
///
/// Call [`MassNickTracker::start`] first; this runs until every target was tried or
/// the run is cancelled.
pub async fn run_massnick(
    http: Arc<Http>,
    tracker: MassNickTracker,
    guild_id: u64,
    targets: Vec<u64>,
    nickname: Option<String>,
) -> MassNickProgress {
    let guild = GuildId::new(guild_id);

    for user_id in targets {
        if tracker.is_cancelled(guild_id) {
            tracing::info!("Mass nickname in guild {} cancelled", guild_id);
            break;
        }

        let builder = EditMember::new().nickname(nickname.clone().unwrap_or_default());

        match guild.edit_member(&*http, UserId::new(user_id), builder).await {
            Ok(_) => tracker.record(guild_id, true),
            Err(e) => {
                tracing::debug!("Failed to rename {} in guild {}: {:?}", user_id, guild_id, e);
                tracker.record(guild_id, false);
            }
        }
    }

    let progress = tracker.finish(guild_id).unwrap_or_default();

    tracing::info!(
        "Mass nickname in guild {} done: {} changed, {} failed of {}",
        guild_id,
        progress.changed,
        progress.failed,
        progress.total
    );

    progress
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_run_per_guild() {
        let tracker = MassNickTracker::new();

        tracker.start(1, 10).unwrap();

        assert!(tracker.start(1, 5).is_err());
        assert!(tracker.start(2, 5).is_ok());
    }

    #[test]
    fn finished_run_can_be_restarted() {
        let tracker = MassNickTracker::new();
        tracker.start(1, 2).unwrap();
        tracker.record(1, true);
        tracker.record(1, false);

        let progress = tracker.finish(1).unwrap();
        assert_eq!(progress.processed(), 2);

        assert!(tracker.start(1, 3).is_ok());
        assert_eq!(tracker.status(1).unwrap().changed, 0);
    }

    #[test]
    fn cancel_only_affects_active_runs() {
        let tracker = MassNickTracker::new();

        assert!(!tracker.cancel(1));

        tracker.start(1, 3).unwrap();
        assert!(tracker.cancel(1));
        assert!(tracker.is_cancelled(1));

        tracker.finish(1);
        assert!(!tracker.cancel(1));
    }
}
