use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::all::Http;

use crate::data::guild_config::GuildConfigRepository;
use crate::data::warn_punishment::WarnPunishmentRepository;
use crate::data::warning::WarningRepository;
use crate::error::AppError;
use crate::model::moderation::{
    CreateWarningParam, Punishment, WarnOutcome, WarnPunishment, WarningPage, WarningSelector,
};
use crate::service::moderation::action::ModerationActionService;

/// Warnings shown per warn log page.
pub const WARNLOG_PAGE_SIZE: u64 = 10;

pub struct WarnService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WarnService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a warning and applies the punishment configured for the new count.
    ///
    /// Punishment failures do not fail the warning; they are reported through
    /// `AppliedPunishment::error` so the moderator can be told.
    ///
    /// # Arguments
    /// - `http` - Discord HTTP client used to apply the punishment
    /// - `guild_id` - Guild the warning belongs to
    /// - `user_id` - Warned member
    /// - `moderator_id` - Moderator issuing the warning
    /// - `reason` - Optional reason shown in the warn log
    ///
    /// # Returns
    /// - `Ok(WarnOutcome)` - The warning, the active count and any punishment applied
    /// - `Err(AppError)` - Database error while storing or counting
    pub async fn warn(
        &self,
        http: &Http,
        guild_id: u64,
        user_id: u64,
        moderator_id: u64,
        reason: Option<String>,
    ) -> Result<WarnOutcome, AppError> {
        let warning_repo = WarningRepository::new(self.db);
        let punishment_repo = WarnPunishmentRepository::new(self.db);

        let warning = warning_repo
            .create(CreateWarningParam {
                guild_id,
                user_id,
                moderator_id,
                reason,
            })
            .await?;

        let warning_count = warning_repo.count_active(guild_id, user_id).await?;

        tracing::info!(
            "Warned {} in guild {} ({} active warnings)",
            user_id,
            guild_id,
            warning_count
        );

        let configured = punishment_repo
            .get_for_count(guild_id, warning_count as u32)
            .await?;

        let punishment = match configured {
            Some(configured) => Some(
                ModerationActionService::new(http, guild_id)
                    .apply_punishment(user_id, &configured.punishment)
                    .await,
            ),
            None => None,
        };

        Ok(WarnOutcome {
            warning,
            warning_count,
            punishment,
        })
    }

    /// Gets one page of a member's active warnings. `page` is 1-based.
    pub async fn warnlog(
        &self,
        guild_id: u64,
        user_id: u64,
        page: u64,
    ) -> Result<WarningPage, AppError> {
        let mut result = WarningRepository::new(self.db)
            .get_active_page(guild_id, user_id, page.max(1) - 1, WARNLOG_PAGE_SIZE)
            .await?;
        result.page += 1;

        Ok(result)
    }

    /// Forgives one or all of a member's active warnings.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings forgiven
    /// - `Err(AppError::NotFound)` - The selection matched no active warning
    pub async fn forgive(
        &self,
        guild_id: u64,
        user_id: u64,
        selector: WarningSelector,
        moderator_id: u64,
    ) -> Result<u64, AppError> {
        let repo = WarningRepository::new(self.db);

        let ids = repo.select_ids(guild_id, user_id, selector).await?;
        if ids.is_empty() {
            return Err(no_warning_found(selector));
        }

        let forgiven = repo.forgive(&ids, Some(moderator_id)).await?;

        tracing::info!(
            "{} forgave {} warnings of {} in guild {}",
            moderator_id,
            forgiven,
            user_id,
            guild_id
        );

        Ok(forgiven)
    }

    /// Permanently deletes one of a member's active warnings by warn log position.
    pub async fn delete_warning(
        &self,
        guild_id: u64,
        user_id: u64,
        index: usize,
    ) -> Result<(), AppError> {
        let repo = WarningRepository::new(self.db);
        let selector = WarningSelector::Index(index);

        let ids = repo.select_ids(guild_id, user_id, selector).await?;
        if ids.is_empty() {
            return Err(no_warning_found(selector));
        }

        repo.delete(&ids).await?;

        Ok(())
    }

    /// Configures the punishment applied when a member reaches `count` active warnings.
    pub async fn set_punishment(
        &self,
        guild_id: u64,
        count: u32,
        punishment: Punishment,
    ) -> Result<WarnPunishment, AppError> {
        if count == 0 {
            return Err(AppError::BadRequest(
                "The warning count must be at least 1".to_string(),
            ));
        }

        let stored = WarnPunishmentRepository::new(self.db)
            .set(guild_id, count, punishment)
            .await?;

        tracing::info!(
            "Guild {} now applies {} at {} warnings",
            guild_id,
            stored.punishment.kind(),
            count
        );

        Ok(stored)
    }

    pub async fn remove_punishment(&self, guild_id: u64, count: u32) -> Result<(), AppError> {
        if !WarnPunishmentRepository::new(self.db)
            .remove(guild_id, count)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "No punishment is configured for {} warnings",
                count
            )));
        }

        Ok(())
    }

    pub async fn list_punishments(&self, guild_id: u64) -> Result<Vec<WarnPunishment>, AppError> {
        WarnPunishmentRepository::new(self.db).get_all(guild_id).await
    }

    /// Applies each guild's expiry rule to warnings older than its configured age.
    ///
    /// # Returns
    /// - `Ok(u64)` - Warnings forgiven or deleted across all guilds
    pub async fn expire_warnings(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let configs = GuildConfigRepository::new(self.db)
            .get_with_warn_expiry()
            .await?;
        let repo = WarningRepository::new(self.db);

        let mut expired = 0;
        for config in configs {
            let cutoff = now - Duration::hours(config.warn_expire_hours as i64);
            let affected = repo
                .expire_before(config.guild_id, cutoff, config.warn_expire_action)
                .await?;

            if affected > 0 {
                tracing::info!(
                    "Expired {} warnings in guild {} ({})",
                    affected,
                    config.guild_id,
                    config.warn_expire_action
                );
            }
            expired += affected;
        }

        Ok(expired)
    }
}

fn no_warning_found(selector: WarningSelector) -> AppError {
    match selector {
        WarningSelector::All => AppError::NotFound("That member has no active warnings".to_string()),
        WarningSelector::Index(index) => {
            AppError::NotFound(format!("There is no active warning #{}", index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::guild_config::{UpdateGuildConfigParam, WarnExpireAction};
    use test_utils::builder::TestBuilder;
    use test_utils::factory::warning::WarningFactory;

    /// Tests that the warn log is paged 1-based with ten entries per page.
    ///
    /// Expected: page 2 holds the 11th and 12th newest warnings
    #[tokio::test]
    async fn warnlog_pages_are_one_based() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        for _ in 0..12 {
            WarningFactory::new(db, 1, 2).build().await?;
        }

        let page = WarnService::new(db).warnlog(1, 2, 2).await?;

        assert_eq!(page.page, 2);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.warnings.len(), 2);

        Ok(())
    }

    /// Tests that forgiving an empty selection reports it.
    ///
    /// Expected: Err(NotFound)
    #[tokio::test]
    async fn forgive_without_warnings_fails() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let result = WarnService::new(db)
            .forgive(1, 2, WarningSelector::All, 3)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }

    /// Tests that forgiving by index only touches that warning.
    ///
    /// Expected: one warning forgiven, one still active
    #[tokio::test]
    async fn forgive_by_index() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        WarningFactory::new(db, 1, 2).build().await?;
        WarningFactory::new(db, 1, 2).build().await?;

        let service = WarnService::new(db);
        assert_eq!(service.forgive(1, 2, WarningSelector::Index(1), 3).await?, 1);
        assert_eq!(WarningRepository::new(db).count_active(1, 2).await?, 1);

        Ok(())
    }

    /// Tests that the expiry sweep only touches guilds with expiry enabled.
    ///
    /// Expected: the old warning in guild 1 is deleted, guild 5 is untouched
    #[tokio::test]
    async fn expire_warnings_uses_guild_rules() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let now = Utc::now();

        GuildConfigRepository::new(db)
            .update(
                1,
                UpdateGuildConfigParam {
                    warn_expire_hours: Some(24),
                    warn_expire_action: Some(WarnExpireAction::Delete),
                    ..Default::default()
                },
            )
            .await?;

        WarningFactory::new(db, 1, 2)
            .created_at(now - Duration::hours(48))
            .build()
            .await?;
        WarningFactory::new(db, 1, 2).created_at(now).build().await?;
        WarningFactory::new(db, 5, 2)
            .created_at(now - Duration::hours(48))
            .build()
            .await?;

        let expired = WarnService::new(db).expire_warnings(now).await?;

        assert_eq!(expired, 1);
        assert_eq!(WarningRepository::new(db).count_active(1, 2).await?, 1);
        assert_eq!(WarningRepository::new(db).count_active(5, 2).await?, 1);

        Ok(())
    }

    /// Tests that punishments are upserted per warning count and listed in order.
    ///
    /// Expected: setting count 3 twice keeps one entry, count 0 is rejected
    #[tokio::test]
    async fn punishments_are_unique_per_count() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_moderation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let service = WarnService::new(db);

        service.set_punishment(1, 3, Punishment::Kick).await?;
        service.set_punishment(1, 1, Punishment::Timeout { minutes: 10 }).await?;
        service.set_punishment(1, 3, Punishment::Ban).await?;

        let punishments = service.list_punishments(1).await?;
        assert_eq!(punishments.len(), 2);
        assert_eq!(punishments[0].count, 1);
        assert_eq!(punishments[1].punishment, Punishment::Ban);

        assert!(matches!(
            service.set_punishment(1, 0, Punishment::Kick).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.remove_punishment(1, 7).await,
            Err(AppError::NotFound(_))
        ));

        Ok(())
    }
}
