//! Warn punishment data repository.
//!
//! Each guild maps a warning count to at most one punishment; `set` replaces the
//! punishment already configured for a count.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::moderation::{Punishment, WarnPunishment},
};

pub struct WarnPunishmentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WarnPunishmentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or replaces the punishment for a warning count.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `count` - Number of active warnings that triggers the punishment
    /// - `punishment` - Punishment to apply
    ///
    /// # Returns
    /// - `Ok(WarnPunishment)` - The stored punishment
    /// - `Err(AppError)` - Database error during upsert
    pub async fn set(
        &self,
        guild_id: u64,
        count: u32,
        punishment: Punishment,
    ) -> Result<WarnPunishment, AppError> {
        let existing = self.find(guild_id, count).await?;

        let entity = match existing {
            Some(existing) => {
                let mut active: entity::warn_punishment::ActiveModel = existing.into();
                active.punishment = ActiveValue::Set(punishment.kind().to_string());
                active.duration_minutes = ActiveValue::Set(punishment.duration_minutes());
                active.role_id = ActiveValue::Set(punishment.role_id().map(|id| id as i64));
                active.update(self.db).await?
            }
            None => {
                entity::warn_punishment::ActiveModel {
                    id: ActiveValue::NotSet,
                    guild_id: ActiveValue::Set(guild_id as i64),
                    count: ActiveValue::Set(count as i32),
                    punishment: ActiveValue::Set(punishment.kind().to_string()),
                    duration_minutes: ActiveValue::Set(punishment.duration_minutes()),
                    role_id: ActiveValue::Set(punishment.role_id().map(|id| id as i64)),
                }
                .insert(self.db)
                .await?
            }
        };

        WarnPunishment::from_entity(entity)
    }

    /// Removes the punishment for a warning count.
    ///
    /// # Returns
    /// - `Ok(true)` - A punishment was removed
    /// - `Ok(false)` - No punishment was configured for the count
    pub async fn remove(&self, guild_id: u64, count: u32) -> Result<bool, DbErr> {
        let result = entity::prelude::WarnPunishment::delete_many()
            .filter(entity::warn_punishment::Column::GuildId.eq(guild_id as i64))
            .filter(entity::warn_punishment::Column::Count.eq(count as i32))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets all punishments of a guild ordered by warning count.
    pub async fn get_all(&self, guild_id: u64) -> Result<Vec<WarnPunishment>, AppError> {
        entity::prelude::WarnPunishment::find()
            .filter(entity::warn_punishment::Column::GuildId.eq(guild_id as i64))
            .order_by_asc(entity::warn_punishment::Column::Count)
            .all(self.db)
            .await?
            .into_iter()
            .map(WarnPunishment::from_entity)
            .collect()
    }

    /// Gets the punishment configured for exactly `count` warnings.
    pub async fn get_for_count(
        &self,
        guild_id: u64,
        count: u32,
    ) -> Result<Option<WarnPunishment>, AppError> {
        self.find(guild_id, count)
            .await?
            .map(WarnPunishment::from_entity)
            .transpose()
    }

    async fn find(
        &self,
        guild_id: u64,
        count: u32,
    ) -> Result<Option<entity::warn_punishment::Model>, DbErr> {
        entity::prelude::WarnPunishment::find()
            .filter(entity::warn_punishment::Column::GuildId.eq(guild_id as i64))
            .filter(entity::warn_punishment::Column::Count.eq(count as i32))
            .one(self.db)
            .await
    }
}
