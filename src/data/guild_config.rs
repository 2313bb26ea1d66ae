//! Guild configuration data repository.
//!
//! Provides the `GuildConfigRepository` for reading and updating per-guild settings.
//! Rows are created lazily; guilds without a row behave as if they had the defaults
//! from [`GuildConfig::default_for`].

use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, TransactionTrait,
};

use crate::model::guild_config::{GuildConfig, UpdateGuildConfigParam};

/// Repository providing database operations for guild configuration.
pub struct GuildConfigRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildConfigRepository<'a> {
    /// Creates a new GuildConfigRepository instance
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `GuildConfigRepository` - new repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the stored configuration for a guild, if any.
    pub async fn get(&self, guild_id: u64) -> Result<Option<GuildConfig>, DbErr> {
        let entity = entity::prelude::GuildConfig::find_by_id(guild_id as i64)
            .one(self.db)
            .await?;

        Ok(entity.map(GuildConfig::from_entity))
    }

    /// Gets the configuration for a guild, inserting the defaults when missing.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(GuildConfig)` - Existing or freshly created configuration
    /// - `Err(DbErr)` - Database error during query or insert
    pub async fn get_or_create(&self, guild_id: u64) -> Result<GuildConfig, DbErr> {
        if let Some(config) = self.get(guild_id).await? {
            return Ok(config);
        }

        let defaults = GuildConfig::default_for(guild_id);
        entity::prelude::GuildConfig::insert(default_active_model(&defaults))
            .on_conflict(
                OnConflict::column(entity::guild_config::Column::GuildId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(self.get(guild_id).await?.unwrap_or(defaults))
    }

    /// Applies a partial update to a guild's configuration.
    ///
    /// Fields left as `None` in the param are untouched. Creates the row first when the
    /// guild has no configuration yet.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `param` - Fields to change
    ///
    /// # Returns
    /// - `Ok(GuildConfig)` - The configuration after the update
    /// - `Err(DbErr)` - Database error during update
    pub async fn update(
        &self,
        guild_id: u64,
        param: UpdateGuildConfigParam,
    ) -> Result<GuildConfig, DbErr> {
        let current = self.get_or_create(guild_id).await?;

        if param.link_preview_enabled.is_none()
            && param.warn_expire_hours.is_none()
            && param.warn_expire_action.is_none()
            && param.ai_channel_id.is_none()
            && param.ai_system_prompt.is_none()
        {
            return Ok(current);
        }

        let mut active = entity::guild_config::ActiveModel {
            guild_id: ActiveValue::Unchanged(guild_id as i64),
            ..Default::default()
        };

        if let Some(enabled) = param.link_preview_enabled {
            active.link_preview_enabled = ActiveValue::Set(enabled);
        }
        if let Some(hours) = param.warn_expire_hours {
            active.warn_expire_hours = ActiveValue::Set(hours as i32);
        }
        if let Some(action) = param.warn_expire_action {
            active.warn_expire_action = ActiveValue::Set(action.as_str().to_string());
        }
        if let Some(channel) = param.ai_channel_id {
            active.ai_channel_id = ActiveValue::Set(channel.map(|id| id as i64));
        }
        if let Some(prompt) = param.ai_system_prompt {
            active.ai_system_prompt = ActiveValue::Set(prompt);
        }

        let entity = active.update(self.db).await?;

        Ok(GuildConfig::from_entity(entity))
    }

    /// Flips message counting for a guild inside a transaction.
    ///
    /// # Returns
    /// - `Ok(bool)` - The new enabled state
    /// - `Err(DbErr)` - Database error, the transaction is rolled back
    pub async fn toggle_message_count(&self, guild_id: u64) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;

        let existing = entity::prelude::GuildConfig::find_by_id(guild_id as i64)
            .one(&txn)
            .await?;

        let enabled = match existing {
            Some(model) => {
                let enabled = !model.message_count_enabled;
                let mut active: entity::guild_config::ActiveModel = model.into();
                active.message_count_enabled = ActiveValue::Set(enabled);
                active.update(&txn).await?;
                enabled
            }
            None => {
                let mut config = GuildConfig::default_for(guild_id);
                config.message_count_enabled = true;
                default_active_model(&config).insert(&txn).await?;
                true
            }
        };

        txn.commit().await?;

        Ok(enabled)
    }

    /// Gets every guild that has warning expiry enabled.
    pub async fn get_with_warn_expiry(&self) -> Result<Vec<GuildConfig>, DbErr> {
        let entities = entity::prelude::GuildConfig::find()
            .filter(entity::guild_config::Column::WarnExpireHours.gt(0))
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(GuildConfig::from_entity).collect())
    }
}

fn default_active_model(config: &GuildConfig) -> entity::guild_config::ActiveModel {
    entity::guild_config::ActiveModel {
        guild_id: ActiveValue::Set(config.guild_id as i64),
        message_count_enabled: ActiveValue::Set(config.message_count_enabled),
        link_preview_enabled: ActiveValue::Set(config.link_preview_enabled),
        warn_expire_hours: ActiveValue::Set(config.warn_expire_hours as i32),
        warn_expire_action: ActiveValue::Set(config.warn_expire_action.as_str().to_string()),
        ai_channel_id: ActiveValue::Set(config.ai_channel_id.map(|id| id as i64)),
        ai_system_prompt: ActiveValue::Set(config.ai_system_prompt.clone()),
    }
}
