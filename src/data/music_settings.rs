//! Music settings data repository.

use sea_orm::{
    sea_query::OnConflict, ActiveValue, DatabaseConnection, DbErr, EntityTrait,
};

use crate::model::music::{MusicSettings, UpdateMusicSettingsParam};

pub struct MusicSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MusicSettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a guild's music settings, falling back to defaults without inserting.
    pub async fn get_or_default(&self, guild_id: u64) -> Result<MusicSettings, DbErr> {
        let entity = entity::prelude::MusicSettings::find_by_id(guild_id as i64)
            .one(self.db)
            .await?;

        Ok(entity
            .map(MusicSettings::from_entity)
            .unwrap_or_else(|| MusicSettings::default_for(guild_id)))
    }

    /// Merges the update into the current settings and upserts the row.
    ///
    /// # Returns
    /// - `Ok(MusicSettings)` - Settings after the update
    /// - `Err(DbErr)` - Database error during upsert
    pub async fn update(
        &self,
        guild_id: u64,
        param: UpdateMusicSettingsParam,
    ) -> Result<MusicSettings, DbErr> {
        let mut settings = self.get_or_default(guild_id).await?;

        if let Some(volume) = param.volume {
            settings.volume = volume;
        }
        if let Some(mode) = param.repeat_mode {
            settings.repeat_mode = mode;
        }
        if let Some(amount) = param.autoplay_amount {
            settings.autoplay_amount = amount;
        }
        if let Some(channel) = param.music_channel_id {
            settings.music_channel_id = channel;
        }

        let active = entity::music_settings::ActiveModel {
            guild_id: ActiveValue::Set(guild_id as i64),
            volume: ActiveValue::Set(settings.volume as i32),
            repeat_mode: ActiveValue::Set(settings.repeat_mode.as_str().to_string()),
            autoplay_amount: ActiveValue::Set(settings.autoplay_amount as i32),
            music_channel_id: ActiveValue::Set(settings.music_channel_id.map(|id| id as i64)),
        };

        entity::prelude::MusicSettings::insert(active)
            .on_conflict(
                OnConflict::column(entity::music_settings::Column::GuildId)
                    .update_columns([
                        entity::music_settings::Column::Volume,
                        entity::music_settings::Column::RepeatMode,
                        entity::music_settings::Column::AutoplayAmount,
                        entity::music_settings::Column::MusicChannelId,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(settings)
    }
}
