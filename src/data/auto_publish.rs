//! Auto-publish channel and blacklist repository.

use sea_orm::{
    sea_query::OnConflict, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::auto_publish::{AutoPublishChannel, PublishBlacklist};

pub struct AutoPublishRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AutoPublishRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enables auto-publishing for a channel. Adding an existing channel is a no-op.
    pub async fn add_channel(&self, guild_id: u64, channel_id: u64) -> Result<(), DbErr> {
        entity::prelude::AutoPublishChannel::insert(entity::auto_publish_channel::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(guild_id as i64),
            channel_id: ActiveValue::Set(channel_id as i64),
        })
        .on_conflict(
            OnConflict::column(entity::auto_publish_channel::Column::ChannelId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(())
    }

    /// Disables auto-publishing for a channel and drops its blacklists.
    ///
    /// # Returns
    /// - `Ok(true)` - The channel was configured and is now removed
    /// - `Ok(false)` - The channel was not configured in this guild
    pub async fn remove_channel(&self, guild_id: u64, channel_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::AutoPublishChannel::delete_many()
            .filter(entity::auto_publish_channel::Column::GuildId.eq(guild_id as i64))
            .filter(entity::auto_publish_channel::Column::ChannelId.eq(channel_id as i64))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        entity::prelude::PublishUserBlacklist::delete_many()
            .filter(entity::publish_user_blacklist::Column::ChannelId.eq(channel_id as i64))
            .exec(self.db)
            .await?;
        entity::prelude::PublishWordBlacklist::delete_many()
            .filter(entity::publish_word_blacklist::Column::ChannelId.eq(channel_id as i64))
            .exec(self.db)
            .await?;

        Ok(true)
    }

    pub async fn get_channels(&self, guild_id: u64) -> Result<Vec<AutoPublishChannel>, DbErr> {
        let entities = entity::prelude::AutoPublishChannel::find()
            .filter(entity::auto_publish_channel::Column::GuildId.eq(guild_id as i64))
            .order_by_asc(entity::auto_publish_channel::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities
            .into_iter()
            .map(AutoPublishChannel::from_entity)
            .collect())
    }

    pub async fn is_auto_publish(&self, channel_id: u64) -> Result<bool, DbErr> {
        let count = entity::prelude::AutoPublishChannel::find()
            .filter(entity::auto_publish_channel::Column::ChannelId.eq(channel_id as i64))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets the blacklisted users and words of a channel.
    pub async fn get_blacklist(&self, channel_id: u64) -> Result<PublishBlacklist, DbErr> {
        let user_ids = entity::prelude::PublishUserBlacklist::find()
            .filter(entity::publish_user_blacklist::Column::ChannelId.eq(channel_id as i64))
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| row.user_id as u64)
            .collect();

        let words = entity::prelude::PublishWordBlacklist::find()
            .filter(entity::publish_word_blacklist::Column::ChannelId.eq(channel_id as i64))
            .all(self.db)
            .await?
            .into_iter()
            .map(|row| row.word)
            .collect();

        Ok(PublishBlacklist { user_ids, words })
    }

    /// Blacklists a user in a channel.
    ///
    /// # Returns
    /// - `Ok(true)` - The user was added
    /// - `Ok(false)` - The user was already blacklisted
    pub async fn add_user(&self, channel_id: u64, user_id: u64) -> Result<bool, DbErr> {
        let exists = entity::prelude::PublishUserBlacklist::find()
            .filter(entity::publish_user_blacklist::Column::ChannelId.eq(channel_id as i64))
            .filter(entity::publish_user_blacklist::Column::UserId.eq(user_id as i64))
            .count(self.db)
            .await?
            > 0;

        if exists {
            return Ok(false);
        }

        entity::prelude::PublishUserBlacklist::insert(entity::publish_user_blacklist::ActiveModel {
            id: ActiveValue::NotSet,
            channel_id: ActiveValue::Set(channel_id as i64),
            user_id: ActiveValue::Set(user_id as i64),
        })
        .exec(self.db)
        .await?;

        Ok(true)
    }

    pub async fn remove_user(&self, channel_id: u64, user_id: u64) -> Result<bool, DbErr> {
        let result = entity::prelude::PublishUserBlacklist::delete_many()
            .filter(entity::publish_user_blacklist::Column::ChannelId.eq(channel_id as i64))
            .filter(entity::publish_user_blacklist::Column::UserId.eq(user_id as i64))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Blacklists a word in a channel. Words are matched case-insensitively.
    pub async fn add_word(&self, channel_id: u64, word: &str) -> Result<bool, DbErr> {
        let word = word.trim().to_lowercase();

        let exists = entity::prelude::PublishWordBlacklist::find()
            .filter(entity::publish_word_blacklist::Column::ChannelId.eq(channel_id as i64))
            .filter(entity::publish_word_blacklist::Column::Word.eq(word.clone()))
            .count(self.db)
            .await?
            > 0;

        if exists {
            return Ok(false);
        }

        entity::prelude::PublishWordBlacklist::insert(entity::publish_word_blacklist::ActiveModel {
            id: ActiveValue::NotSet,
            channel_id: ActiveValue::Set(channel_id as i64),
            word: ActiveValue::Set(word),
        })
        .exec(self.db)
        .await?;

        Ok(true)
    }

    pub async fn remove_word(&self, channel_id: u64, word: &str) -> Result<bool, DbErr> {
        let result = entity::prelude::PublishWordBlacklist::delete_many()
            .filter(entity::publish_word_blacklist::Column::ChannelId.eq(channel_id as i64))
            .filter(entity::publish_word_blacklist::Column::Word.eq(word.trim().to_lowercase()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
