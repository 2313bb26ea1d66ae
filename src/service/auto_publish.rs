use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, Http, MessageId};

use crate::data::auto_publish::AutoPublishRepository;
use crate::error::AppError;
use crate::model::auto_publish::{AutoPublishChannel, PublishBlacklist};

/// Whether a message passes the channel's user and word blacklists.
///
/// Words match case-insensitively anywhere in the content.
pub fn should_publish(blacklist: &PublishBlacklist, author_id: u64, content: &str) -> bool {
    if blacklist.user_ids.contains(&author_id) {
        return false;
    }

    let content = content.to_lowercase();
    !blacklist.words.iter().any(|word| content.contains(word.as_str()))
}

/// Renders a channel's blacklist as the two lists shown by the blacklist command.
pub fn describe_blacklist(blacklist: &PublishBlacklist) -> (String, String) {
    let users = if blacklist.user_ids.is_empty() {
        "None".to_string()
    } else {
        blacklist
            .user_ids
            .iter()
            .map(|id| format!("<@{}>", id))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let words = if blacklist.words.is_empty() {
        "None".to_string()
    } else {
        blacklist
            .words
            .iter()
            .map(|word| format!("`{}`", word))
            .collect::<Vec<_>>()
            .join(", ")
    };

    (users, words)
}

pub struct AutoPublishService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AutoPublishService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn add_channel(&self, guild_id: u64, channel_id: u64) -> Result<(), AppError> {
        AutoPublishRepository::new(self.db)
            .add_channel(guild_id, channel_id)
            .await?;

        tracing::info!("Auto-publish enabled for {} in guild {}", channel_id, guild_id);

        Ok(())
    }

    pub async fn remove_channel(&self, guild_id: u64, channel_id: u64) -> Result<(), AppError> {
        if !AutoPublishRepository::new(self.db)
            .remove_channel(guild_id, channel_id)
            .await?
        {
            return Err(AppError::NotFound(
                "That channel is not auto-published".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn list_channels(&self, guild_id: u64) -> Result<Vec<AutoPublishChannel>, AppError> {
        Ok(AutoPublishRepository::new(self.db)
            .get_channels(guild_id)
            .await?)
    }

    /// Gets the blacklist of a channel that is auto-published.
    pub async fn blacklist(&self, channel_id: u64) -> Result<PublishBlacklist, AppError> {
        let repo = AutoPublishRepository::new(self.db);
        self.ensure_auto_publish(&repo, channel_id).await?;

        Ok(repo.get_blacklist(channel_id).await?)
    }

    /// Toggles a user on the channel's blacklist. Returns `true` when the user was added.
    pub async fn toggle_user(&self, channel_id: u64, user_id: u64) -> Result<bool, AppError> {
        let repo = AutoPublishRepository::new(self.db);
        self.ensure_auto_publish(&repo, channel_id).await?;

        if repo.remove_user(channel_id, user_id).await? {
            return Ok(false);
        }

        Ok(repo.add_user(channel_id, user_id).await?)
    }

    /// Toggles a word on the channel's blacklist. Returns `true` when the word was added.
    pub async fn toggle_word(&self, channel_id: u64, word: &str) -> Result<bool, AppError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(AppError::BadRequest("The word can't be empty".to_string()));
        }

        let repo = AutoPublishRepository::new(self.db);
        self.ensure_auto_publish(&repo, channel_id).await?;

        if repo.remove_word(channel_id, word).await? {
            return Ok(false);
        }

        Ok(repo.add_word(channel_id, word).await?)
    }

    /// Crossposts a freshly sent message when its channel is auto-published.
    ///
    /// # Returns
    /// - `Ok(true)` - The message was published
    /// - `Ok(false)` - Not an auto-publish channel, or blacklisted
    pub async fn handle_message(
        &self,
        http: &Http,
        channel_id: u64,
        message_id: u64,
        author_id: u64,
        content: &str,
    ) -> Result<bool, AppError> {
        let repo = AutoPublishRepository::new(self.db);

        if !repo.is_auto_publish(channel_id).await? {
            return Ok(false);
        }

        let blacklist = repo.get_blacklist(channel_id).await?;
        if !should_publish(&blacklist, author_id, content) {
            tracing::debug!("Skipped publishing {} in {}: blacklisted", message_id, channel_id);
            return Ok(false);
        }

        ChannelId::new(channel_id)
            .crosspost(http, MessageId::new(message_id))
            .await?;

        Ok(true)
    }

    async fn ensure_auto_publish(
        &self,
        repo: &AutoPublishRepository<'_>,
        channel_id: u64,
    ) -> Result<(), AppError> {
        if repo.is_auto_publish(channel_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(
                "That channel is not auto-published".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blacklist() -> PublishBlacklist {
        PublishBlacklist {
            user_ids: vec![7],
            words: vec!["giveaway".to_string()],
        }
    }

    #[test]
    fn blocks_blacklisted_authors() {
        assert!(!should_publish(&blacklist(), 7, "Patch notes"));
        assert!(should_publish(&blacklist(), 8, "Patch notes"));
    }

    #[test]
    fn blocks_blacklisted_words_case_insensitively() {
        assert!(!should_publish(&blacklist(), 8, "Huge GIVEAWAY tonight"));
    }

    #[test]
    fn empty_blacklist_publishes_everything() {
        assert!(should_publish(&PublishBlacklist::default(), 1, "anything"));
    }

    #[test]
    fn describes_blacklist_entries() {
        let (users, words) = describe_blacklist(&PublishBlacklist {
            user_ids: vec![7, 8],
            words: vec!["giveaway".to_string()],
        });

        assert_eq!(users, "<@7>, <@8>");
        assert_eq!(words, "`giveaway`");
    }

    #[test]
    fn describes_empty_blacklist() {
        let (users, words) = describe_blacklist(&PublishBlacklist::default());

        assert_eq!(users, "None");
        assert_eq!(words, "None");
    }
}
