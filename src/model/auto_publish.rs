//! Announcement channels whose messages are crossposted automatically.

#[derive(Debug, Clone, PartialEq)]
pub struct AutoPublishChannel {
    pub id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
}

impl AutoPublishChannel {
    pub fn from_entity(entity: entity::auto_publish_channel::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            channel_id: entity.channel_id as u64,
        }
    }
}

/// Everything needed to decide whether a message in a channel gets published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishBlacklist {
    pub user_ids: Vec<u64>,
    /// Stored lowercased.
    pub words: Vec<String>,
}
