//! In-memory cache of recently deleted and edited messages.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// Entries kept per channel and per list.
pub const SNIPE_LIMIT: usize = 50;

/// How long a cached message can be sniped.
pub const SNIPE_TTL: Duration = Duration::hours(2);

#[derive(Debug, Clone, PartialEq)]
pub struct SnipedMessage {
    pub message_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub content: String,
    pub attachments: Vec<String>,
    /// Content after the edit, only set on edit snipes.
    pub edited_content: Option<String>,
    /// When the message was sent, deleted or edited, depending on the list.
    pub at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ChannelSnipes {
    recent: VecDeque<SnipedMessage>,
    deleted: VecDeque<SnipedMessage>,
    edited: VecDeque<SnipedMessage>,
}

#[derive(Clone, Default)]
pub struct SnipeCache {
    channels: Arc<DashMap<u64, ChannelSnipes>>,
}

impl SnipeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers a freshly sent message so it can be sniped once deleted or edited.
    pub fn remember(&self, channel_id: u64, message: SnipedMessage) {
        let mut channel = self.channels.entry(channel_id).or_default();
        push_bounded(&mut channel.recent, message);
    }

    /// Moves a remembered message to the deleted list.
    ///
    /// # Returns
    /// - `true` - The message was known and is now snipeable
    /// - `false` - The message was never seen
    pub fn record_delete(&self, channel_id: u64, message_id: u64, now: DateTime<Utc>) -> bool {
        let Some(mut channel) = self.channels.get_mut(&channel_id) else {
            return false;
        };

        let Some(index) = channel.recent.iter().position(|m| m.message_id == message_id) else {
            return false;
        };
        let Some(mut message) = channel.recent.remove(index) else {
            return false;
        };

        message.at = now;
        push_bounded(&mut channel.deleted, message);
        true
    }

    /// Records an edit, keeping the previous content in the edited list.
    pub fn record_edit(
        &self,
        channel_id: u64,
        message_id: u64,
        new_content: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(mut channel) = self.channels.get_mut(&channel_id) else {
            return false;
        };

        let Some(previous) = channel
            .recent
            .iter_mut()
            .find(|m| m.message_id == message_id)
        else {
            return false;
        };

        if previous.content == new_content {
            return false;
        }

        let mut snipe = previous.clone();
        previous.content = new_content.to_string();

        snipe.edited_content = Some(new_content.to_string());
        snipe.at = now;
        push_bounded(&mut channel.edited, snipe);
        true
    }

    /// Gets a deleted message, `index` 1 being the most recent.
    pub fn deleted(&self, channel_id: u64, index: usize, now: DateTime<Utc>) -> Option<SnipedMessage> {
        self.get(channel_id, index, now, |c| &mut c.deleted)
    }

    /// Gets an edited message, `index` 1 being the most recent.
    pub fn edited(&self, channel_id: u64, index: usize, now: DateTime<Utc>) -> Option<SnipedMessage> {
        self.get(channel_id, index, now, |c| &mut c.edited)
    }

    fn get(
        &self,
        channel_id: u64,
        index: usize,
        now: DateTime<Utc>,
        list: impl Fn(&mut ChannelSnipes) -> &mut VecDeque<SnipedMessage>,
    ) -> Option<SnipedMessage> {
        let mut channel = self.channels.get_mut(&channel_id)?;
        let entries = list(channel.value_mut());

        entries.retain(|m| now - m.at < SNIPE_TTL);

        index
            .checked_sub(1)
            .and_then(|i| entries.iter().rev().nth(i))
            .cloned()
    }
}

fn push_bounded(list: &mut VecDeque<SnipedMessage>, message: SnipedMessage) {
    if list.len() == SNIPE_LIMIT {
        list.pop_front();
    }
    list.push_back(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: u64, content: &str, at: DateTime<Utc>) -> SnipedMessage {
        SnipedMessage {
            message_id: id,
            author_id: 42,
            author_name: "alice".to_string(),
            content: content.to_string(),
            attachments: Vec::new(),
            edited_content: None,
            at,
        }
    }

    #[test]
    fn snipes_newest_deletion_first() {
        let now = Utc::now();
        let cache = SnipeCache::new();
        cache.remember(1, message(10, "first", now));
        cache.remember(1, message(11, "second", now));

        assert!(cache.record_delete(1, 10, now));
        assert!(cache.record_delete(1, 11, now));

        assert_eq!(cache.deleted(1, 1, now).unwrap().content, "second");
        assert_eq!(cache.deleted(1, 2, now).unwrap().content, "first");
        assert!(cache.deleted(1, 3, now).is_none());
        assert!(cache.deleted(1, 0, now).is_none());
    }

    #[test]
    fn unknown_deletions_are_ignored() {
        let cache = SnipeCache::new();

        assert!(!cache.record_delete(1, 10, Utc::now()));
    }

    #[test]
    fn edits_keep_previous_content() {
        let now = Utc::now();
        let cache = SnipeCache::new();
        cache.remember(1, message(10, "helo", now));

        assert!(cache.record_edit(1, 10, "hello", now));
        assert!(!cache.record_edit(1, 10, "hello", now));

        let snipe = cache.edited(1, 1, now).unwrap();
        assert_eq!(snipe.content, "helo");
        assert_eq!(snipe.edited_content.as_deref(), Some("hello"));
    }

    #[test]
    fn expired_snipes_are_dropped() {
        let deleted_at = Utc::now();
        let cache = SnipeCache::new();
        cache.remember(1, message(10, "old", deleted_at));
        cache.record_delete(1, 10, deleted_at);

        let later = deleted_at + SNIPE_TTL + Duration::seconds(1);
        assert!(cache.deleted(1, 1, later).is_none());
    }

    #[test]
    fn keeps_at_most_limit_entries() {
        let now = Utc::now();
        let cache = SnipeCache::new();
        for id in 0..(SNIPE_LIMIT as u64 + 5) {
            cache.remember(1, message(id, "x", now));
        }

        assert!(!cache.record_delete(1, 0, now));
        assert!(cache.record_delete(1, SNIPE_LIMIT as u64 + 4, now));
    }
}
