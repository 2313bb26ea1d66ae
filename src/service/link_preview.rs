//! Quote previews for Discord message links.

use regex::Regex;
use serenity::all::{
    ChannelId, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, Http, Message, MessageId,
    Permissions,
};
use std::sync::LazyLock;

use crate::error::AppError;
use crate::util::embed;
use crate::util::text::truncate;

static MESSAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(?:(?:ptb|canary)\.)?discord(?:app)?\.com/channels/(\d+)/(\d+)/(\d+)")
        .expect("valid message link regex")
});

/// Embed descriptions are capped at 4096 characters.
const DESCRIPTION_LIMIT: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLink {
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageLink {
    pub fn url(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id, self.channel_id, self.message_id
        )
    }
}

/// Finds every message link in `content`, in order of appearance.
pub fn parse_message_links(content: &str) -> Vec<MessageLink> {
    MESSAGE_LINK
        .captures_iter(content)
        .filter_map(|caps| {
            Some(MessageLink {
                guild_id: caps.get(1)?.as_str().parse().ok()?,
                channel_id: caps.get(2)?.as_str().parse().ok()?,
                message_id: caps.get(3)?.as_str().parse().ok()?,
            })
        })
        .collect()
}

/// First link in `content` pointing into `guild_id`. Links to other guilds are never
/// previewed.
pub fn first_link_in_guild(content: &str, guild_id: u64) -> Option<MessageLink> {
    parse_message_links(content)
        .into_iter()
        .find(|link| link.guild_id == guild_id)
}

/// Whether channel permissions let a member read the messages a link points to.
pub fn can_read_history(permissions: Permissions) -> bool {
    permissions.contains(Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY)
}

/// First link into `guild_id` whose channel the author can read.
///
/// `permissions_in` resolves the author's permissions in a channel, `None` when the
/// channel is unknown.
pub fn first_readable_link(
    content: &str,
    guild_id: u64,
    permissions_in: impl Fn(u64) -> Option<Permissions>,
) -> Option<MessageLink> {
    parse_message_links(content).into_iter().find(|link| {
        link.guild_id == guild_id
            && permissions_in(link.channel_id).is_some_and(can_read_history)
    })
}

pub fn quote_embed(message: &Message, link: &MessageLink) -> CreateEmbed {
    let mut quote = embed::info_embed()
        .author(
            CreateEmbedAuthor::new(message.author.display_name()).icon_url(message.author.face()),
        )
        .description(truncate(&message.content, DESCRIPTION_LIMIT))
        .field("Source", format!("[Jump to message]({})", link.url()), false)
        .footer(CreateEmbedFooter::new(format!("#{}", link.channel_id)))
        .timestamp(message.timestamp);

    let image = message.attachments.iter().find(|attachment| {
        attachment
            .content_type
            .as_deref()
            .is_some_and(|kind| kind.starts_with("image/"))
    });
    if let Some(image) = image {
        quote = quote.image(&image.url);
    }

    quote
}

pub struct LinkPreviewService<'a> {
    http: &'a Http,
}

impl<'a> LinkPreviewService<'a> {
    pub fn new(http: &'a Http) -> Self {
        Self { http }
    }

    /// Builds a quote embed for the first same-guild message link in `content` that the
    /// author may read.
    ///
    /// # Returns
    /// - `Ok(Some(CreateEmbed))` - The linked message was fetched
    /// - `Ok(None)` - No readable link into this guild
    /// - `Err(AppError)` - The message could not be fetched
    pub async fn preview(
        &self,
        guild_id: u64,
        content: &str,
        permissions_in: impl Fn(u64) -> Option<Permissions>,
    ) -> Result<Option<CreateEmbed>, AppError> {
        let Some(link) = first_readable_link(content, guild_id, permissions_in) else {
            return Ok(None);
        };

        let message = ChannelId::new(link.channel_id)
            .message(self.http, MessageId::new(link.message_id))
            .await?;

        Ok(Some(quote_embed(&message, &link)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_links_from_all_clients() {
        let content = "see https://discord.com/channels/1/2/3 and \
                       https://ptb.discordapp.com/channels/4/5/6 or https://canary.discord.com/channels/7/8/9";

        let links = parse_message_links(content);

        assert_eq!(links.len(), 3);
        assert_eq!(
            links[1],
            MessageLink {
                guild_id: 4,
                channel_id: 5,
                message_id: 6
            }
        );
    }

    #[test]
    fn ignores_other_urls() {
        assert!(parse_message_links("https://example.com/channels/1/2/3").is_empty());
        assert!(parse_message_links("https://discord.com/channels/@me/2/3").is_empty());
    }

    #[test]
    fn only_previews_links_into_the_same_guild() {
        let content = "https://discord.com/channels/9/2/3 https://discord.com/channels/1/4/5";

        let link = first_link_in_guild(content, 1).unwrap();

        assert_eq!(link.channel_id, 4);
        assert!(first_link_in_guild(content, 2).is_none());
    }

    #[test]
    fn builds_canonical_url() {
        let link = MessageLink {
            guild_id: 1,
            channel_id: 2,
            message_id: 3,
        };

        assert_eq!(link.url(), "https://discord.com/channels/1/2/3");
    }

    #[test]
    fn requires_view_and_history() {
        assert!(can_read_history(
            Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY | Permissions::SEND_MESSAGES
        ));
        assert!(!can_read_history(Permissions::VIEW_CHANNEL));
        assert!(!can_read_history(Permissions::READ_MESSAGE_HISTORY));
    }

    /// Tests a message linking both a staff-only channel and a public one.
    ///
    /// Expected: the staff-only link is skipped and the public link is previewed
    #[test]
    fn skips_links_the_author_cannot_read() {
        let content = "https://discord.com/channels/1/10/100 https://discord.com/channels/1/20/200";
        let readable = Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY;

        let link = first_readable_link(content, 1, |channel_id| match channel_id {
            10 => Some(Permissions::SEND_MESSAGES),
            20 => Some(readable),
            _ => None,
        })
        .unwrap();

        assert_eq!(link.channel_id, 20);
    }

    #[test]
    fn unknown_channels_are_not_previewed() {
        let content = "https://discord.com/channels/1/10/100";

        assert!(first_readable_link(content, 1, |_| None).is_none());
    }
}
