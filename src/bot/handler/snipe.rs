use chrono::Utc;
use serenity::all::{ChannelId, Context, GuildId, Message, MessageId, MessageUpdateEvent};

use crate::state::AppState;

/// Handles the message_update event, keeping the previous content for `editsnipe`
pub async fn handle_message_update(
    state: &AppState,
    _ctx: Context,
    _old_if_available: Option<Message>,
    _new: Option<Message>,
    event: MessageUpdateEvent,
) {
    // Embed-only updates carry no content
    let Some(content) = event.content else {
        return;
    };

    if state
        .snipes
        .record_edit(event.channel_id.get(), event.id.get(), &content, Utc::now())
    {
        tracing::debug!("Cached edit of message {}", event.id);
    }
}

/// Handles the message_delete event, moving the cached message to the `snipe` list
pub async fn handle_message_delete(
    state: &AppState,
    _ctx: Context,
    channel_id: ChannelId,
    deleted_message_id: MessageId,
    guild_id: Option<GuildId>,
) {
    if guild_id.is_none() {
        return;
    }

    if state
        .snipes
        .record_delete(channel_id.get(), deleted_message_id.get(), Utc::now())
    {
        tracing::debug!("Cached deletion of message {}", deleted_message_id);
    }
}
