//! Side effects of new guild messages.
//!
//! Every non-bot guild message is remembered for snipes, counted when the guild has
//! counting on, crossposted in auto-publish channels, previewed when it links another
//! message of the guild, and relayed to the AI provider in the guild's AI channel.
//! Each step logs its own failure and never stops the following ones.

use serenity::all::{ChannelId, Context, CreateMessage, GuildId, Message};

use crate::config::AiConfig;
use crate::model::guild_config::GuildConfig;
use crate::service::ai::AiService;
use crate::service::auto_publish::AutoPublishService;
use crate::service::guild_config::GuildConfigService;
use crate::service::link_preview::{first_link_in_guild, LinkPreviewService};
use crate::service::message_count::MessageCountService;
use crate::service::snipe::SnipedMessage;
use crate::state::AppState;
use crate::util::text::{split_message, MESSAGE_LIMIT};

/// Handle message creation in a channel
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    let Some(guild_id) = message.guild_id.map(|id| id.get()) else {
        return;
    };

    if message.author.id == ctx.cache.current_user().id {
        return;
    }

    // Announcements posted by other bots and webhooks are still published.
    publish(state, &ctx, &message).await;

    if message.author.bot {
        return;
    }

    let channel_id = message.channel_id.get();

    state.snipes.remember(
        channel_id,
        SnipedMessage {
            message_id: message.id.get(),
            author_id: message.author.id.get(),
            author_name: message.author.name.clone(),
            content: message.content.clone(),
            attachments: message.attachments.iter().map(|a| a.url.clone()).collect(),
            edited_content: None,
            at: message.timestamp.to_utc(),
        },
    );

    let counter = MessageCountService::new(&state.db, &state.message_count);
    match counter.is_enabled(guild_id).await {
        Ok(true) => state.message_count.record(
            guild_id,
            channel_id,
            message.author.id.get(),
            message.timestamp.to_utc(),
        ),
        Ok(false) => {}
        Err(e) => tracing::error!("Failed to check message counting for guild {}: {:?}", guild_id, e),
    }

    let config = match GuildConfigService::new(&state.db, &state.guild_configs)
        .get(guild_id)
        .await
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config of guild {}: {:?}", guild_id, e);
            return;
        }
    };

    if config.link_preview_enabled {
        preview(&ctx, guild_id, &message).await;
    }

    if config.ai_channel_id == Some(channel_id) {
        match &state.ai {
            Some(ai) => relay_to_ai(state, &ctx, ai, &config, &message).await,
            None => tracing::debug!("AI channel set in guild {} but no provider is configured", guild_id),
        }
    }
}

async fn publish(state: &AppState, ctx: &Context, message: &Message) {
    match AutoPublishService::new(&state.db)
        .handle_message(
            &ctx.http,
            message.channel_id.get(),
            message.id.get(),
            message.author.id.get(),
            &message.content,
        )
        .await
    {
        Ok(true) => tracing::debug!("Published message {} in {}", message.id, message.channel_id),
        Ok(false) => {}
        Err(e) => tracing::error!("Failed to publish message {}: {:?}", message.id, e),
    }
}

async fn preview(ctx: &Context, guild_id: u64, message: &Message) {
    if first_link_in_guild(&message.content, guild_id).is_none() {
        return;
    }

    let member = match GuildId::new(guild_id).member(ctx, message.author.id).await {
        Ok(member) => member,
        Err(e) => {
            tracing::debug!("Failed to fetch author of message {}: {:?}", message.id, e);
            return;
        }
    };

    // Quoted content must be visible to the author, not only to the bot.
    let permissions_in = |channel_id: u64| {
        let guild = ctx.cache.guild(guild_id)?;
        let channel = guild.channels.get(&ChannelId::new(channel_id))?;
        Some(guild.user_permissions_in(channel, &member))
    };

    let embed = match LinkPreviewService::new(&ctx.http)
        .preview(guild_id, &message.content, permissions_in)
        .await
    {
        Ok(Some(embed)) => embed,
        Ok(None) => return,
        Err(e) => {
            tracing::debug!("Failed to preview link in message {}: {:?}", message.id, e);
            return;
        }
    };

    let reply = CreateMessage::new()
        .embed(embed)
        .reference_message(message);

    if let Err(e) = message.channel_id.send_message(&ctx.http, reply).await {
        tracing::error!("Failed to post link preview in {}: {:?}", message.channel_id, e);
    }
}

async fn relay_to_ai(
    state: &AppState,
    ctx: &Context,
    ai: &AiConfig,
    config: &GuildConfig,
    message: &Message,
) {
    let content = message.content.trim();
    if content.is_empty() {
        return;
    }

    let typing = message.channel_id.start_typing(&ctx.http);

    let result = AiService::new(&state.db, &state.http_client, ai)
        .chat(
            config.guild_id,
            message.author.id.get(),
            content,
            config.ai_system_prompt.as_deref(),
        )
        .await;

    typing.stop();

    let reply = match result {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(
                "AI relay failed for {} in guild {}: {:?}",
                message.author.id,
                config.guild_id,
                e
            );
            format!("⚠️ {}", e.user_message())
        }
    };

    for (i, chunk) in split_message(&reply, MESSAGE_LIMIT).into_iter().enumerate() {
        let mut builder = CreateMessage::new().content(chunk);
        if i == 0 {
            builder = builder.reference_message(message);
        }

        if let Err(e) = message.channel_id.send_message(&ctx.http, builder).await {
            tracing::error!("Failed to post AI reply in {}: {:?}", message.channel_id, e);
            break;
        }
    }
}
