use lavalink_rs::client::LavalinkClient;
use lavalink_rs::model::events::Events;
use lavalink_rs::node::NodeBuilder;
use lavalink_rs::prelude::NodeDistributionStrategy;
use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents, Http};
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;

use crate::bot::command;
use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;
use crate::service::message_count::MessageCountHandle;
use crate::service::music::events::lavalink_events;
use crate::service::music::player::{GuildQueues, MusicHookData};
use crate::state::AppState;

/// Builds the Discord client and everything it shares with the rest of the bot.
///
/// The bot user is fetched over HTTP first because the Lavalink node needs its id
/// before the gateway connects.
///
/// # Arguments
/// - `config` - Application configuration
/// - `db` - Database connection shared by commands and handlers
/// - `http_client` - HTTP client for last.fm and AI providers
/// - `message_count` - Handle of the started message count worker
///
/// # Returns
/// - `Ok((Client, AppState))` - Client ready to start, and the state it was built with
/// - `Err(AppError)` - The token was rejected or the client could not be built
pub async fn init_bot(
    config: &Config,
    db: DatabaseConnection,
    http_client: reqwest::Client,
    message_count: MessageCountHandle,
) -> Result<(Client, AppState), AppError> {
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let discord_http = Arc::new(Http::new(&config.discord_bot_token));
    let bot_user = discord_http.get_current_user().await?;

    let queues = GuildQueues::default();

    let node = NodeBuilder {
        hostname: config.lavalink_host.clone(),
        is_ssl: config.lavalink_ssl,
        events: Events::default(),
        password: config.lavalink_password.clone(),
        user_id: bot_user.id.into(),
        session_id: None,
    };

    let lavalink = LavalinkClient::new_with_data(
        lavalink_events(),
        vec![node],
        NodeDistributionStrategy::round_robin(),
        Arc::new(MusicHookData {
            db: db.clone(),
            queues: queues.clone(),
            http_client: http_client.clone(),
            lastfm_api_key: config.lastfm_api_key.clone(),
        }),
    )
    .await;

    let songbird = Songbird::serenity();

    let state = AppState::new(
        db,
        http_client,
        discord_http,
        config.ai.clone(),
        lavalink,
        songbird.clone(),
        queues,
        message_count,
    );

    let framework_state = state.clone();
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: command::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.command_prefix.clone()),
                mention_as_prefix: true,
                ..Default::default()
            },
            on_error: |error| Box::pin(command::on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    "Registered {} commands globally",
                    framework.options().commands.len()
                );

                Ok(framework_state)
            })
        })
        .build();

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(state.clone()))
        .framework(framework)
        .register_songbird_with(songbird)
        .await?;

    Ok((client, state))
}

/// Runs the gateway connection until the shard manager shuts down.
///
/// This function should be called from within a tokio::spawn task since it only
/// returns once the bot disconnects.
pub async fn start_bot(mut client: Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
