//! Application state shared across commands and gateway event handlers.
//!
//! This module defines the `AppState` struct which holds every shared resource the bot
//! needs. The state is built once during startup, handed to the poise framework as its
//! user data and to the raw event handler, and cloned wherever a background task needs
//! it.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - HTTP clients for Discord and for external APIs (last.fm, AI providers)
//! - Lavalink and songbird clients for music playback
//! - In-memory stores for snipes, wizard drafts, mass nickname runs and guild settings
//! - Handles to the message count worker and the repeater runners

use lavalink_rs::client::LavalinkClient;
use sea_orm::DatabaseConnection;
use serenity::http::Http;
use songbird::Songbird;
use std::sync::Arc;

use crate::config::AiConfig;
use crate::service::guild_config::GuildConfigCache;
use crate::service::message_count::MessageCountHandle;
use crate::service::moderation::massnick::MassNickTracker;
use crate::service::music::player::GuildQueues;
use crate::service::repeater::RepeaterRunners;
use crate::service::snipe::SnipeCache;
use crate::service::ticket::draft::DraftStore;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: connection pools, clients and stores share their
/// inner data through `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// HTTP client for external API requests.
    ///
    /// Configured without redirects. Used for last.fm lookups and AI providers.
    pub http_client: reqwest::Client,

    /// Discord HTTP client for bot API operations outside of a command context,
    /// such as repeaters and mass nickname runs.
    pub discord_http: Arc<Http>,

    /// AI provider credentials, `None` when the relay is not configured.
    pub ai: Option<AiConfig>,

    /// Lavalink client streaming audio for every guild.
    pub lavalink: LavalinkClient,

    /// Voice gateway manager used to join channels before handing over to Lavalink.
    pub songbird: Arc<Songbird>,

    /// Per-guild music queues, shared with the Lavalink event hooks.
    pub queues: GuildQueues,

    /// Handle to the message count batching worker.
    pub message_count: MessageCountHandle,

    /// Recently deleted and edited messages per channel.
    pub snipes: SnipeCache,

    /// Ticket button wizard drafts per user.
    pub drafts: DraftStore,

    /// Mass nickname progress per guild.
    pub massnick: MassNickTracker,

    /// Running repeater tasks by repeater id.
    pub repeaters: RepeaterRunners,

    /// Guild settings read on every message.
    pub guild_configs: GuildConfigCache,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// In-memory stores start empty.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `http_client` - HTTP client for external API requests
    /// - `discord_http` - Discord HTTP client for bot operations
    /// - `ai` - AI provider credentials, if configured
    /// - `lavalink` - Lavalink client
    /// - `songbird` - Voice gateway manager registered with the Discord client
    /// - `queues` - Music queues, the same map given to the Lavalink hooks
    /// - `message_count` - Handle of the started message count worker
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        discord_http: Arc<Http>,
        ai: Option<AiConfig>,
        lavalink: LavalinkClient,
        songbird: Arc<Songbird>,
        queues: GuildQueues,
        message_count: MessageCountHandle,
    ) -> Self {
        Self {
            db,
            http_client,
            discord_http,
            ai,
            lavalink,
            songbird,
            queues,
            message_count,
            snipes: SnipeCache::new(),
            drafts: DraftStore::new(),
            massnick: MassNickTracker::new(),
            repeaters: RepeaterRunners::new(),
            guild_configs: GuildConfigCache::new(),
        }
    }
}
