//! Discord bot: gateway client, event handlers and commands.
//!
//! Commands are poise slash/prefix commands under [`command`]. Gateway events the
//! command framework does not cover (member joins, message side effects, ticket
//! buttons and the wizard) go through the raw serenity [`handler::Handler`]. Both share
//! the same [`AppState`](crate::state::AppState).
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild, channel and role data used by hierarchy checks
//! - `GUILD_MESSAGES` - Messages for counting, snipes, auto-publish and link previews
//! - `GUILD_MEMBERS` - Member joins and leaves (privileged intent)
//! - `MESSAGE_CONTENT` - Message text for prefix commands and the AI relay (privileged intent)
//! - `GUILD_VOICE_STATES` - Voice connection info handed to Lavalink
//!
//! Note: `GUILD_MEMBERS` and `MESSAGE_CONTENT` are privileged intents and must be
//! explicitly enabled in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
