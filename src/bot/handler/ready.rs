//! Ready event handler for bot initialization.
//!
//! The ready event fires after every (re)connect. Repeater runners are only started
//! the first time, later ready events find them already running.

use chrono::Utc;
use serenity::all::{ActivityData, Context, Ready};

use crate::state::AppState;

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `state` - Shared application state
/// - `ctx` - Discord context for setting activity status
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord in {} guilds",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::listening("/help")));

    if state.repeaters.is_empty() {
        if let Err(e) = state
            .repeaters
            .start_all(&state.db, state.discord_http.clone())
            .await
        {
            tracing::error!("Failed to start repeaters: {:?}", e);
        }
    }

    let pruned = state.drafts.prune(Utc::now());
    if pruned > 0 {
        tracing::debug!("Pruned {} expired ticket button drafts", pruned);
    }
}
