//! Lavalink event hooks.
//!
//! Registered on the Lavalink client at startup. The hooks reach shared state through
//! [`MusicHookData`] on the client and [`PlayerData`] on each player context.

use lavalink_rs::client::LavalinkClient;
use lavalink_rs::hook;
use lavalink_rs::model::events::{self, TrackEndReason};
use lavalink_rs::model::track::{TrackData, TrackLoadData};
use lavalink_rs::player_context::PlayerContext;
use serenity::all::{CreateMessage, GuildId};
use std::collections::HashSet;

use crate::data::music_settings::MusicSettingsRepository;
use crate::error::AppError;
use crate::service::music::autoplay::{split_artist_title, AutoplayService, MAX_AUTOPLAY_ATTEMPTS};
use crate::service::music::player::{MusicHookData, PlayerData};
use crate::util::embed;
use crate::util::time::format_track_time;

/// Builds the event table registered on the Lavalink client.
pub fn lavalink_events() -> events::Events {
    events::Events {
        ready: Some(ready_event),
        track_start: Some(track_start),
        track_end: Some(track_end),
        track_exception: Some(track_exception),
        ..Default::default()
    }
}

#[hook]
pub async fn ready_event(client: LavalinkClient, session_id: String, _event: &events::Ready) {
    // Players from a previous session point at dead voice connections.
    if let Err(e) = client.delete_all_player_contexts().await {
        tracing::error!("Failed to clear stale Lavalink players: {:?}", e);
    }

    tracing::info!("Lavalink node ready, session {}", session_id);
}

#[hook]
pub async fn track_start(client: LavalinkClient, _session_id: String, event: &events::TrackStart) {
    let Some(player) = client.get_player_context(event.guild_id) else {
        return;
    };

    let info = &event.track.info;
    let title = match &info.uri {
        Some(uri) => format!("[{}]({})", info.title, uri),
        None => info.title.clone(),
    };
    let description = if info.is_stream {
        format!("{} by {} (live)", title, info.author)
    } else {
        format!(
            "{} by {} `{}`",
            title,
            info.author,
            format_track_time(info.length)
        )
    };

    announce(&player, "Now playing", description).await;
}

#[hook]
pub async fn track_end(client: LavalinkClient, _session_id: String, event: &events::TrackEnd) {
    // Skips and stops are handled by the command that caused them.
    if !matches!(
        event.reason,
        TrackEndReason::Finished | TrackEndReason::LoadFailed
    ) {
        return;
    }

    let Some(player) = client.get_player_context(event.guild_id) else {
        return;
    };

    let data = match client.data::<MusicHookData>() {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Lavalink client is missing its hook data: {:?}", e);
            return;
        }
    };

    if let Err(e) = play_next(&client, &data, &player, event.guild_id.0, &event.track).await {
        tracing::error!(
            "Failed to advance queue in guild {}: {:?}",
            event.guild_id.0,
            e
        );
    }
}

#[hook]
pub async fn track_exception(
    _client: LavalinkClient,
    _session_id: String,
    event: &events::TrackException,
) {
    tracing::warn!(
        "Track '{}' failed in guild {}: {:?}",
        event.track.info.title,
        event.guild_id.0,
        event.exception
    );
}

/// Starts the next queued track, falling back to autoplay when the queue ran dry.
async fn play_next(
    client: &LavalinkClient,
    data: &MusicHookData,
    player: &PlayerContext,
    guild_id: u64,
    finished: &TrackData,
) -> Result<(), AppError> {
    let settings = MusicSettingsRepository::new(&data.db)
        .get_or_default(guild_id)
        .await?;

    let next = data
        .queues
        .get_mut(&guild_id)
        .and_then(|mut queue| queue.advance(settings.repeat_mode).map(|q| q.track.clone()));

    if let Some(track) = next {
        player.play_now(&track).await?;
        return Ok(());
    }

    let autoplay_key = data
        .lastfm_api_key
        .as_deref()
        .filter(|_| settings.autoplay_amount > 0);

    if let Some(api_key) = autoplay_key {
        let added = queue_similar_tracks(
            client,
            data,
            guild_id,
            finished,
            settings.autoplay_amount as usize,
            api_key,
        )
        .await?;

        tracing::debug!("Autoplay queued {} tracks in guild {}", added, guild_id);

        let next = data
            .queues
            .get_mut(&guild_id)
            .and_then(|mut queue| queue.start_if_idle().map(|q| q.track.clone()));

        if let Some(track) = next {
            player.play_now(&track).await?;
            return Ok(());
        }
    }

    announce(player, "Queue finished", "Add more tracks with `play`.".to_string()).await;

    Ok(())
}

/// Queues up to `amount` tracks similar to `finished` that are not already queued.
///
/// Candidates that fail to load or duplicate a queued track count as a failed attempt;
/// the search gives up after [`MAX_AUTOPLAY_ATTEMPTS`] failures.
async fn queue_similar_tracks(
    client: &LavalinkClient,
    data: &MusicHookData,
    guild_id: u64,
    finished: &TrackData,
    amount: usize,
    api_key: &str,
) -> Result<usize, AppError> {
    let (artist, title) = split_artist_title(&finished.info.author, &finished.info.title);

    let candidates = AutoplayService::new(&data.http_client, api_key)
        .similar_tracks(&artist, &title, amount + MAX_AUTOPLAY_ATTEMPTS)
        .await?;

    let mut known: HashSet<String> = data
        .queues
        .get(&guild_id)
        .map(|queue| queue.iter().map(|q| q.track.info.identifier.clone()).collect())
        .unwrap_or_default();
    known.insert(finished.info.identifier.clone());

    let mut added = 0;
    let mut failures = 0;

    for candidate in candidates {
        if added >= amount || failures >= MAX_AUTOPLAY_ATTEMPTS {
            break;
        }

        let track = match client
            .load_tracks(GuildId::new(guild_id), &candidate.search_query())
            .await
        {
            Ok(loaded) => match loaded.data {
                Some(TrackLoadData::Search(results)) => results.into_iter().next(),
                Some(TrackLoadData::Track(track)) => Some(track),
                _ => None,
            },
            Err(e) => {
                tracing::warn!("Autoplay search '{}' failed: {:?}", candidate.search_query(), e);
                None
            }
        };

        let Some(track) = track else {
            failures += 1;
            continue;
        };

        if !known.insert(track.info.identifier.clone()) {
            tracing::debug!("Autoplay skipped already queued '{}'", track.info.title);
            failures += 1;
            continue;
        }

        data.queues.entry(guild_id).or_default().enqueue(track, None);
        added += 1;
    }

    Ok(added)
}

async fn announce(player: &PlayerContext, title: &str, description: String) {
    let Ok(player_data) = player.data::<PlayerData>() else {
        return;
    };

    let message = CreateMessage::new().embed(
        embed::music_embed()
            .title(title)
            .description(description),
    );

    if let Err(e) = player_data
        .text_channel_id
        .send_message(&player_data.http, message)
        .await
    {
        tracing::warn!("Failed to post music announcement: {:?}", e);
    }
}
