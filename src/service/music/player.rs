//! Lavalink-backed music player.
//!
//! Audio is streamed by the Lavalink node; this service only owns the per-guild
//! queues and decides which track plays next. Voice gateway joins go through
//! songbird, whose connection info is handed to the Lavalink player context.

use dashmap::DashMap;
use lavalink_rs::client::LavalinkClient;
use lavalink_rs::model::player::{Equalizer, Filters, Timescale};
use lavalink_rs::model::track::{TrackData, TrackLoadData};
use lavalink_rs::player_context::PlayerContext;
use sea_orm::DatabaseConnection;
use serenity::all::{ChannelId, GuildId, Http};
use songbird::Songbird;
use std::sync::Arc;
use std::time::Duration;

use crate::data::music_settings::MusicSettingsRepository;
use crate::error::AppError;
use crate::model::music::{
    FilterPreset, MusicSettings, RepeatMode, UpdateMusicSettingsParam, MAX_AUTOPLAY_AMOUNT,
    MAX_VOLUME,
};
use crate::service::music::queue::MusicQueue;

pub type GuildQueues = Arc<DashMap<u64, MusicQueue<TrackData>>>;

/// Per-player data attached to the Lavalink player context.
pub struct PlayerData {
    /// Channel track announcements are posted to.
    pub text_channel_id: ChannelId,
    pub http: Arc<Http>,
}

/// Data attached to the Lavalink client, available inside event hooks.
pub struct MusicHookData {
    pub db: DatabaseConnection,
    pub queues: GuildQueues,
    pub http_client: reqwest::Client,
    pub lastfm_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayOutcome {
    /// Nothing was playing, the track started right away.
    Started { title: String },
    Queued { title: String, position: usize },
    Playlist { name: String, count: usize },
}

#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub track: TrackData,
    pub position_ms: u64,
    pub paused: bool,
    pub requester: Option<u64>,
}

/// Lavalink identifier for a user query. URLs are loaded directly, anything else is searched.
pub fn load_identifier(query: &str) -> String {
    let query = query.trim();
    if query.starts_with("http://") || query.starts_with("https://") {
        query.to_string()
    } else {
        format!("ytsearch:{}", query)
    }
}

/// Lavalink filters applied for a preset.
pub fn filters_for(preset: FilterPreset) -> Filters {
    match preset {
        FilterPreset::Nightcore => Filters {
            timescale: Some(Timescale {
                speed: Some(1.25),
                pitch: Some(1.25),
                rate: Some(1.0),
            }),
            ..Default::default()
        },
        FilterPreset::BassBoost => Filters {
            equalizer: Some(
                [0.2, 0.15, 0.1, 0.05, 0.0]
                    .into_iter()
                    .enumerate()
                    .map(|(band, gain)| Equalizer {
                        band: band as u8,
                        gain,
                    })
                    .collect(),
            ),
            ..Default::default()
        },
        FilterPreset::Reset => Filters::default(),
    }
}

pub struct MusicPlayerService<'a> {
    lavalink: &'a LavalinkClient,
    songbird: &'a Songbird,
    queues: &'a GuildQueues,
    db: &'a DatabaseConnection,
}

impl<'a> MusicPlayerService<'a> {
    pub fn new(
        lavalink: &'a LavalinkClient,
        songbird: &'a Songbird,
        queues: &'a GuildQueues,
        db: &'a DatabaseConnection,
    ) -> Self {
        Self {
            lavalink,
            songbird,
            queues,
            db,
        }
    }

    /// Joins a voice channel and creates the Lavalink player for the guild.
    ///
    /// Joining while a player already exists is a no-op. The stored guild volume is
    /// applied to new players.
    pub async fn join(
        &self,
        guild_id: u64,
        voice_channel_id: u64,
        text_channel_id: u64,
        http: Arc<Http>,
    ) -> Result<(), AppError> {
        if self.lavalink.get_player_context(GuildId::new(guild_id)).is_some() {
            return Ok(());
        }

        let (connection_info, _call) = self
            .songbird
            .join_gateway(GuildId::new(guild_id), ChannelId::new(voice_channel_id))
            .await?;

        let player = self
            .lavalink
            .create_player_context_with_data::<PlayerData>(
                GuildId::new(guild_id),
                connection_info,
                Arc::new(PlayerData {
                    text_channel_id: ChannelId::new(text_channel_id),
                    http,
                }),
            )
            .await?;

        let settings = MusicSettingsRepository::new(self.db)
            .get_or_default(guild_id)
            .await?;
        player.set_volume(settings.volume).await?;

        self.queues.entry(guild_id).or_default();

        tracing::info!(
            "Joined voice channel {} in guild {}",
            voice_channel_id,
            guild_id
        );

        Ok(())
    }

    /// Resolves a query and queues the result, starting playback when idle.
    ///
    /// # Returns
    /// - `Ok(PlayOutcome)` - What was queued
    /// - `Err(AppError::NotFound)` - Not connected, or the query matched nothing
    /// - `Err(AppError::LavalinkErr)` - The node failed to load or play
    pub async fn play(
        &self,
        guild_id: u64,
        query: &str,
        requester: u64,
    ) -> Result<PlayOutcome, AppError> {
        let player = self.player(guild_id)?;

        let loaded = self
            .lavalink
            .load_tracks(GuildId::new(guild_id), &load_identifier(query))
            .await?;

        let (tracks, playlist_name) = match loaded.data {
            Some(TrackLoadData::Track(track)) => (vec![track], None),
            Some(TrackLoadData::Search(results)) => {
                (results.into_iter().take(1).collect(), None)
            }
            Some(TrackLoadData::Playlist(playlist)) => {
                (playlist.tracks, Some(playlist.info.name))
            }
            Some(TrackLoadData::Error(err)) => {
                tracing::warn!("Lavalink failed to load '{}': {:?}", query, err);
                return Err(AppError::NotFound(format!(
                    "I couldn't load anything for `{}`",
                    query
                )));
            }
            None => (Vec::new(), None),
        };

        let Some(first_title) = tracks.first().map(|t| t.info.title.clone()) else {
            return Err(AppError::NotFound(format!(
                "No results found for `{}`",
                query
            )));
        };
        let count = tracks.len();

        let (position, to_start) = {
            let mut queue = self.queues.entry(guild_id).or_default();
            let position = queue.enqueue_many(tracks, Some(requester));
            let to_start = queue.start_if_idle().map(|q| q.track.clone());
            (position, to_start)
        };

        let started = to_start.is_some();
        if let Some(track) = to_start {
            player.play_now(&track).await?;
        }

        Ok(match playlist_name {
            Some(name) => PlayOutcome::Playlist { name, count },
            None if started => PlayOutcome::Started { title: first_title },
            None => PlayOutcome::Queued {
                title: first_title,
                position,
            },
        })
    }

    pub async fn set_paused(&self, guild_id: u64, paused: bool) -> Result<(), AppError> {
        self.player(guild_id)?.set_pause(paused).await?;
        Ok(())
    }

    /// Skips the playing track.
    ///
    /// # Returns
    /// - `Ok(Some(title))` - Title of the track that started
    /// - `Ok(None)` - The queue was empty and playback stopped
    pub async fn skip(&self, guild_id: u64) -> Result<Option<String>, AppError> {
        let player = self.player(guild_id)?;
        let settings = MusicSettingsRepository::new(self.db)
            .get_or_default(guild_id)
            .await?;

        let next = self
            .queues
            .get_mut(&guild_id)
            .and_then(|mut queue| queue.skip(settings.repeat_mode).map(|q| q.track.clone()));

        match next {
            Some(track) => {
                player.play_now(&track).await?;
                Ok(Some(track.info.title))
            }
            None => {
                player.stop_now().await?;
                Ok(None)
            }
        }
    }

    /// Jumps to an upcoming position and plays it.
    pub async fn jump(&self, guild_id: u64, position: usize) -> Result<String, AppError> {
        let player = self.player(guild_id)?;

        let next = self
            .queues
            .get_mut(&guild_id)
            .and_then(|mut queue| queue.jump(position).map(|q| q.track.clone()))
            .ok_or_else(|| {
                AppError::BadRequest(format!("There is no track at position {}", position))
            })?;

        player.play_now(&next).await?;

        Ok(next.info.title)
    }

    /// Stops playback and clears the queue, staying connected.
    pub async fn stop(&self, guild_id: u64) -> Result<(), AppError> {
        let player = self.player(guild_id)?;

        if let Some(mut queue) = self.queues.get_mut(&guild_id) {
            queue.reset();
        }
        player.stop_now().await?;

        Ok(())
    }

    /// Seeks within the playing track.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Nothing is playing or the position is past the end
    pub async fn seek(&self, guild_id: u64, position: Duration) -> Result<(), AppError> {
        let player = self.player(guild_id)?;

        let Some(track) = player.get_player().await?.track else {
            return Err(AppError::BadRequest("Nothing is playing".to_string()));
        };
        if track.info.is_stream {
            return Err(AppError::BadRequest("Streams can't be seeked".to_string()));
        }
        if position.as_millis() as u64 >= track.info.length {
            return Err(AppError::BadRequest(
                "That position is past the end of the track".to_string(),
            ));
        }

        player.set_position(position).await?;

        Ok(())
    }

    /// Stores the guild volume and applies it to the active player.
    pub async fn set_volume(&self, guild_id: u64, volume: u16) -> Result<(), AppError> {
        if volume > MAX_VOLUME {
            return Err(AppError::BadRequest(format!(
                "Volume must be between 0 and {}",
                MAX_VOLUME
            )));
        }

        MusicSettingsRepository::new(self.db)
            .update(
                guild_id,
                UpdateMusicSettingsParam {
                    volume: Some(volume),
                    ..Default::default()
                },
            )
            .await?;

        if let Some(player) = self.lavalink.get_player_context(GuildId::new(guild_id)) {
            player.set_volume(volume).await?;
        }

        Ok(())
    }

    pub async fn settings(&self, guild_id: u64) -> Result<MusicSettings, AppError> {
        Ok(MusicSettingsRepository::new(self.db)
            .get_or_default(guild_id)
            .await?)
    }

    pub async fn set_repeat_mode(&self, guild_id: u64, mode: RepeatMode) -> Result<(), AppError> {
        self.update_settings(
            guild_id,
            UpdateMusicSettingsParam {
                repeat_mode: Some(mode),
                ..Default::default()
            },
        )
        .await
    }

    /// Sets how many similar tracks are queued when the queue runs dry, 0 turns autoplay off.
    pub async fn set_autoplay(&self, guild_id: u64, amount: u8) -> Result<(), AppError> {
        if amount > MAX_AUTOPLAY_AMOUNT {
            return Err(AppError::BadRequest(format!(
                "Autoplay can queue at most {} tracks",
                MAX_AUTOPLAY_AMOUNT
            )));
        }

        self.update_settings(
            guild_id,
            UpdateMusicSettingsParam {
                autoplay_amount: Some(amount),
                ..Default::default()
            },
        )
        .await
    }

    /// Restricts music commands to one channel, or lifts the restriction.
    pub async fn set_music_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<(), AppError> {
        self.update_settings(
            guild_id,
            UpdateMusicSettingsParam {
                music_channel_id: Some(channel_id),
                ..Default::default()
            },
        )
        .await
    }

    async fn update_settings(
        &self,
        guild_id: u64,
        param: UpdateMusicSettingsParam,
    ) -> Result<(), AppError> {
        MusicSettingsRepository::new(self.db)
            .update(guild_id, param)
            .await?;

        Ok(())
    }

    pub async fn apply_filter(&self, guild_id: u64, preset: FilterPreset) -> Result<(), AppError> {
        self.player(guild_id)?.set_filters(filters_for(preset)).await?;
        Ok(())
    }

    /// Destroys the player, leaves the voice channel and drops the queue.
    pub async fn leave(&self, guild_id: u64) -> Result<(), AppError> {
        if self.lavalink.get_player_context(GuildId::new(guild_id)).is_none() {
            return Err(AppError::BadRequest(
                "I'm not in a voice channel".to_string(),
            ));
        }

        self.lavalink.delete_player(GuildId::new(guild_id)).await?;

        if let Err(e) = self.songbird.remove(GuildId::new(guild_id)).await {
            tracing::debug!("Songbird call for guild {} already gone: {:?}", guild_id, e);
        }

        self.queues.remove(&guild_id);

        tracing::info!("Left voice in guild {}", guild_id);

        Ok(())
    }

    pub async fn now_playing(&self, guild_id: u64) -> Result<Option<NowPlaying>, AppError> {
        let player = self.player(guild_id)?.get_player().await?;

        let Some(track) = player.track else {
            return Ok(None);
        };

        let requester = self
            .queues
            .get(&guild_id)
            .and_then(|queue| queue.current().and_then(|q| q.requester));

        Ok(Some(NowPlaying {
            track,
            position_ms: player.state.position,
            paused: player.paused,
            requester,
        }))
    }

    /// Runs `f` against the guild queue, creating an empty one if needed.
    pub fn with_queue<R>(
        &self,
        guild_id: u64,
        f: impl FnOnce(&mut MusicQueue<TrackData>) -> R,
    ) -> R {
        let mut queue = self.queues.entry(guild_id).or_default();
        f(&mut queue)
    }

    fn player(&self, guild_id: u64) -> Result<PlayerContext, AppError> {
        self.lavalink
            .get_player_context(GuildId::new(guild_id))
            .ok_or_else(|| AppError::BadRequest("I'm not in a voice channel".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_loaded_directly() {
        assert_eq!(
            load_identifier(" https://youtu.be/dQw4w9WgXcQ "),
            "https://youtu.be/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn plain_queries_are_searched() {
        assert_eq!(load_identifier("never gonna give you up"), "ytsearch:never gonna give you up");
    }

    #[test]
    fn nightcore_speeds_up_and_raises_pitch() {
        let timescale = filters_for(FilterPreset::Nightcore).timescale.unwrap();

        assert_eq!(timescale.speed, Some(1.25));
        assert_eq!(timescale.pitch, Some(1.25));
        assert_eq!(timescale.rate, Some(1.0));
    }

    #[test]
    fn bass_boost_raises_low_bands() {
        let bands = filters_for(FilterPreset::BassBoost).equalizer.unwrap();

        assert_eq!(bands.len(), 5);
        assert_eq!(bands[0].band, 0);
        assert!(bands[0].gain > bands[3].gain);
    }

    #[test]
    fn reset_clears_every_filter() {
        let filters = filters_for(FilterPreset::Reset);

        assert!(filters.timescale.is_none());
        assert!(filters.equalizer.is_none());
    }
}
