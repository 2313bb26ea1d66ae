//! Music player settings and repeat modes.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_VOLUME: u16 = 100;
pub const MAX_VOLUME: u16 = 200;
pub const MAX_AUTOPLAY_AMOUNT: u8 = 5;

/// How the queue advances when a track ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Replay the current track.
    Track,
    /// Send finished tracks to the back of the queue.
    Queue,
}

impl RepeatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Track => "track",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "track" | "song" | "one" => Ok(Self::Track),
            "queue" | "all" => Ok(Self::Queue),
            other => Err(format!("Unknown repeat mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MusicSettings {
    pub guild_id: u64,
    pub volume: u16,
    pub repeat_mode: RepeatMode,
    /// Number of similar tracks queued when the queue runs dry, 0 disables autoplay.
    pub autoplay_amount: u8,
    pub music_channel_id: Option<u64>,
}

impl MusicSettings {
    pub fn default_for(guild_id: u64) -> Self {
        Self {
            guild_id,
            volume: DEFAULT_VOLUME,
            repeat_mode: RepeatMode::Off,
            autoplay_amount: 0,
            music_channel_id: None,
        }
    }

    pub fn from_entity(entity: entity::music_settings::Model) -> Self {
        Self {
            guild_id: entity.guild_id as u64,
            volume: entity.volume.clamp(0, MAX_VOLUME as i32) as u16,
            repeat_mode: entity.repeat_mode.parse().unwrap_or_default(),
            autoplay_amount: entity.autoplay_amount.clamp(0, MAX_AUTOPLAY_AMOUNT as i32) as u8,
            music_channel_id: entity.music_channel_id.map(|id| id as u64),
        }
    }
}

/// Partial update of a guild's music settings.
#[derive(Debug, Clone, Default)]
pub struct UpdateMusicSettingsParam {
    pub volume: Option<u16>,
    pub repeat_mode: Option<RepeatMode>,
    pub autoplay_amount: Option<u8>,
    pub music_channel_id: Option<Option<u64>>,
}

/// Audio filter presets offered by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPreset {
    Nightcore,
    BassBoost,
    Reset,
}
