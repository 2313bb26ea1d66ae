//! Per-guild settings shared by several feature modules.

use std::fmt;
use std::str::FromStr;

/// What happens to warnings once they are older than `warn_expire_hours`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnExpireAction {
    /// Mark expired warnings as forgiven, keeping them in the log.
    Clear,
    /// Remove expired warnings entirely.
    Delete,
}

impl WarnExpireAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for WarnExpireAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarnExpireAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "delete" => Ok(Self::Delete),
            other => Err(format!("Unknown warning expiry action '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuildConfig {
    pub guild_id: u64,
    pub message_count_enabled: bool,
    pub link_preview_enabled: bool,
    /// Hours after which warnings expire, 0 disables expiry.
    pub warn_expire_hours: u32,
    pub warn_expire_action: WarnExpireAction,
    pub ai_channel_id: Option<u64>,
    pub ai_system_prompt: Option<String>,
}

impl GuildConfig {
    /// Settings used for guilds that have never changed anything.
    pub fn default_for(guild_id: u64) -> Self {
        Self {
            guild_id,
            message_count_enabled: false,
            link_preview_enabled: false,
            warn_expire_hours: 0,
            warn_expire_action: WarnExpireAction::Clear,
            ai_channel_id: None,
            ai_system_prompt: None,
        }
    }

    pub fn from_entity(entity: entity::guild_config::Model) -> Self {
        Self {
            guild_id: entity.guild_id as u64,
            message_count_enabled: entity.message_count_enabled,
            link_preview_enabled: entity.link_preview_enabled,
            warn_expire_hours: entity.warn_expire_hours.max(0) as u32,
            warn_expire_action: entity
                .warn_expire_action
                .parse()
                .unwrap_or(WarnExpireAction::Clear),
            ai_channel_id: entity.ai_channel_id.map(|id| id as u64),
            ai_system_prompt: entity.ai_system_prompt,
        }
    }
}

/// Partial update of a guild's settings. `None` leaves the field unchanged.
///
/// The nested options on `ai_channel_id`/`ai_system_prompt` distinguish "leave as is"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateGuildConfigParam {
    pub link_preview_enabled: Option<bool>,
    pub warn_expire_hours: Option<u32>,
    pub warn_expire_action: Option<WarnExpireAction>,
    pub ai_channel_id: Option<Option<u64>>,
    pub ai_system_prompt: Option<Option<String>>,
}
