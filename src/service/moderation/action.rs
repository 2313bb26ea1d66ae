//! Discord calls behind moderation commands and automatic punishments.

use chrono::Utc;
use serenity::all::{CreateMessage, EditMember, GuildId, Http, RoleId, Timestamp, UserId};

use crate::error::{internal::InternalError, AppError};
use crate::model::moderation::{AppliedPunishment, Punishment};

/// Days of messages removed when a softban bans the member.
const SOFTBAN_DELETE_DAYS: u8 = 7;

/// Discord refuses to delete more than a week of messages on ban.
pub const MAX_BAN_DELETE_DAYS: u8 = 7;

pub struct ModerationActionService<'a> {
    http: &'a Http,
    guild_id: GuildId,
}

impl<'a> ModerationActionService<'a> {
    pub fn new(http: &'a Http, guild_id: u64) -> Self {
        Self {
            http,
            guild_id: GuildId::new(guild_id),
        }
    }

    /// Tells the member what happened before the action removes them from shared servers.
    ///
    /// Members with closed DMs are common, so failures are only logged.
    pub async fn notify(&self, user_id: u64, text: String) {
        let dm = match UserId::new(user_id).create_dm_channel(self.http).await {
            Ok(dm) => dm,
            Err(e) => {
                tracing::debug!("Could not open DM with {}: {:?}", user_id, e);
                return;
            }
        };

        if let Err(e) = dm.send_message(self.http, CreateMessage::new().content(text)).await {
            tracing::debug!("Could not DM {}: {:?}", user_id, e);
        }
    }

    pub async fn ban(&self, user_id: u64, delete_days: u8, reason: &str) -> Result<(), AppError> {
        if delete_days > MAX_BAN_DELETE_DAYS {
            return Err(AppError::BadRequest(format!(
                "Message deletion is limited to {} days",
                MAX_BAN_DELETE_DAYS
            )));
        }

        self.guild_id
            .ban_with_reason(self.http, UserId::new(user_id), delete_days, reason)
            .await?;

        tracing::info!("Banned {} in guild {}", user_id, self.guild_id);

        Ok(())
    }

    pub async fn unban(&self, user_id: u64) -> Result<(), AppError> {
        self.guild_id.unban(self.http, UserId::new(user_id)).await?;

        tracing::info!("Unbanned {} in guild {}", user_id, self.guild_id);

        Ok(())
    }

    pub async fn kick(&self, user_id: u64, reason: &str) -> Result<(), AppError> {
        self.guild_id
            .kick_with_reason(self.http, UserId::new(user_id), reason)
            .await?;

        tracing::info!("Kicked {} from guild {}", user_id, self.guild_id);

        Ok(())
    }

    /// Bans and immediately unbans to clear the member's recent messages.
    pub async fn softban(&self, user_id: u64, reason: &str) -> Result<(), AppError> {
        let user = UserId::new(user_id);

        self.guild_id
            .ban_with_reason(self.http, user, SOFTBAN_DELETE_DAYS, reason)
            .await?;
        self.guild_id.unban(self.http, user).await?;

        tracing::info!("Softbanned {} in guild {}", user_id, self.guild_id);

        Ok(())
    }

    pub async fn timeout(&self, user_id: u64, duration: chrono::Duration) -> Result<(), AppError> {
        let until = (Utc::now() + duration).timestamp();
        let until = Timestamp::from_unix_timestamp(until).map_err(|e| {
            InternalError::InvalidDiscordTimestamp {
                timestamp: until,
                reason: e.to_string(),
            }
        })?;

        self.guild_id
            .edit_member(
                self.http,
                UserId::new(user_id),
                EditMember::new().disable_communication_until_datetime(until),
            )
            .await?;

        tracing::info!("Timed out {} in guild {} until {}", user_id, self.guild_id, until);

        Ok(())
    }

    pub async fn untimeout(&self, user_id: u64) -> Result<(), AppError> {
        self.guild_id
            .edit_member(
                self.http,
                UserId::new(user_id),
                EditMember::new().enable_communication(),
            )
            .await?;

        Ok(())
    }

    pub async fn add_role(&self, user_id: u64, role_id: u64, reason: &str) -> Result<(), AppError> {
        self.http
            .add_member_role(
                self.guild_id,
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;

        Ok(())
    }

    pub async fn remove_roles(&self, user_id: u64) -> Result<(), AppError> {
        self.guild_id
            .edit_member(
                self.http,
                UserId::new(user_id),
                EditMember::new().roles(Vec::<RoleId>::new()),
            )
            .await?;

        Ok(())
    }

    /// Applies a warning punishment, capturing Discord's error instead of failing.
    pub async fn apply_punishment(&self, user_id: u64, punishment: &Punishment) -> AppliedPunishment {
        let reason = "Automatic warning punishment";

        let result = match punishment {
            Punishment::Timeout { minutes } => {
                self.timeout(user_id, chrono::Duration::minutes(*minutes as i64))
                    .await
            }
            Punishment::Kick => self.kick(user_id, reason).await,
            Punishment::Ban => self.ban(user_id, 0, reason).await,
            Punishment::Softban => self.softban(user_id, reason).await,
            Punishment::AddRole { role_id } => self.add_role(user_id, *role_id, reason).await,
            Punishment::RemoveRoles => self.remove_roles(user_id).await,
        };

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(
                    "Failed to apply {} to {} in guild {}: {:?}",
                    punishment.kind(),
                    user_id,
                    self.guild_id,
                    e
                );
                Some(e.user_message())
            }
        };

        AppliedPunishment {
            punishment: punishment.clone(),
            error,
        }
    }
}
