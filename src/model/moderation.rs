//! Domain models for warnings and warning punishments.

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::AppError;

/// Discord caps member timeouts at 28 days.
pub const MAX_TIMEOUT_MINUTES: i32 = 28 * 24 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub id: i32,
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: Option<String>,
    pub forgiven: bool,
    pub forgiven_by: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl Warning {
    pub fn from_entity(entity: entity::warning::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            user_id: entity.user_id as u64,
            moderator_id: entity.moderator_id as u64,
            reason: entity.reason,
            forgiven: entity.forgiven,
            forgiven_by: entity.forgiven_by.map(|id| id as u64),
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateWarningParam {
    pub guild_id: u64,
    pub user_id: u64,
    pub moderator_id: u64,
    pub reason: Option<String>,
}

/// One page of a member's active warnings, newest first.
#[derive(Debug, Clone)]
pub struct WarningPage {
    pub warnings: Vec<Warning>,
    pub page: u64,
    pub total: u64,
    pub total_pages: u64,
}

/// Which of a member's active warnings to forgive or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSelector {
    /// 1-based position in the warn log (newest first).
    Index(usize),
    All,
}

/// Action applied automatically when a member reaches a warning count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Punishment {
    Timeout { minutes: i32 },
    Kick,
    Ban,
    Softban,
    AddRole { role_id: u64 },
    RemoveRoles,
}

impl Punishment {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::Softban => "softban",
            Self::AddRole { .. } => "addrole",
            Self::RemoveRoles => "removeroles",
        }
    }

    /// Builds a punishment from its stored or user-supplied parts, validating the
    /// extra data each kind needs.
    pub fn from_parts(
        kind: &str,
        duration_minutes: Option<i32>,
        role_id: Option<u64>,
    ) -> Result<Self, AppError> {
        match kind.to_ascii_lowercase().as_str() {
            "timeout" => {
                let minutes = duration_minutes.ok_or_else(|| {
                    AppError::BadRequest("A timeout punishment needs a duration".to_string())
                })?;
                if minutes <= 0 || minutes > MAX_TIMEOUT_MINUTES {
                    return Err(AppError::BadRequest(
                        "Timeouts must be between 1 minute and 28 days".to_string(),
                    ));
                }
                Ok(Self::Timeout { minutes })
            }
            "kick" => Ok(Self::Kick),
            "ban" => Ok(Self::Ban),
            "softban" => Ok(Self::Softban),
            "addrole" => {
                let role_id = role_id.ok_or_else(|| {
                    AppError::BadRequest("An add role punishment needs a role".to_string())
                })?;
                Ok(Self::AddRole { role_id })
            }
            "removeroles" => Ok(Self::RemoveRoles),
            other => Err(AppError::BadRequest(format!(
                "Unknown punishment '{}'",
                other
            ))),
        }
    }

    pub fn duration_minutes(&self) -> Option<i32> {
        match self {
            Self::Timeout { minutes } => Some(*minutes),
            _ => None,
        }
    }

    pub fn role_id(&self) -> Option<u64> {
        match self {
            Self::AddRole { role_id } => Some(*role_id),
            _ => None,
        }
    }
}

impl fmt::Display for Punishment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { minutes } => write!(f, "timeout for {} minutes", minutes),
            Self::Kick => f.write_str("kick"),
            Self::Ban => f.write_str("ban"),
            Self::Softban => f.write_str("softban"),
            Self::AddRole { role_id } => write!(f, "add role <@&{}>", role_id),
            Self::RemoveRoles => f.write_str("remove all roles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarnPunishment {
    pub id: i32,
    pub guild_id: u64,
    pub count: u32,
    pub punishment: Punishment,
}

impl WarnPunishment {
    pub fn from_entity(entity: entity::warn_punishment::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            count: entity.count.max(0) as u32,
            punishment: Punishment::from_parts(
                &entity.punishment,
                entity.duration_minutes,
                entity.role_id.map(|id| id as u64),
            )?,
        })
    }
}

/// Result of applying the configured punishment after a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPunishment {
    pub punishment: Punishment,
    /// Discord's error text when applying failed.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WarnOutcome {
    pub warning: Warning,
    /// Active (not forgiven) warnings including the new one.
    pub warning_count: u64,
    pub punishment: Option<AppliedPunishment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_requires_duration() {
        assert!(Punishment::from_parts("timeout", None, None).is_err());
        assert_eq!(
            Punishment::from_parts("timeout", Some(60), None).unwrap(),
            Punishment::Timeout { minutes: 60 }
        );
    }

    #[test]
    fn timeout_is_capped_at_28_days() {
        assert!(Punishment::from_parts("timeout", Some(MAX_TIMEOUT_MINUTES), None).is_ok());
        assert!(Punishment::from_parts("timeout", Some(MAX_TIMEOUT_MINUTES + 1), None).is_err());
    }

    #[test]
    fn add_role_requires_role() {
        assert!(Punishment::from_parts("addrole", None, None).is_err());
        assert_eq!(
            Punishment::from_parts("AddRole", None, Some(42)).unwrap(),
            Punishment::AddRole { role_id: 42 }
        );
    }

    #[test]
    fn kind_round_trips_through_from_parts() {
        for punishment in [
            Punishment::Kick,
            Punishment::Ban,
            Punishment::Softban,
            Punishment::RemoveRoles,
        ] {
            let parsed = Punishment::from_parts(punishment.kind(), None, None).unwrap();
            assert_eq!(parsed, punishment);
        }
    }
}
