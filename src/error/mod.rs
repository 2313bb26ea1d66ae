//! Error types and user-facing error mapping.
//!
//! `AppError` is the top-level error used by services and commands. Domain-specific
//! errors live in their own submodules and convert into `AppError` via `#[from]`.
//! Commands surface errors to Discord through [`AppError::user_message`] while the
//! full error is logged.

pub mod config;
pub mod draft;
pub mod internal;
pub mod time;

use thiserror::Error;

use crate::error::{
    config::ConfigError, draft::DraftError, internal::InternalError, time::TimeParseError,
};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the bot. Most variants use
/// `#[from]` for automatic error conversion so that `?` can be used throughout the
/// service and data layers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client request error from reqwest.
    ///
    /// Occurs when last.fm or AI provider calls fail.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Lavalink node or player error.
    #[error(transparent)]
    LavalinkErr(#[from] lavalink_rs::error::LavalinkError),

    /// Failed to join a voice channel through songbird.
    #[error(transparent)]
    VoiceJoinErr(#[from] songbird::error::JoinError),

    /// Internal invariant violated.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// User supplied a duration that could not be parsed.
    #[error(transparent)]
    TimeParseErr(#[from] TimeParseError),

    /// Ticket button wizard error.
    #[error(transparent)]
    DraftErr(#[from] DraftError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid request error.
    ///
    /// # Fields
    /// - Message describing what was invalid about the request
    #[error("{0}")]
    BadRequest(String),

    /// The invoking member (or the bot) is not allowed to perform the action.
    #[error("{0}")]
    PermissionDenied(String),

    /// Internal error with custom message.
    ///
    /// The message is logged but a generic message is shown to the user.
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Short message safe to show in Discord.
    ///
    /// Validation style errors pass their text through; infrastructure errors are
    /// replaced by a generic message so that internals do not leak into channels.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::BadRequest(msg) | Self::PermissionDenied(msg) => {
                msg.clone()
            }
            Self::TimeParseErr(err) => err.to_string(),
            Self::DraftErr(err) => err.to_string(),
            Self::DiscordErr(_) => {
                "Failed to communicate with Discord. Please try again.".to_string()
            }
            Self::DbErr(_) => "A database error occurred. Please try again later.".to_string(),
            Self::LavalinkErr(_) => "The music node could not complete that request.".to_string(),
            Self::VoiceJoinErr(_) => "I couldn't join your voice channel.".to_string(),
            Self::ReqwestErr(_) => "An external service did not respond.".to_string(),
            Self::ConfigErr(_)
            | Self::SchedulerErr(_)
            | Self::InternalErr(_)
            | Self::InternalError(_) => "Something went wrong on my side.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_validation_messages_through() {
        let err = AppError::BadRequest("Volume must be between 0 and 200".to_string());
        assert_eq!(err.user_message(), "Volume must be between 0 and 200");
    }

    #[test]
    fn hides_database_details() {
        let err = AppError::DbErr(sea_orm::DbErr::Custom("disk I/O error".to_string()));
        assert!(!err.user_message().contains("disk"));
    }

    #[test]
    fn reports_draft_errors_verbatim() {
        let err: AppError = DraftError::MissingField("label").into();
        assert_eq!(err.user_message(), "The ticket button is missing its label");
    }
}
