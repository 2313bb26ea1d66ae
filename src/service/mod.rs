//! Business logic between the Discord layer and the repositories.
//!
//! Services are short-lived structs borrowing the database connection (and, where a
//! feature needs them, the Discord HTTP client or an in-memory store from
//! [`AppState`](crate::state::AppState)). Commands and event handlers construct them
//! per call. Validation lives here so that commands stay thin and errors reach the user
//! through [`AppError::user_message`](crate::error::AppError::user_message).

pub mod ai;
pub mod auto_publish;
pub mod guild_config;
pub mod join_leave;
pub mod link_preview;
pub mod message_count;
pub mod moderation;
pub mod music;
pub mod reminder;
pub mod repeater;
pub mod snipe;
pub mod ticket;
