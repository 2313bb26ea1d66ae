//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! feature of the bot. Repositories use SeaORM entity models internally and return domain
//! models to keep the entity crate out of the service and command layers. Read-modify-write
//! operations that must not interleave run inside a database transaction here as well.

pub mod ai_conversation;
pub mod auto_publish;
pub mod guild_config;
pub mod join_leave;
pub mod message_count;
pub mod music_settings;
pub mod reminder;
pub mod repeater;
pub mod ticket;
pub mod ticket_button;
pub mod ticket_case;
pub mod ticket_panel;
pub mod ticket_select_menu;
pub mod warn_punishment;
pub mod warning;

#[cfg(test)]
mod test;
