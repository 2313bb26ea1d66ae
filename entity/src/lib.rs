//! SeaORM entity definitions for every persisted table.

pub mod prelude;

pub mod ai_conversation;
pub mod ai_message;
pub mod auto_publish_channel;
pub mod guild_config;
pub mod join_leave_event;
pub mod message_count;
pub mod music_settings;
pub mod publish_user_blacklist;
pub mod publish_word_blacklist;
pub mod reminder;
pub mod repeater;
pub mod ticket;
pub mod ticket_button;
pub mod ticket_case;
pub mod ticket_panel;
pub mod ticket_select_menu;
pub mod ticket_select_option;
pub mod warn_punishment;
pub mod warning;
