mod ai_conversation;
mod auto_publish;
mod guild_config;
mod message_count;
mod reminder;
mod ticket;
mod ticket_panel;
mod warn_punishment;
mod warning;
