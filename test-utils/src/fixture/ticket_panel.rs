//! Ticket panel fixtures for creating in-memory test data.

use chrono::{TimeZone, Utc};
use entity::ticket_panel;

pub const DEFAULT_GUILD_ID: i64 = 987654321;
pub const DEFAULT_CHANNEL_ID: i64 = 555555555;
pub const DEFAULT_TITLE: &str = "Support";
pub const DEFAULT_DESCRIPTION: &str = "Press a button below to open a ticket.";
pub const DEFAULT_COLOR: i64 = 0x5865F2;

/// Creates a ticket panel entity model with default values and no posted message.
pub fn entity() -> ticket_panel::Model {
    ticket_panel::Model {
        id: 1,
        guild_id: DEFAULT_GUILD_ID,
        channel_id: DEFAULT_CHANNEL_ID,
        message_id: None,
        title: DEFAULT_TITLE.to_string(),
        description: DEFAULT_DESCRIPTION.to_string(),
        color: DEFAULT_COLOR,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    }
}
