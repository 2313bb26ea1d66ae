//! Domain models for ticket panels, their components, tickets and cases.

use chrono::{DateTime, Utc};
use serenity::all::ButtonStyle;
use std::str::FromStr;

use crate::error::{internal::InternalError, AppError};

pub const DEFAULT_CHANNEL_NAME_FORMAT: &str = "ticket-{username}";

/// Decodes a JSON array of role/user ids stored in a text column.
pub fn decode_ids(column: &'static str, raw: &str) -> Result<Vec<u64>, AppError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|source| InternalError::JsonColumn { column, source }.into())
}

pub fn encode_ids(ids: &[u64]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Button colour as chosen in the wizard, stored by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
}

impl TicketButtonStyle {
    pub const ALL: [TicketButtonStyle; 4] = [
        TicketButtonStyle::Primary,
        TicketButtonStyle::Secondary,
        TicketButtonStyle::Success,
        TicketButtonStyle::Danger,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }

    pub fn to_button_style(self) -> ButtonStyle {
        match self {
            Self::Primary => ButtonStyle::Primary,
            Self::Secondary => ButtonStyle::Secondary,
            Self::Success => ButtonStyle::Success,
            Self::Danger => ButtonStyle::Danger,
        }
    }
}

impl FromStr for TicketButtonStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "blurple" => Ok(Self::Primary),
            "secondary" | "grey" | "gray" => Ok(Self::Secondary),
            "success" | "green" => Ok(Self::Success),
            "danger" | "red" => Ok(Self::Danger),
            other => Err(format!("Unknown button style '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketPanel {
    pub id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
    pub message_id: Option<u64>,
    pub title: String,
    pub description: String,
    pub color: u32,
    pub created_at: DateTime<Utc>,
}

impl TicketPanel {
    pub fn from_entity(entity: entity::ticket_panel::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            channel_id: entity.channel_id as u64,
            message_id: entity.message_id.map(|id| id as u64),
            title: entity.title,
            description: entity.description,
            color: entity.color as u32,
            created_at: entity.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTicketPanelParam {
    pub guild_id: u64,
    pub channel_id: u64,
    pub title: String,
    pub description: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketButton {
    pub id: i32,
    pub panel_id: i32,
    pub label: String,
    pub emoji: Option<String>,
    pub style: TicketButtonStyle,
    pub open_message: Option<String>,
    pub channel_name_format: String,
    pub category_id: Option<u64>,
    pub archive_category_id: Option<u64>,
    pub support_roles: Vec<u64>,
    pub viewer_roles: Vec<u64>,
    /// Open tickets a single member may hold from this button, 0 for no limit.
    pub max_tickets: u32,
}

impl TicketButton {
    pub fn from_entity(entity: entity::ticket_button::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            panel_id: entity.panel_id,
            label: entity.label,
            emoji: entity.emoji,
            style: entity.style.parse().unwrap_or_default(),
            open_message: entity.open_message,
            channel_name_format: entity.channel_name_format,
            category_id: entity.category_id.map(|id| id as u64),
            archive_category_id: entity.archive_category_id.map(|id| id as u64),
            support_roles: decode_ids("support_roles", &entity.support_roles)?,
            viewer_roles: decode_ids("viewer_roles", &entity.viewer_roles)?,
            max_tickets: entity.max_tickets.max(0) as u32,
        })
    }
}

/// Parameters produced by a completed button wizard draft.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTicketButtonParams {
    pub panel_id: i32,
    pub label: String,
    pub emoji: Option<String>,
    pub style: TicketButtonStyle,
    pub open_message: Option<String>,
    pub channel_name_format: String,
    pub category_id: Option<u64>,
    pub archive_category_id: Option<u64>,
    pub support_roles: Vec<u64>,
    pub viewer_roles: Vec<u64>,
    pub max_tickets: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketSelectOption {
    pub id: i32,
    pub menu_id: i32,
    pub label: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub open_message: Option<String>,
    pub category_id: Option<u64>,
    pub archive_category_id: Option<u64>,
    pub support_roles: Vec<u64>,
    pub max_tickets: u32,
}

impl TicketSelectOption {
    pub fn from_entity(entity: entity::ticket_select_option::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            menu_id: entity.menu_id,
            label: entity.label,
            description: entity.description,
            emoji: entity.emoji,
            open_message: entity.open_message,
            category_id: entity.category_id.map(|id| id as u64),
            archive_category_id: entity.archive_category_id.map(|id| id as u64),
            support_roles: decode_ids("support_roles", &entity.support_roles)?,
            max_tickets: entity.max_tickets.max(0) as u32,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateTicketSelectOptionParam {
    pub menu_id: i32,
    pub label: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    pub open_message: Option<String>,
    pub category_id: Option<u64>,
    pub archive_category_id: Option<u64>,
    pub support_roles: Vec<u64>,
    pub max_tickets: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketSelectMenu {
    pub id: i32,
    pub panel_id: i32,
    pub placeholder: String,
    pub options: Vec<TicketSelectOption>,
}

/// A panel together with everything rendered on its message.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketPanelWithComponents {
    pub panel: TicketPanel,
    pub buttons: Vec<TicketButton>,
    pub menus: Vec<TicketSelectMenu>,
}

/// Where a ticket was opened from; carries the channel setup for the new ticket.
#[derive(Debug, Clone, PartialEq)]
pub enum TicketSource {
    Button(TicketButton),
    SelectOption(TicketSelectOption),
}

impl TicketSource {
    pub fn category_id(&self) -> Option<u64> {
        match self {
            Self::Button(b) => b.category_id,
            Self::SelectOption(o) => o.category_id,
        }
    }

    pub fn archive_category_id(&self) -> Option<u64> {
        match self {
            Self::Button(b) => b.archive_category_id,
            Self::SelectOption(o) => o.archive_category_id,
        }
    }

    pub fn support_roles(&self) -> &[u64] {
        match self {
            Self::Button(b) => &b.support_roles,
            Self::SelectOption(o) => &o.support_roles,
        }
    }

    pub fn viewer_roles(&self) -> &[u64] {
        match self {
            Self::Button(b) => &b.viewer_roles,
            Self::SelectOption(_) => &[],
        }
    }

    pub fn open_message(&self) -> Option<&str> {
        match self {
            Self::Button(b) => b.open_message.as_deref(),
            Self::SelectOption(o) => o.open_message.as_deref(),
        }
    }

    pub fn channel_name_format(&self) -> &str {
        match self {
            Self::Button(b) => &b.channel_name_format,
            Self::SelectOption(_) => DEFAULT_CHANNEL_NAME_FORMAT,
        }
    }

    pub fn max_tickets(&self) -> u32 {
        match self {
            Self::Button(b) => b.max_tickets,
            Self::SelectOption(o) => o.max_tickets,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Button(b) => &b.label,
            Self::SelectOption(o) => &o.label,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: i32,
    pub guild_id: u64,
    pub channel_id: u64,
    pub creator_id: u64,
    pub button_id: Option<i32>,
    pub option_id: Option<i32>,
    pub case_id: Option<i32>,
    pub claimed_by: Option<u64>,
    pub added_users: Vec<u64>,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Ticket {
    pub fn from_entity(entity: entity::ticket::Model) -> Result<Self, AppError> {
        Ok(Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            channel_id: entity.channel_id as u64,
            creator_id: entity.creator_id as u64,
            button_id: entity.button_id,
            option_id: entity.option_id,
            case_id: entity.case_id,
            claimed_by: entity.claimed_by.map(|id| id as u64),
            added_users: decode_ids("added_users", &entity.added_users)?,
            created_at: entity.created_at,
            closed_at: entity.closed_at,
        })
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct CreateTicketParam {
    pub guild_id: u64,
    pub channel_id: u64,
    pub creator_id: u64,
    pub button_id: Option<i32>,
    pub option_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketCase {
    pub id: i32,
    pub guild_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: u64,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl TicketCase {
    pub fn from_entity(entity: entity::ticket_case::Model) -> Self {
        Self {
            id: entity.id,
            guild_id: entity.guild_id as u64,
            title: entity.title,
            description: entity.description,
            created_by: entity.created_by as u64,
            created_at: entity.created_at,
            closed_at: entity.closed_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateTicketCaseParam {
    pub guild_id: u64,
    pub title: String,
    pub description: Option<String>,
    pub created_by: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicketCaseWithTickets {
    pub case: TicketCase,
    pub tickets: Vec<Ticket>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_empty_column_as_no_ids() {
        assert!(decode_ids("support_roles", "").unwrap().is_empty());
        assert!(decode_ids("support_roles", "[]").unwrap().is_empty());
    }

    #[test]
    fn decodes_id_arrays() {
        let ids = decode_ids("support_roles", &encode_ids(&[1, 2, 3])).unwrap();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rejects_malformed_id_column() {
        let result = decode_ids("viewer_roles", "{not json");
        assert!(matches!(
            result,
            Err(AppError::InternalErr(InternalError::JsonColumn {
                column: "viewer_roles",
                ..
            }))
        ));
    }

    #[test]
    fn parses_button_style_aliases() {
        assert_eq!("red".parse::<TicketButtonStyle>(), Ok(TicketButtonStyle::Danger));
        assert_eq!("Blurple".parse::<TicketButtonStyle>(), Ok(TicketButtonStyle::Primary));
        assert!("purple".parse::<TicketButtonStyle>().is_err());
    }
}
