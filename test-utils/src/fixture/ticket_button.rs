//! Ticket button fixtures for creating in-memory test data.
//!
//! Provides fixture functions for creating ticket button entity models without database
//! insertion. Role columns hold JSON arrays the same way the database stores them.

use entity::ticket_button;

/// Default button label.
pub const DEFAULT_LABEL: &str = "Open Ticket";

/// Default button style.
pub const DEFAULT_STYLE: &str = "primary";

/// Default channel name format.
pub const DEFAULT_CHANNEL_NAME_FORMAT: &str = "ticket-{username}";

/// Default maximum open tickets per member.
pub const DEFAULT_MAX_TICKETS: i32 = 1;

/// Creates a ticket button entity model with default values.
///
/// # Default Values
/// - id: `1`
/// - panel_id: `1`
/// - label: `"Open Ticket"`
/// - style: `"primary"`
/// - channel_name_format: `"ticket-{username}"`
/// - support_roles / viewer_roles: `"[]"`
/// - max_tickets: `1`
///
/// # Returns
/// - `ticket_button::Model` - In-memory ticket button entity
pub fn entity() -> ticket_button::Model {
    entity_builder().build()
}

/// Creates a ticket button entity builder for customization.
///
/// # Example
///
/// ```rust,ignore
/// let button = fixture::ticket_button::entity_builder()
///     .support_roles("[111]")
///     .max_tickets(3)
///     .build();
/// ```
pub fn entity_builder() -> TicketButtonEntityBuilder {
    TicketButtonEntityBuilder::default()
}

/// Builder for creating customized ticket button entity models.
pub struct TicketButtonEntityBuilder {
    entity: ticket_button::Model,
}

impl Default for TicketButtonEntityBuilder {
    fn default() -> Self {
        Self {
            entity: ticket_button::Model {
                id: 1,
                panel_id: 1,
                label: DEFAULT_LABEL.to_string(),
                emoji: None,
                style: DEFAULT_STYLE.to_string(),
                open_message: None,
                channel_name_format: DEFAULT_CHANNEL_NAME_FORMAT.to_string(),
                category_id: None,
                archive_category_id: None,
                support_roles: "[]".to_string(),
                viewer_roles: "[]".to_string(),
                max_tickets: DEFAULT_MAX_TICKETS,
            },
        }
    }
}

impl TicketButtonEntityBuilder {
    pub fn id(mut self, id: i32) -> Self {
        self.entity.id = id;
        self
    }

    pub fn panel_id(mut self, panel_id: i32) -> Self {
        self.entity.panel_id = panel_id;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.entity.label = label.into();
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.entity.style = style.into();
        self
    }

    pub fn channel_name_format(mut self, format: impl Into<String>) -> Self {
        self.entity.channel_name_format = format.into();
        self
    }

    pub fn category_id(mut self, category_id: Option<i64>) -> Self {
        self.entity.category_id = category_id;
        self
    }

    /// Sets the raw JSON support roles column.
    pub fn support_roles(mut self, raw: impl Into<String>) -> Self {
        self.entity.support_roles = raw.into();
        self
    }

    /// Sets the raw JSON viewer roles column.
    pub fn viewer_roles(mut self, raw: impl Into<String>) -> Self {
        self.entity.viewer_roles = raw.into();
        self
    }

    pub fn max_tickets(mut self, max_tickets: i32) -> Self {
        self.entity.max_tickets = max_tickets;
        self
    }

    pub fn build(self) -> ticket_button::Model {
        self.entity
    }
}
