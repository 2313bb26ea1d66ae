//! Ticket button factory for creating test button entities.

use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::fixture;

/// Factory for creating ticket buttons attached to an existing panel.
///
/// # Example
///
/// ```rust,ignore
/// let button = TicketButtonFactory::new(&db, panel.id)
///     .support_roles(&[111, 222])
///     .max_tickets(2)
///     .build()
///     .await?;
/// ```
pub struct TicketButtonFactory<'a> {
    db: &'a DatabaseConnection,
    entity: entity::ticket_button::Model,
}

impl<'a> TicketButtonFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, panel_id: i32) -> Self {
        let entity = fixture::ticket_button::entity_builder()
            .panel_id(panel_id)
            .build();

        Self { db, entity }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.entity.label = label.into();
        self
    }

    pub fn category_id(mut self, category_id: i64) -> Self {
        self.entity.category_id = Some(category_id);
        self
    }

    pub fn support_roles(mut self, roles: &[i64]) -> Self {
        self.entity.support_roles = encode(roles);
        self
    }

    pub fn viewer_roles(mut self, roles: &[i64]) -> Self {
        self.entity.viewer_roles = encode(roles);
        self
    }

    pub fn max_tickets(mut self, max_tickets: i32) -> Self {
        self.entity.max_tickets = max_tickets;
        self
    }

    pub async fn build(self) -> Result<entity::ticket_button::Model, DbErr> {
        entity::ticket_button::ActiveModel {
            id: ActiveValue::NotSet,
            panel_id: ActiveValue::Set(self.entity.panel_id),
            label: ActiveValue::Set(self.entity.label),
            emoji: ActiveValue::Set(self.entity.emoji),
            style: ActiveValue::Set(self.entity.style),
            open_message: ActiveValue::Set(self.entity.open_message),
            channel_name_format: ActiveValue::Set(self.entity.channel_name_format),
            category_id: ActiveValue::Set(self.entity.category_id),
            archive_category_id: ActiveValue::Set(self.entity.archive_category_id),
            support_roles: ActiveValue::Set(self.entity.support_roles),
            viewer_roles: ActiveValue::Set(self.entity.viewer_roles),
            max_tickets: ActiveValue::Set(self.entity.max_tickets),
        }
        .insert(self.db)
        .await
    }
}

/// Role columns store ids as JSON number arrays.
fn encode(roles: &[i64]) -> String {
    serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string())
}

/// Creates a default button on the given panel.
pub async fn create_button(
    db: &DatabaseConnection,
    panel_id: i32,
) -> Result<entity::ticket_button::Model, DbErr> {
    TicketButtonFactory::new(db, panel_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::helpers::create_panel_with_button;

    #[tokio::test]
    async fn creates_button_on_panel() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let (panel, button) = create_panel_with_button(db).await?;

        assert_eq!(button.panel_id, panel.id);
        assert_eq!(button.support_roles, "[]");
        assert_eq!(button.max_tickets, 1);

        Ok(())
    }

    #[tokio::test]
    async fn encodes_roles_as_json_array() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_ticket_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let (panel, _) = create_panel_with_button(db).await?;
        let button = TicketButtonFactory::new(db, panel.id)
            .support_roles(&[111, 222])
            .build()
            .await?;

        assert_eq!(button.support_roles, "[111,222]");

        Ok(())
    }
}
