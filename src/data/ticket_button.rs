//! Ticket button data repository.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::ticket::{encode_ids, CreateTicketButtonParams, TicketButton},
};

pub struct TicketButtonRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketButtonRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a button from a completed wizard draft.
    pub async fn create(&self, params: CreateTicketButtonParams) -> Result<TicketButton, AppError> {
        let entity = entity::ticket_button::ActiveModel {
            id: ActiveValue::NotSet,
            panel_id: ActiveValue::Set(params.panel_id),
            label: ActiveValue::Set(params.label),
            emoji: ActiveValue::Set(params.emoji),
            style: ActiveValue::Set(params.style.as_str().to_string()),
            open_message: ActiveValue::Set(params.open_message),
            channel_name_format: ActiveValue::Set(params.channel_name_format),
            category_id: ActiveValue::Set(params.category_id.map(|id| id as i64)),
            archive_category_id: ActiveValue::Set(params.archive_category_id.map(|id| id as i64)),
            support_roles: ActiveValue::Set(encode_ids(&params.support_roles)),
            viewer_roles: ActiveValue::Set(encode_ids(&params.viewer_roles)),
            max_tickets: ActiveValue::Set(params.max_tickets as i32),
        }
        .insert(self.db)
        .await?;

        TicketButton::from_entity(entity)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<TicketButton>, AppError> {
        entity::prelude::TicketButton::find_by_id(id)
            .one(self.db)
            .await?
            .map(TicketButton::from_entity)
            .transpose()
    }

    /// Gets the buttons of a panel in creation order.
    pub async fn get_by_panel(&self, panel_id: i32) -> Result<Vec<TicketButton>, AppError> {
        entity::prelude::TicketButton::find()
            .filter(entity::ticket_button::Column::PanelId.eq(panel_id))
            .order_by_asc(entity::ticket_button::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(TicketButton::from_entity)
            .collect()
    }

    /// Deletes a button of a panel.
    ///
    /// # Returns
    /// - `Ok(true)` - The button was deleted
    /// - `Ok(false)` - The panel has no such button
    pub async fn delete(&self, panel_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::TicketButton::delete_many()
            .filter(entity::ticket_button::Column::Id.eq(id))
            .filter(entity::ticket_button::Column::PanelId.eq(panel_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
