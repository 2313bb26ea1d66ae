//! Ticket panel factory for creating test panel entities.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::{factory::helpers::next_id, fixture};

pub struct TicketPanelFactory<'a> {
    db: &'a DatabaseConnection,
    entity: entity::ticket_panel::Model,
}

impl<'a> TicketPanelFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: i64) -> Self {
        let mut entity = fixture::ticket_panel::entity();
        entity.guild_id = guild_id;
        entity.title = format!("Panel {}", next_id());

        Self { db, entity }
    }

    pub fn channel_id(mut self, channel_id: i64) -> Self {
        self.entity.channel_id = channel_id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.entity.title = title.into();
        self
    }

    pub fn message_id(mut self, message_id: Option<i64>) -> Self {
        self.entity.message_id = message_id;
        self
    }

    pub async fn build(self) -> Result<entity::ticket_panel::Model, DbErr> {
        entity::ticket_panel::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.entity.guild_id),
            channel_id: ActiveValue::Set(self.entity.channel_id),
            message_id: ActiveValue::Set(self.entity.message_id),
            title: ActiveValue::Set(self.entity.title),
            description: ActiveValue::Set(self.entity.description),
            color: ActiveValue::Set(self.entity.color),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a ticket panel with default values in the given guild.
pub async fn create_panel(
    db: &DatabaseConnection,
    guild_id: i64,
) -> Result<entity::ticket_panel::Model, DbErr> {
    TicketPanelFactory::new(db, guild_id).build().await
}
