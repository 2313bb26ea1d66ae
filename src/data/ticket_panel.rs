//! Ticket panel data repository.
//!
//! Panels are the embeds members click to open tickets. The repository also loads a
//! panel together with its buttons and select menus for rendering, and removes those
//! children when a panel is deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    data::{ticket_button::TicketButtonRepository, ticket_select_menu::TicketSelectMenuRepository},
    error::AppError,
    model::ticket::{CreateTicketPanelParam, TicketPanel, TicketPanelWithComponents},
};

/// Repository providing database operations for ticket panels.
pub struct TicketPanelRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketPanelRepository<'a> {
    /// Creates a new TicketPanelRepository instance
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `TicketPanelRepository` - new repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a panel record. The Discord message id is set once the embed is posted.
    ///
    /// # Arguments
    /// - `param` - Guild, channel and embed content of the panel
    ///
    /// # Returns
    /// - `Ok(TicketPanel)` - The created panel
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateTicketPanelParam) -> Result<TicketPanel, DbErr> {
        let entity = entity::ticket_panel::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(param.guild_id as i64),
            channel_id: ActiveValue::Set(param.channel_id as i64),
            message_id: ActiveValue::Set(None),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            color: ActiveValue::Set(param.color as i64),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(TicketPanel::from_entity(entity))
    }

    /// Stores the id of the Discord message that renders the panel.
    pub async fn set_message_id(&self, id: i32, message_id: u64) -> Result<(), DbErr> {
        entity::ticket_panel::ActiveModel {
            id: ActiveValue::Unchanged(id),
            message_id: ActiveValue::Set(Some(message_id as i64)),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }

    /// Finds a panel by ID within a guild
    ///
    /// # Arguments
    /// - `guild_id` - The ID of the guild the panel belongs to
    /// - `id` - ID of the panel to retrieve
    ///
    /// # Returns
    /// - `Ok(Some(TicketPanel))` - The panel if it exists in the guild
    /// - `Ok(None)` - No such panel in this guild
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_by_id(&self, guild_id: u64, id: i32) -> Result<Option<TicketPanel>, DbErr> {
        let entity = entity::prelude::TicketPanel::find_by_id(id)
            .filter(entity::ticket_panel::Column::GuildId.eq(guild_id as i64))
            .one(self.db)
            .await?;

        Ok(entity.map(TicketPanel::from_entity))
    }

    /// Gets all panels of a guild, oldest first.
    pub async fn get_all(&self, guild_id: u64) -> Result<Vec<TicketPanel>, DbErr> {
        let entities = entity::prelude::TicketPanel::find()
            .filter(entity::ticket_panel::Column::GuildId.eq(guild_id as i64))
            .order_by_asc(entity::ticket_panel::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(TicketPanel::from_entity).collect())
    }

    /// Loads a panel with its buttons, select menus and their options.
    ///
    /// # Returns
    /// - `Ok(Some(TicketPanelWithComponents))` - Panel and components
    /// - `Ok(None)` - No such panel in this guild
    /// - `Err(AppError)` - Database error or an undecodable role list
    pub async fn get_with_components(
        &self,
        guild_id: u64,
        id: i32,
    ) -> Result<Option<TicketPanelWithComponents>, AppError> {
        let Some(panel) = self.get_by_id(guild_id, id).await? else {
            return Ok(None);
        };

        let buttons = TicketButtonRepository::new(self.db)
            .get_by_panel(panel.id)
            .await?;
        let menus = TicketSelectMenuRepository::new(self.db)
            .get_by_panel(panel.id)
            .await?;

        Ok(Some(TicketPanelWithComponents {
            panel,
            buttons,
            menus,
        }))
    }

    /// Deletes a panel together with its buttons, menus and menu options.
    ///
    /// # Returns
    /// - `Ok(Some(TicketPanel))` - The deleted panel, so the caller can remove its message
    /// - `Ok(None)` - No such panel in this guild
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, guild_id: u64, id: i32) -> Result<Option<TicketPanel>, DbErr> {
        let Some(panel) = self.get_by_id(guild_id, id).await? else {
            return Ok(None);
        };

        let menu_ids: Vec<i32> = entity::prelude::TicketSelectMenu::find()
            .filter(entity::ticket_select_menu::Column::PanelId.eq(id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        entity::prelude::TicketSelectOption::delete_many()
            .filter(entity::ticket_select_option::Column::MenuId.is_in(menu_ids))
            .exec(self.db)
            .await?;
        entity::prelude::TicketSelectMenu::delete_many()
            .filter(entity::ticket_select_menu::Column::PanelId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::TicketButton::delete_many()
            .filter(entity::ticket_button::Column::PanelId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::TicketPanel::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(Some(panel))
    }
}
