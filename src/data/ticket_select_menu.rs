//! Ticket select menu and option data repository.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::ticket::{
        encode_ids, CreateTicketSelectOptionParam, TicketSelectMenu, TicketSelectOption,
    },
};

/// Discord allows at most 25 options in one select menu.
pub const MAX_OPTIONS_PER_MENU: usize = 25;

pub struct TicketSelectMenuRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketSelectMenuRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an empty select menu on a panel.
    pub async fn create(&self, panel_id: i32, placeholder: String) -> Result<TicketSelectMenu, DbErr> {
        let entity = entity::ticket_select_menu::ActiveModel {
            id: ActiveValue::NotSet,
            panel_id: ActiveValue::Set(panel_id),
            placeholder: ActiveValue::Set(placeholder),
        }
        .insert(self.db)
        .await?;

        Ok(TicketSelectMenu {
            id: entity.id,
            panel_id: entity.panel_id,
            placeholder: entity.placeholder,
            options: Vec::new(),
        })
    }

    /// Gets a menu with its options.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<TicketSelectMenu>, AppError> {
        let Some(menu) = entity::prelude::TicketSelectMenu::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let options = self.get_options(menu.id).await?;

        Ok(Some(TicketSelectMenu {
            id: menu.id,
            panel_id: menu.panel_id,
            placeholder: menu.placeholder,
            options,
        }))
    }

    /// Gets the menus of a panel with their options, in creation order.
    pub async fn get_by_panel(&self, panel_id: i32) -> Result<Vec<TicketSelectMenu>, AppError> {
        let menus = entity::prelude::TicketSelectMenu::find()
            .filter(entity::ticket_select_menu::Column::PanelId.eq(panel_id))
            .order_by_asc(entity::ticket_select_menu::Column::Id)
            .all(self.db)
            .await?;

        let mut result = Vec::with_capacity(menus.len());
        for menu in menus {
            let options = self.get_options(menu.id).await?;
            result.push(TicketSelectMenu {
                id: menu.id,
                panel_id: menu.panel_id,
                placeholder: menu.placeholder,
                options,
            });
        }

        Ok(result)
    }

    /// Deletes a menu of a panel and its options.
    pub async fn delete(&self, panel_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::TicketSelectMenu::delete_many()
            .filter(entity::ticket_select_menu::Column::Id.eq(id))
            .filter(entity::ticket_select_menu::Column::PanelId.eq(panel_id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        entity::prelude::TicketSelectOption::delete_many()
            .filter(entity::ticket_select_option::Column::MenuId.eq(id))
            .exec(self.db)
            .await?;

        Ok(true)
    }

    /// Adds an option to a menu.
    ///
    /// # Returns
    /// - `Ok(TicketSelectOption)` - The created option
    /// - `Err(AppError::BadRequest)` - The menu already holds 25 options
    /// - `Err(AppError::DbErr)` - Database error during insert
    pub async fn add_option(
        &self,
        param: CreateTicketSelectOptionParam,
    ) -> Result<TicketSelectOption, AppError> {
        if self.get_options(param.menu_id).await?.len() >= MAX_OPTIONS_PER_MENU {
            return Err(AppError::BadRequest(format!(
                "A select menu can hold at most {} options",
                MAX_OPTIONS_PER_MENU
            )));
        }

        let entity = entity::ticket_select_option::ActiveModel {
            id: ActiveValue::NotSet,
            menu_id: ActiveValue::Set(param.menu_id),
            label: ActiveValue::Set(param.label),
            description: ActiveValue::Set(param.description),
            emoji: ActiveValue::Set(param.emoji),
            open_message: ActiveValue::Set(param.open_message),
            category_id: ActiveValue::Set(param.category_id.map(|id| id as i64)),
            archive_category_id: ActiveValue::Set(param.archive_category_id.map(|id| id as i64)),
            support_roles: ActiveValue::Set(encode_ids(&param.support_roles)),
            max_tickets: ActiveValue::Set(param.max_tickets as i32),
        }
        .insert(self.db)
        .await?;

        TicketSelectOption::from_entity(entity)
    }

    /// Removes an option from a menu.
    pub async fn remove_option(&self, menu_id: i32, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::TicketSelectOption::delete_many()
            .filter(entity::ticket_select_option::Column::Id.eq(id))
            .filter(entity::ticket_select_option::Column::MenuId.eq(menu_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_option(&self, id: i32) -> Result<Option<TicketSelectOption>, AppError> {
        entity::prelude::TicketSelectOption::find_by_id(id)
            .one(self.db)
            .await?
            .map(TicketSelectOption::from_entity)
            .transpose()
    }

    async fn get_options(&self, menu_id: i32) -> Result<Vec<TicketSelectOption>, AppError> {
        entity::prelude::TicketSelectOption::find()
            .filter(entity::ticket_select_option::Column::MenuId.eq(menu_id))
            .order_by_asc(entity::ticket_select_option::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(TicketSelectOption::from_entity)
            .collect()
    }
}
