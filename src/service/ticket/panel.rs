//! Ticket panels and the buttons and menus rendered on them.
//!
//! Every change to a panel's components re-renders its Discord message so the posted
//! panel always matches the database.

use sea_orm::DatabaseConnection;
use serenity::all::{
    ChannelId, CreateActionRow, CreateButton, CreateEmbed, CreateMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EditMessage, Http, MessageId, ReactionType,
};

use crate::data::ticket_button::TicketButtonRepository;
use crate::data::ticket_panel::TicketPanelRepository;
use crate::data::ticket_select_menu::TicketSelectMenuRepository;
use crate::error::AppError;
use crate::model::ticket::{
    CreateTicketButtonParams, CreateTicketPanelParam, CreateTicketSelectOptionParam, TicketButton,
    TicketPanel, TicketPanelWithComponents, TicketSelectMenu, TicketSelectOption,
};
use crate::service::ticket::component::TicketComponent;

/// Discord allows five action rows per message and five buttons per row.
const MAX_ROWS: usize = 5;
const BUTTONS_PER_ROW: usize = 5;

fn parse_emoji(emoji: Option<&str>) -> Option<ReactionType> {
    emoji.and_then(|e| ReactionType::try_from(e).ok())
}

pub fn panel_embed(panel: &TicketPanel) -> CreateEmbed {
    CreateEmbed::new()
        .title(&panel.title)
        .description(&panel.description)
        .color(panel.color)
}

fn button_component(button: &TicketButton) -> CreateButton {
    let mut component = CreateButton::new(TicketComponent::Open(button.id).custom_id())
        .label(&button.label)
        .style(button.style.to_button_style());

    if let Some(emoji) = parse_emoji(button.emoji.as_deref()) {
        component = component.emoji(emoji);
    }

    component
}

fn option_component(option: &TicketSelectOption) -> CreateSelectMenuOption {
    let mut component = CreateSelectMenuOption::new(&option.label, option.id.to_string());

    if let Some(description) = &option.description {
        component = component.description(description);
    }
    if let Some(emoji) = parse_emoji(option.emoji.as_deref()) {
        component = component.emoji(emoji);
    }

    component
}

fn menu_component(menu: &TicketSelectMenu) -> CreateSelectMenu {
    let options = menu.options.iter().map(option_component).collect();

    CreateSelectMenu::new(
        TicketComponent::Select(menu.id).custom_id(),
        CreateSelectMenuKind::String { options },
    )
    .placeholder(&menu.placeholder)
}

/// Renders the action rows of a panel message.
///
/// Buttons fill rows of five, each select menu takes a row of its own. Menus without
/// options are left out since Discord rejects them, and anything beyond five rows is
/// dropped.
pub fn panel_components(panel: &TicketPanelWithComponents) -> Vec<CreateActionRow> {
    let button_rows = panel
        .buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| CreateActionRow::Buttons(chunk.iter().map(button_component).collect()));

    let menu_rows = panel
        .menus
        .iter()
        .filter(|menu| !menu.options.is_empty())
        .map(|menu| CreateActionRow::SelectMenu(menu_component(menu)));

    button_rows.chain(menu_rows).take(MAX_ROWS).collect()
}

pub struct TicketPanelService<'a> {
    db: &'a DatabaseConnection,
    http: &'a Http,
}

impl<'a> TicketPanelService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: &'a Http) -> Self {
        Self { db, http }
    }

    /// Stores a panel and posts its message in the panel channel.
    pub async fn create_panel(&self, param: CreateTicketPanelParam) -> Result<TicketPanel, AppError> {
        let repo = TicketPanelRepository::new(self.db);

        let mut panel = repo.create(param).await?;

        let message = ChannelId::new(panel.channel_id)
            .send_message(self.http, CreateMessage::new().embed(panel_embed(&panel)))
            .await?;

        repo.set_message_id(panel.id, message.id.get()).await?;
        panel.message_id = Some(message.id.get());

        tracing::info!(
            "Created ticket panel {} in guild {}",
            panel.id,
            panel.guild_id
        );

        Ok(panel)
    }

    pub async fn list_panels(&self, guild_id: u64) -> Result<Vec<TicketPanel>, AppError> {
        Ok(TicketPanelRepository::new(self.db).get_all(guild_id).await?)
    }

    pub async fn get_panel(
        &self,
        guild_id: u64,
        panel_id: i32,
    ) -> Result<TicketPanelWithComponents, AppError> {
        TicketPanelRepository::new(self.db)
            .get_with_components(guild_id, panel_id)
            .await?
            .ok_or_else(panel_not_found)
    }

    /// Deletes a panel with all its components and removes its message.
    pub async fn delete_panel(&self, guild_id: u64, panel_id: i32) -> Result<TicketPanel, AppError> {
        let panel = TicketPanelRepository::new(self.db)
            .delete(guild_id, panel_id)
            .await?
            .ok_or_else(panel_not_found)?;

        if let Some(message_id) = panel.message_id {
            if let Err(e) = ChannelId::new(panel.channel_id)
                .delete_message(self.http, MessageId::new(message_id))
                .await
            {
                tracing::debug!("Failed to delete message of panel {}: {:?}", panel.id, e);
            }
        }

        tracing::info!("Deleted ticket panel {} in guild {}", panel.id, guild_id);

        Ok(panel)
    }

    /// Re-renders the panel message, reposting it when the old one is gone.
    pub async fn refresh(&self, guild_id: u64, panel_id: i32) -> Result<(), AppError> {
        let panel = self.get_panel(guild_id, panel_id).await?;

        let embed = panel_embed(&panel.panel);
        let components = panel_components(&panel);
        let channel = ChannelId::new(panel.panel.channel_id);

        if let Some(message_id) = panel.panel.message_id {
            let edit = EditMessage::new()
                .embed(embed.clone())
                .components(components.clone());

            match channel
                .edit_message(self.http, MessageId::new(message_id), edit)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        "Failed to edit message of panel {}, reposting: {:?}",
                        panel_id,
                        e
                    );
                }
            }
        }

        let message = channel
            .send_message(
                self.http,
                CreateMessage::new().embed(embed).components(components),
            )
            .await?;

        TicketPanelRepository::new(self.db)
            .set_message_id(panel_id, message.id.get())
            .await?;

        Ok(())
    }

    /// Adds a button built by the wizard and refreshes the panel.
    pub async fn add_button(
        &self,
        guild_id: u64,
        params: CreateTicketButtonParams,
    ) -> Result<TicketButton, AppError> {
        let panel = self.get_panel(guild_id, params.panel_id).await?;

        if panel.buttons.len() >= BUTTONS_PER_ROW * MAX_ROWS {
            return Err(AppError::BadRequest(
                "This panel can't hold any more buttons".to_string(),
            ));
        }

        let button = TicketButtonRepository::new(self.db).create(params).await?;
        self.refresh(guild_id, button.panel_id).await?;

        Ok(button)
    }

    pub async fn remove_button(
        &self,
        guild_id: u64,
        panel_id: i32,
        button_id: i32,
    ) -> Result<(), AppError> {
        self.get_panel(guild_id, panel_id).await?;

        if !TicketButtonRepository::new(self.db)
            .delete(panel_id, button_id)
            .await?
        {
            return Err(AppError::NotFound("Ticket button not found".to_string()));
        }

        self.refresh(guild_id, panel_id).await
    }

    /// Adds an empty select menu. It appears on the panel once it has an option.
    pub async fn add_menu(
        &self,
        guild_id: u64,
        panel_id: i32,
        placeholder: String,
    ) -> Result<TicketSelectMenu, AppError> {
        self.get_panel(guild_id, panel_id).await?;

        Ok(TicketSelectMenuRepository::new(self.db)
            .create(panel_id, placeholder)
            .await?)
    }

    pub async fn remove_menu(
        &self,
        guild_id: u64,
        panel_id: i32,
        menu_id: i32,
    ) -> Result<(), AppError> {
        self.get_panel(guild_id, panel_id).await?;

        if !TicketSelectMenuRepository::new(self.db)
            .delete(panel_id, menu_id)
            .await?
        {
            return Err(AppError::NotFound("Select menu not found".to_string()));
        }

        self.refresh(guild_id, panel_id).await
    }

    pub async fn add_option(
        &self,
        guild_id: u64,
        param: CreateTicketSelectOptionParam,
    ) -> Result<TicketSelectOption, AppError> {
        let menu = self.get_menu(guild_id, param.menu_id).await?;

        let option = TicketSelectMenuRepository::new(self.db)
            .add_option(param)
            .await?;
        self.refresh(guild_id, menu.panel_id).await?;

        Ok(option)
    }

    pub async fn remove_option(
        &self,
        guild_id: u64,
        menu_id: i32,
        option_id: i32,
    ) -> Result<(), AppError> {
        let menu = self.get_menu(guild_id, menu_id).await?;

        if !TicketSelectMenuRepository::new(self.db)
            .remove_option(menu_id, option_id)
            .await?
        {
            return Err(AppError::NotFound("Select option not found".to_string()));
        }

        self.refresh(guild_id, menu.panel_id).await
    }

    async fn get_menu(&self, guild_id: u64, menu_id: i32) -> Result<TicketSelectMenu, AppError> {
        let menu = TicketSelectMenuRepository::new(self.db)
            .get_by_id(menu_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Select menu not found".to_string()))?;

        // Menus of other guilds are reported as missing
        TicketPanelRepository::new(self.db)
            .get_by_id(guild_id, menu.panel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Select menu not found".to_string()))?;

        Ok(menu)
    }
}

fn panel_not_found() -> AppError {
    AppError::NotFound("Ticket panel not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticket::{TicketButtonStyle, DEFAULT_CHANNEL_NAME_FORMAT};
    use chrono::Utc;

    fn panel() -> TicketPanel {
        TicketPanel {
            id: 1,
            guild_id: 1,
            channel_id: 2,
            message_id: None,
            title: "Support".to_string(),
            description: "Open a ticket".to_string(),
            color: 0,
            created_at: Utc::now(),
        }
    }

    fn button(id: i32) -> TicketButton {
        TicketButton {
            id,
            panel_id: 1,
            label: format!("Button {}", id),
            emoji: None,
            style: TicketButtonStyle::Primary,
            open_message: None,
            channel_name_format: DEFAULT_CHANNEL_NAME_FORMAT.to_string(),
            category_id: None,
            archive_category_id: None,
            support_roles: Vec::new(),
            viewer_roles: Vec::new(),
            max_tickets: 1,
        }
    }

    fn menu(id: i32, options: usize) -> TicketSelectMenu {
        TicketSelectMenu {
            id,
            panel_id: 1,
            placeholder: "Pick a topic".to_string(),
            options: (0..options as i32)
                .map(|option_id| TicketSelectOption {
                    id: option_id,
                    menu_id: id,
                    label: format!("Option {}", option_id),
                    description: None,
                    emoji: None,
                    open_message: None,
                    category_id: None,
                    archive_category_id: None,
                    support_roles: Vec::new(),
                    max_tickets: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn buttons_fill_rows_of_five() {
        let panel = TicketPanelWithComponents {
            panel: panel(),
            buttons: (1..=7).map(button).collect(),
            menus: Vec::new(),
        };

        let rows = panel_components(&panel);

        assert_eq!(rows.len(), 2);
        assert!(matches!(&rows[0], CreateActionRow::Buttons(b) if b.len() == 5));
        assert!(matches!(&rows[1], CreateActionRow::Buttons(b) if b.len() == 2));
    }

    #[test]
    fn empty_menus_are_not_rendered() {
        let panel = TicketPanelWithComponents {
            panel: panel(),
            buttons: vec![button(1)],
            menus: vec![menu(1, 0), menu(2, 3)],
        };

        let rows = panel_components(&panel);

        assert_eq!(rows.len(), 2);
        assert!(matches!(&rows[1], CreateActionRow::SelectMenu(_)));
    }

    #[test]
    fn caps_rows_per_message() {
        let panel = TicketPanelWithComponents {
            panel: panel(),
            buttons: (1..=10).map(button).collect(),
            menus: (1..=5).map(|id| menu(id, 1)).collect(),
        };

        assert_eq!(panel_components(&panel).len(), MAX_ROWS);
    }
}
