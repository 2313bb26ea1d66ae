use crate::{
    data::{ticket_panel::TicketPanelRepository, ticket_select_menu::TicketSelectMenuRepository},
    error::AppError,
    model::ticket::CreateTicketSelectOptionParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod delete;
mod get_with_components;
