use sea_orm_migration::{prelude::*, schema::*};

use super::m20260303_000005_create_ticket_panel_table::TicketPanel;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketButton::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketButton::Id))
                    .col(integer(TicketButton::PanelId))
                    .col(string(TicketButton::Label))
                    .col(string_null(TicketButton::Emoji))
                    .col(string(TicketButton::Style))
                    .col(text_null(TicketButton::OpenMessage))
                    .col(string(TicketButton::ChannelNameFormat))
                    .col(big_integer_null(TicketButton::CategoryId))
                    .col(big_integer_null(TicketButton::ArchiveCategoryId))
                    .col(text(TicketButton::SupportRoles))
                    .col(text(TicketButton::ViewerRoles))
                    .col(integer(TicketButton::MaxTickets).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_button_panel_id")
                            .from(TicketButton::Table, TicketButton::PanelId)
                            .to(TicketPanel::Table, TicketPanel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketButton::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TicketButton {
    Table,
    Id,
    PanelId,
    Label,
    Emoji,
    Style,
    OpenMessage,
    ChannelNameFormat,
    CategoryId,
    ArchiveCategoryId,
    SupportRoles,
    ViewerRoles,
    MaxTickets,
}
