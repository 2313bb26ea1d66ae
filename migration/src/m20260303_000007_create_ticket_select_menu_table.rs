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
                    .table(TicketSelectMenu::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketSelectMenu::Id))
                    .col(integer(TicketSelectMenu::PanelId))
                    .col(string(TicketSelectMenu::Placeholder))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_select_menu_panel_id")
                            .from(TicketSelectMenu::Table, TicketSelectMenu::PanelId)
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
            .drop_table(Table::drop().table(TicketSelectMenu::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TicketSelectMenu {
    Table,
    Id,
    PanelId,
    Placeholder,
}
