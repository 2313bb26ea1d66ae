use sea_orm_migration::{prelude::*, schema::*};

use super::m20260303_000007_create_ticket_select_menu_table::TicketSelectMenu;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketSelectOption::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketSelectOption::Id))
                    .col(integer(TicketSelectOption::MenuId))
                    .col(string(TicketSelectOption::Label))
                    .col(string_null(TicketSelectOption::Description))
                    .col(string_null(TicketSelectOption::Emoji))
                    .col(text_null(TicketSelectOption::OpenMessage))
                    .col(big_integer_null(TicketSelectOption::CategoryId))
                    .col(big_integer_null(TicketSelectOption::ArchiveCategoryId))
                    .col(text(TicketSelectOption::SupportRoles))
                    .col(integer(TicketSelectOption::MaxTickets).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_select_option_menu_id")
                            .from(TicketSelectOption::Table, TicketSelectOption::MenuId)
                            .to(TicketSelectMenu::Table, TicketSelectMenu::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketSelectOption::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TicketSelectOption {
    Table,
    Id,
    MenuId,
    Label,
    Description,
    Emoji,
    OpenMessage,
    CategoryId,
    ArchiveCategoryId,
    SupportRoles,
    MaxTickets,
}
