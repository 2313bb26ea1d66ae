use sea_orm_migration::{prelude::*, schema::*};

use super::m20260303_000009_create_ticket_case_table::TicketCase;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(pk_auto(Ticket::Id))
                    .col(big_integer(Ticket::GuildId))
                    .col(big_integer(Ticket::ChannelId).unique_key())
                    .col(big_integer(Ticket::CreatorId))
                    .col(integer_null(Ticket::ButtonId))
                    .col(integer_null(Ticket::OptionId))
                    .col(integer_null(Ticket::CaseId))
                    .col(big_integer_null(Ticket::ClaimedBy))
                    .col(text(Ticket::AddedUsers))
                    .col(
                        timestamp(Ticket::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_null(Ticket::ClosedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ticket_case_id")
                            .from(Ticket::Table, Ticket::CaseId)
                            .to(TicketCase::Table, TicketCase::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ticket_guild_creator")
                    .table(Ticket::Table)
                    .col(Ticket::GuildId)
                    .col(Ticket::CreatorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ticket_guild_creator")
                    .table(Ticket::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ticket {
    Table,
    Id,
    GuildId,
    ChannelId,
    CreatorId,
    ButtonId,
    OptionId,
    CaseId,
    ClaimedBy,
    AddedUsers,
    CreatedAt,
    ClosedAt,
}
