use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketPanel::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketPanel::Id))
                    .col(big_integer(TicketPanel::GuildId))
                    .col(big_integer(TicketPanel::ChannelId))
                    .col(big_integer_null(TicketPanel::MessageId))
                    .col(string(TicketPanel::Title))
                    .col(text(TicketPanel::Description))
                    .col(big_integer(TicketPanel::Color))
                    .col(
                        timestamp(TicketPanel::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketPanel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TicketPanel {
    Table,
    Id,
    GuildId,
    ChannelId,
    MessageId,
    Title,
    Description,
    Color,
    CreatedAt,
}
