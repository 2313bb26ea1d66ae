use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TicketCase::Table)
                    .if_not_exists()
                    .col(pk_auto(TicketCase::Id))
                    .col(big_integer(TicketCase::GuildId))
                    .col(string(TicketCase::Title))
                    .col(text_null(TicketCase::Description))
                    .col(big_integer(TicketCase::CreatedBy))
                    .col(
                        timestamp(TicketCase::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_null(TicketCase::ClosedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TicketCase::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TicketCase {
    Table,
    Id,
    GuildId,
    Title,
    Description,
    CreatedBy,
    CreatedAt,
    ClosedAt,
}
