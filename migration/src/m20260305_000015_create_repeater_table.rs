use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repeater::Table)
                    .if_not_exists()
                    .col(pk_auto(Repeater::Id))
                    .col(big_integer(Repeater::GuildId))
                    .col(big_integer(Repeater::ChannelId))
                    .col(text(Repeater::Message))
                    .col(big_integer(Repeater::IntervalSeconds))
                    .col(boolean(Repeater::NoRedundant).default(false))
                    .col(big_integer_null(Repeater::LastMessageId))
                    .col(
                        timestamp(Repeater::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Repeater::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Repeater {
    Table,
    Id,
    GuildId,
    ChannelId,
    Message,
    IntervalSeconds,
    NoRedundant,
    LastMessageId,
    CreatedAt,
}
