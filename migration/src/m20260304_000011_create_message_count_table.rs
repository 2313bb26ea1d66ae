use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MessageCount::Table)
                    .if_not_exists()
                    .col(pk_auto(MessageCount::Id))
                    .col(big_integer(MessageCount::GuildId))
                    .col(big_integer(MessageCount::ChannelId))
                    .col(big_integer(MessageCount::UserId))
                    .col(big_integer(MessageCount::Count).default(0))
                    .col(timestamp(MessageCount::LastMessageAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_message_count_guild_channel_user")
                    .table(MessageCount::Table)
                    .col(MessageCount::GuildId)
                    .col(MessageCount::ChannelId)
                    .col(MessageCount::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_message_count_guild_channel_user")
                    .table(MessageCount::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MessageCount::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MessageCount {
    Table,
    Id,
    GuildId,
    ChannelId,
    UserId,
    Count,
    LastMessageAt,
}
