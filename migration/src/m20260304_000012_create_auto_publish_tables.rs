use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AutoPublishChannel::Table)
                    .if_not_exists()
                    .col(pk_auto(AutoPublishChannel::Id))
                    .col(big_integer(AutoPublishChannel::GuildId))
                    .col(big_integer(AutoPublishChannel::ChannelId).unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PublishUserBlacklist::Table)
                    .if_not_exists()
                    .col(pk_auto(PublishUserBlacklist::Id))
                    .col(big_integer(PublishUserBlacklist::ChannelId))
                    .col(big_integer(PublishUserBlacklist::UserId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PublishWordBlacklist::Table)
                    .if_not_exists()
                    .col(pk_auto(PublishWordBlacklist::Id))
                    .col(big_integer(PublishWordBlacklist::ChannelId))
                    .col(string(PublishWordBlacklist::Word))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PublishWordBlacklist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PublishUserBlacklist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AutoPublishChannel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AutoPublishChannel {
    Table,
    Id,
    GuildId,
    ChannelId,
}

#[derive(DeriveIden)]
enum PublishUserBlacklist {
    Table,
    Id,
    ChannelId,
    UserId,
}

#[derive(DeriveIden)]
enum PublishWordBlacklist {
    Table,
    Id,
    ChannelId,
    Word,
}
