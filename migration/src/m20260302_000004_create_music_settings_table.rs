use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MusicSettings::Table)
                    .if_not_exists()
                    .col(big_integer(MusicSettings::GuildId).primary_key())
                    .col(integer(MusicSettings::Volume).default(100))
                    .col(string(MusicSettings::RepeatMode).default("off"))
                    .col(integer(MusicSettings::AutoplayAmount).default(0))
                    .col(big_integer_null(MusicSettings::MusicChannelId))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MusicSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MusicSettings {
    Table,
    GuildId,
    Volume,
    RepeatMode,
    AutoplayAmount,
    MusicChannelId,
}
