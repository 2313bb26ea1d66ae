use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WarnPunishment::Table)
                    .if_not_exists()
                    .col(pk_auto(WarnPunishment::Id))
                    .col(big_integer(WarnPunishment::GuildId))
                    .col(integer(WarnPunishment::Count))
                    .col(string(WarnPunishment::Punishment))
                    .col(integer_null(WarnPunishment::DurationMinutes))
                    .col(big_integer_null(WarnPunishment::RoleId))
                    .to_owned(),
            )
            .await?;

        // One punishment per warning count in a guild
        manager
            .create_index(
                Index::create()
                    .name("idx_warn_punishment_guild_count")
                    .table(WarnPunishment::Table)
                    .col(WarnPunishment::GuildId)
                    .col(WarnPunishment::Count)
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
                    .name("idx_warn_punishment_guild_count")
                    .table(WarnPunishment::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(WarnPunishment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WarnPunishment {
    Table,
    Id,
    GuildId,
    Count,
    Punishment,
    DurationMinutes,
    RoleId,
}
