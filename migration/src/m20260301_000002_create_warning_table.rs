use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warning::Table)
                    .if_not_exists()
                    .col(pk_auto(Warning::Id))
                    .col(big_integer(Warning::GuildId))
                    .col(big_integer(Warning::UserId))
                    .col(big_integer(Warning::ModeratorId))
                    .col(text_null(Warning::Reason))
                    .col(boolean(Warning::Forgiven).default(false))
                    .col(big_integer_null(Warning::ForgivenBy))
                    .col(
                        timestamp(Warning::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warning_guild_user")
                    .table(Warning::Table)
                    .col(Warning::GuildId)
                    .col(Warning::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_warning_guild_user")
                    .table(Warning::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Warning::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Warning {
    Table,
    Id,
    GuildId,
    UserId,
    ModeratorId,
    Reason,
    Forgiven,
    ForgivenBy,
    CreatedAt,
}
