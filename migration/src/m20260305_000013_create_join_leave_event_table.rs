use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JoinLeaveEvent::Table)
                    .if_not_exists()
                    .col(pk_auto(JoinLeaveEvent::Id))
                    .col(big_integer(JoinLeaveEvent::GuildId))
                    .col(big_integer(JoinLeaveEvent::UserId))
                    .col(boolean(JoinLeaveEvent::IsJoin))
                    .col(timestamp(JoinLeaveEvent::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_join_leave_event_guild_created")
                    .table(JoinLeaveEvent::Table)
                    .col(JoinLeaveEvent::GuildId)
                    .col(JoinLeaveEvent::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_join_leave_event_guild_created")
                    .table(JoinLeaveEvent::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(JoinLeaveEvent::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum JoinLeaveEvent {
    Table,
    Id,
    GuildId,
    UserId,
    IsJoin,
    CreatedAt,
}
