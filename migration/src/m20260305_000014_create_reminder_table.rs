use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reminder::Table)
                    .if_not_exists()
                    .col(pk_auto(Reminder::Id))
                    .col(big_integer(Reminder::UserId))
                    .col(big_integer(Reminder::ChannelId))
                    .col(big_integer_null(Reminder::GuildId))
                    .col(text(Reminder::Message))
                    .col(boolean(Reminder::IsPrivate))
                    .col(timestamp(Reminder::RemindAt))
                    .col(
                        timestamp(Reminder::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reminder_remind_at")
                    .table(Reminder::Table)
                    .col(Reminder::RemindAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reminder_remind_at")
                    .table(Reminder::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Reminder::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reminder {
    Table,
    Id,
    UserId,
    ChannelId,
    GuildId,
    Message,
    IsPrivate,
    RemindAt,
    CreatedAt,
}
