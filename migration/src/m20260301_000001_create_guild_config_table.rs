use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildConfig::Table)
                    .if_not_exists()
                    .col(big_integer(GuildConfig::GuildId).primary_key())
                    .col(boolean(GuildConfig::MessageCountEnabled).default(false))
                    .col(boolean(GuildConfig::LinkPreviewEnabled).default(false))
                    .col(integer(GuildConfig::WarnExpireHours).default(0))
                    .col(string(GuildConfig::WarnExpireAction).default("clear"))
                    .col(big_integer_null(GuildConfig::AiChannelId))
                    .col(text_null(GuildConfig::AiSystemPrompt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuildConfig::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum GuildConfig {
    Table,
    GuildId,
    MessageCountEnabled,
    LinkPreviewEnabled,
    WarnExpireHours,
    WarnExpireAction,
    AiChannelId,
    AiSystemPrompt,
}
