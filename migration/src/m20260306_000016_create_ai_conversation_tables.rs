use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AiConversation::Table)
                    .if_not_exists()
                    .col(pk_auto(AiConversation::Id))
                    .col(big_integer(AiConversation::GuildId))
                    .col(big_integer(AiConversation::UserId))
                    .col(timestamp(AiConversation::CreatedAt))
                    .col(timestamp(AiConversation::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AiMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(AiMessage::Id))
                    .col(integer(AiMessage::ConversationId))
                    .col(string(AiMessage::Role))
                    .col(text(AiMessage::Content))
                    .col(timestamp(AiMessage::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ai_message_conversation_id")
                            .from(AiMessage::Table, AiMessage::ConversationId)
                            .to(AiConversation::Table, AiConversation::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AiMessage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AiConversation::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AiConversation {
    Table,
    Id,
    GuildId,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AiMessage {
    Table,
    Id,
    ConversationId,
    Role,
    Content,
    CreatedAt,
}
