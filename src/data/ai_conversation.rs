//! AI conversation data repository.
//!
//! Each member has one running conversation per guild. Messages are appended as the
//! relay talks to the provider and the most recent ones are replayed as context.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::model::ai::{AiConversation, AiMessage, AiRole};

pub struct AiConversationRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AiConversationRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the member's conversation in a guild, starting one when missing.
    pub async fn get_or_create(&self, guild_id: u64, user_id: u64) -> Result<AiConversation, DbErr> {
        let existing = entity::prelude::AiConversation::find()
            .filter(entity::ai_conversation::Column::GuildId.eq(guild_id as i64))
            .filter(entity::ai_conversation::Column::UserId.eq(user_id as i64))
            .one(self.db)
            .await?;

        if let Some(existing) = existing {
            return Ok(AiConversation::from_entity(existing));
        }

        let now = Utc::now();
        let entity = entity::ai_conversation::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(guild_id as i64),
            user_id: ActiveValue::Set(user_id as i64),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await?;

        Ok(AiConversation::from_entity(entity))
    }

    /// Appends a message and bumps the conversation's `updated_at`.
    pub async fn append(
        &self,
        conversation_id: i32,
        role: AiRole,
        content: String,
    ) -> Result<AiMessage, DbErr> {
        let now = Utc::now();

        let entity = entity::ai_message::ActiveModel {
            id: ActiveValue::NotSet,
            conversation_id: ActiveValue::Set(conversation_id),
            role: ActiveValue::Set(role.as_str().to_string()),
            content: ActiveValue::Set(content),
            created_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await?;

        entity::ai_conversation::ActiveModel {
            id: ActiveValue::Unchanged(conversation_id),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(AiMessage::from_entity(entity))
    }

    /// Gets the last `limit` messages of a conversation in chronological order.
    pub async fn recent(&self, conversation_id: i32, limit: u64) -> Result<Vec<AiMessage>, DbErr> {
        let mut entities = entity::prelude::AiMessage::find()
            .filter(entity::ai_message::Column::ConversationId.eq(conversation_id))
            .order_by_desc(entity::ai_message::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;

        entities.reverse();

        Ok(entities.into_iter().map(AiMessage::from_entity).collect())
    }

    /// Deletes the member's conversation and its messages.
    ///
    /// # Returns
    /// - `Ok(true)` - A conversation existed and was removed
    /// - `Ok(false)` - The member had no conversation
    pub async fn reset(&self, guild_id: u64, user_id: u64) -> Result<bool, DbErr> {
        let Some(conversation) = entity::prelude::AiConversation::find()
            .filter(entity::ai_conversation::Column::GuildId.eq(guild_id as i64))
            .filter(entity::ai_conversation::Column::UserId.eq(user_id as i64))
            .one(self.db)
            .await?
        else {
            return Ok(false);
        };

        entity::prelude::AiMessage::delete_many()
            .filter(entity::ai_message::Column::ConversationId.eq(conversation.id))
            .exec(self.db)
            .await?;
        entity::prelude::AiConversation::delete_by_id(conversation.id)
            .exec(self.db)
            .await?;

        Ok(true)
    }
}
