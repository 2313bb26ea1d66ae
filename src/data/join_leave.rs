//! Join/leave event data repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::join_leave::JoinLeaveEvent;

pub struct JoinLeaveRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> JoinLeaveRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a member joining (`is_join`) or leaving a guild.
    pub async fn record(
        &self,
        guild_id: u64,
        user_id: u64,
        is_join: bool,
        at: DateTime<Utc>,
    ) -> Result<JoinLeaveEvent, DbErr> {
        let entity = entity::join_leave_event::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(guild_id as i64),
            user_id: ActiveValue::Set(user_id as i64),
            is_join: ActiveValue::Set(is_join),
            created_at: ActiveValue::Set(at),
        }
        .insert(self.db)
        .await?;

        Ok(JoinLeaveEvent::from_entity(entity))
    }

    /// Gets joins or leaves recorded at or after `since`, oldest first.
    pub async fn get_since(
        &self,
        guild_id: u64,
        is_join: bool,
        since: DateTime<Utc>,
    ) -> Result<Vec<JoinLeaveEvent>, DbErr> {
        let entities = entity::prelude::JoinLeaveEvent::find()
            .filter(entity::join_leave_event::Column::GuildId.eq(guild_id as i64))
            .filter(entity::join_leave_event::Column::IsJoin.eq(is_join))
            .filter(entity::join_leave_event::Column::CreatedAt.gte(since))
            .order_by_asc(entity::join_leave_event::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(JoinLeaveEvent::from_entity).collect())
    }

    /// Deletes every recorded event of a guild.
    pub async fn clear(&self, guild_id: u64) -> Result<u64, DbErr> {
        let result = entity::prelude::JoinLeaveEvent::delete_many()
            .filter(entity::join_leave_event::Column::GuildId.eq(guild_id as i64))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
