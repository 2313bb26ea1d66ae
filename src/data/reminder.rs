//! Reminder data repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::reminder::{CreateReminderParam, Reminder};

pub struct ReminderRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReminderRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateReminderParam) -> Result<Reminder, DbErr> {
        let entity = entity::reminder::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(param.user_id as i64),
            channel_id: ActiveValue::Set(param.channel_id as i64),
            guild_id: ActiveValue::Set(param.guild_id.map(|id| id as i64)),
            message: ActiveValue::Set(param.message),
            is_private: ActiveValue::Set(param.is_private),
            remind_at: ActiveValue::Set(param.remind_at),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(Reminder::from_entity(entity))
    }

    /// Gets a user's pending reminders, soonest first.
    pub async fn get_by_user(&self, user_id: u64) -> Result<Vec<Reminder>, DbErr> {
        let entities = entity::prelude::Reminder::find()
            .filter(entity::reminder::Column::UserId.eq(user_id as i64))
            .order_by_asc(entity::reminder::Column::RemindAt)
            .order_by_asc(entity::reminder::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Reminder::from_entity).collect())
    }

    /// Gets reminders whose time has come, soonest first.
    pub async fn get_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, DbErr> {
        let entities = entity::prelude::Reminder::find()
            .filter(entity::reminder::Column::RemindAt.lte(now))
            .order_by_asc(entity::reminder::Column::RemindAt)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Reminder::from_entity).collect())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Reminder::delete_by_id(id)
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
