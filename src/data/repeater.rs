//! Repeater data repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::model::repeater::{CreateRepeaterParam, Repeater};

pub struct RepeaterRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RepeaterRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateRepeaterParam) -> Result<Repeater, DbErr> {
        let entity = entity::repeater::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(param.guild_id as i64),
            channel_id: ActiveValue::Set(param.channel_id as i64),
            message: ActiveValue::Set(param.message),
            interval_seconds: ActiveValue::Set(param.interval.as_secs() as i64),
            no_redundant: ActiveValue::Set(param.no_redundant),
            last_message_id: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(Repeater::from_entity(entity))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Repeater>, DbErr> {
        let entity = entity::prelude::Repeater::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Repeater::from_entity))
    }

    pub async fn get_by_guild(&self, guild_id: u64) -> Result<Vec<Repeater>, DbErr> {
        let entities = entity::prelude::Repeater::find()
            .filter(entity::repeater::Column::GuildId.eq(guild_id as i64))
            .order_by_asc(entity::repeater::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Repeater::from_entity).collect())
    }

    /// Gets every repeater across all guilds, used to start runners on ready.
    pub async fn get_all(&self) -> Result<Vec<Repeater>, DbErr> {
        let entities = entity::prelude::Repeater::find()
            .order_by_asc(entity::repeater::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(Repeater::from_entity).collect())
    }

    pub async fn delete(&self, guild_id: u64, id: i32) -> Result<bool, DbErr> {
        let result = entity::prelude::Repeater::delete_many()
            .filter(entity::repeater::Column::Id.eq(id))
            .filter(entity::repeater::Column::GuildId.eq(guild_id as i64))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Remembers the id of the message the repeater posted last.
    pub async fn set_last_message_id(&self, id: i32, message_id: u64) -> Result<(), DbErr> {
        entity::repeater::ActiveModel {
            id: ActiveValue::Unchanged(id),
            last_message_id: ActiveValue::Set(Some(message_id as i64)),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }
}
