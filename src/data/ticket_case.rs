//! Ticket case data repository.
//!
//! Cases group related tickets (for example several reports about the same member).

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    data::ticket::TicketRepository,
    error::AppError,
    model::ticket::{CreateTicketCaseParam, TicketCase, TicketCaseWithTickets},
};

pub struct TicketCaseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketCaseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, param: CreateTicketCaseParam) -> Result<TicketCase, DbErr> {
        let entity = entity::ticket_case::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(param.guild_id as i64),
            title: ActiveValue::Set(param.title),
            description: ActiveValue::Set(param.description),
            created_by: ActiveValue::Set(param.created_by as i64),
            created_at: ActiveValue::Set(Utc::now()),
            closed_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ok(TicketCase::from_entity(entity))
    }

    pub async fn get_by_id(&self, guild_id: u64, id: i32) -> Result<Option<TicketCase>, DbErr> {
        let entity = entity::prelude::TicketCase::find_by_id(id)
            .filter(entity::ticket_case::Column::GuildId.eq(guild_id as i64))
            .one(self.db)
            .await?;

        Ok(entity.map(TicketCase::from_entity))
    }

    /// Gets the cases of a guild, newest first.
    pub async fn get_all(&self, guild_id: u64, include_closed: bool) -> Result<Vec<TicketCase>, DbErr> {
        let mut query = entity::prelude::TicketCase::find()
            .filter(entity::ticket_case::Column::GuildId.eq(guild_id as i64));

        if !include_closed {
            query = query.filter(entity::ticket_case::Column::ClosedAt.is_null());
        }

        let entities = query
            .order_by_desc(entity::ticket_case::Column::CreatedAt)
            .order_by_desc(entity::ticket_case::Column::Id)
            .all(self.db)
            .await?;

        Ok(entities.into_iter().map(TicketCase::from_entity).collect())
    }

    /// Gets a case together with the tickets linked to it.
    pub async fn get_with_tickets(
        &self,
        guild_id: u64,
        id: i32,
    ) -> Result<Option<TicketCaseWithTickets>, AppError> {
        let Some(case) = self.get_by_id(guild_id, id).await? else {
            return Ok(None);
        };

        let tickets = TicketRepository::new(self.db).get_by_case(case.id).await?;

        Ok(Some(TicketCaseWithTickets { case, tickets }))
    }

    /// Closes a case.
    ///
    /// # Returns
    /// - `Ok(Some(TicketCase))` - The closed case
    /// - `Ok(None)` - No such case in this guild
    /// - `Err(DbErr)` - Database error during update
    pub async fn close(&self, guild_id: u64, id: i32) -> Result<Option<TicketCase>, DbErr> {
        let Some(existing) = entity::prelude::TicketCase::find_by_id(id)
            .filter(entity::ticket_case::Column::GuildId.eq(guild_id as i64))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: entity::ticket_case::ActiveModel = existing.into();
        active.closed_at = ActiveValue::Set(Some(Utc::now()));
        let entity = active.update(self.db).await?;

        Ok(Some(TicketCase::from_entity(entity)))
    }
}
