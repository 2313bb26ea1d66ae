//! Ticket data repository for database operations.
//!
//! Provides the `TicketRepository` for the lifecycle of individual tickets: creation
//! when a member opens one, lookups by channel, the per-member open ticket limit,
//! claiming, participant changes and closing.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::{
    error::AppError,
    model::ticket::{encode_ids, CreateTicketParam, Ticket, TicketSource},
};

/// Repository providing database operations for tickets.
///
/// This struct holds a reference to the database connection and provides methods
/// for creating, reading and updating ticket records.
pub struct TicketRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TicketRepository<'a> {
    /// Creates a new TicketRepository instance
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `TicketRepository` - new repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a newly opened ticket.
    ///
    /// # Arguments
    /// - `param` - Guild, ticket channel, creator and the button or option used
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The created ticket
    /// - `Err(AppError)` - Database error during insert
    pub async fn create(&self, param: CreateTicketParam) -> Result<Ticket, AppError> {
        let entity = entity::ticket::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(param.guild_id as i64),
            channel_id: ActiveValue::Set(param.channel_id as i64),
            creator_id: ActiveValue::Set(param.creator_id as i64),
            button_id: ActiveValue::Set(param.button_id),
            option_id: ActiveValue::Set(param.option_id),
            case_id: ActiveValue::Set(None),
            claimed_by: ActiveValue::Set(None),
            added_users: ActiveValue::Set(encode_ids(&[])),
            created_at: ActiveValue::Set(Utc::now()),
            closed_at: ActiveValue::Set(None),
        }
        .insert(self.db)
        .await?;

        Ticket::from_entity(entity)
    }

    /// Gets the ticket that lives in a channel.
    ///
    /// # Arguments
    /// - `channel_id` - Discord channel ID of the ticket channel
    ///
    /// # Returns
    /// - `Ok(Some(Ticket))` - The ticket, open or closed
    /// - `Ok(None)` - The channel is not a ticket
    /// - `Err(AppError)` - Database error during query
    pub async fn get_by_channel(&self, channel_id: u64) -> Result<Option<Ticket>, AppError> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::ChannelId.eq(channel_id as i64))
            .one(self.db)
            .await?
            .map(Ticket::from_entity)
            .transpose()
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Ticket>, AppError> {
        entity::prelude::Ticket::find_by_id(id)
            .one(self.db)
            .await?
            .map(Ticket::from_entity)
            .transpose()
    }

    /// Counts a member's open tickets that were opened from the same button or option.
    ///
    /// Used to enforce the per-member limit of the ticket source.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `creator_id` - Discord user ID of the member opening a ticket
    /// - `source` - Button or select option the ticket is opened from
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of open tickets from the source
    /// - `Err(DbErr)` - Database error during count
    pub async fn count_open_from_source(
        &self,
        guild_id: u64,
        creator_id: u64,
        source: &TicketSource,
    ) -> Result<u64, DbErr> {
        let query = entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::GuildId.eq(guild_id as i64))
            .filter(entity::ticket::Column::CreatorId.eq(creator_id as i64))
            .filter(entity::ticket::Column::ClosedAt.is_null());

        let query = match source {
            TicketSource::Button(button) => {
                query.filter(entity::ticket::Column::ButtonId.eq(button.id))
            }
            TicketSource::SelectOption(option) => {
                query.filter(entity::ticket::Column::OptionId.eq(option.id))
            }
        };

        query.count(self.db).await
    }

    /// Gets a member's open tickets in a guild, oldest first.
    pub async fn get_open_by_creator(
        &self,
        guild_id: u64,
        creator_id: u64,
    ) -> Result<Vec<Ticket>, AppError> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::GuildId.eq(guild_id as i64))
            .filter(entity::ticket::Column::CreatorId.eq(creator_id as i64))
            .filter(entity::ticket::Column::ClosedAt.is_null())
            .order_by_asc(entity::ticket::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Ticket::from_entity)
            .collect()
    }

    /// Gets the tickets linked to a case.
    pub async fn get_by_case(&self, case_id: i32) -> Result<Vec<Ticket>, AppError> {
        entity::prelude::Ticket::find()
            .filter(entity::ticket::Column::CaseId.eq(case_id))
            .order_by_asc(entity::ticket::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Ticket::from_entity)
            .collect()
    }

    /// Marks a ticket as closed.
    pub async fn close(&self, id: i32, closed_at: DateTime<Utc>) -> Result<(), DbErr> {
        entity::ticket::ActiveModel {
            id: ActiveValue::Unchanged(id),
            closed_at: ActiveValue::Set(Some(closed_at)),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }

    /// Sets or clears the staff member handling a ticket.
    pub async fn set_claimed_by(&self, id: i32, claimed_by: Option<u64>) -> Result<(), DbErr> {
        entity::ticket::ActiveModel {
            id: ActiveValue::Unchanged(id),
            claimed_by: ActiveValue::Set(claimed_by.map(|id| id as i64)),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }

    /// Replaces the list of members added to a ticket besides its creator.
    pub async fn set_added_users(&self, id: i32, users: &[u64]) -> Result<(), DbErr> {
        entity::ticket::ActiveModel {
            id: ActiveValue::Unchanged(id),
            added_users: ActiveValue::Set(encode_ids(users)),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }

    /// Links a ticket to a case, or unlinks it with `None`.
    pub async fn set_case(&self, id: i32, case_id: Option<i32>) -> Result<(), DbErr> {
        entity::ticket::ActiveModel {
            id: ActiveValue::Unchanged(id),
            case_id: ActiveValue::Set(case_id),
            ..Default::default()
        }
        .update(self.db)
        .await?;

        Ok(())
    }
}
