//! Ticket factory for creating test ticket entities.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::factory::helpers::next_snowflake;

/// Factory for creating tickets opened from a button.
pub struct TicketFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: i64,
    creator_id: i64,
    button_id: Option<i32>,
    option_id: Option<i32>,
    case_id: Option<i32>,
    channel_id: i64,
    closed_at: Option<DateTime<Utc>>,
}

impl<'a> TicketFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: i64, creator_id: i64) -> Self {
        Self {
            db,
            guild_id,
            creator_id,
            button_id: None,
            option_id: None,
            case_id: None,
            channel_id: next_snowflake(),
            closed_at: None,
        }
    }

    pub fn button_id(mut self, button_id: i32) -> Self {
        self.button_id = Some(button_id);
        self
    }

    pub fn option_id(mut self, option_id: i32) -> Self {
        self.option_id = Some(option_id);
        self
    }

    pub fn case_id(mut self, case_id: i32) -> Self {
        self.case_id = Some(case_id);
        self
    }

    pub fn channel_id(mut self, channel_id: i64) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed_at = Some(Utc::now());
        self
    }

    pub async fn build(self) -> Result<entity::ticket::Model, DbErr> {
        entity::ticket::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            creator_id: ActiveValue::Set(self.creator_id),
            button_id: ActiveValue::Set(self.button_id),
            option_id: ActiveValue::Set(self.option_id),
            case_id: ActiveValue::Set(self.case_id),
            claimed_by: ActiveValue::Set(None),
            added_users: ActiveValue::Set("[]".to_string()),
            created_at: ActiveValue::Set(Utc::now()),
            closed_at: ActiveValue::Set(self.closed_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an open ticket from the given button.
pub async fn create_ticket(
    db: &DatabaseConnection,
    guild_id: i64,
    creator_id: i64,
    button_id: i32,
) -> Result<entity::ticket::Model, DbErr> {
    TicketFactory::new(db, guild_id, creator_id)
        .button_id(button_id)
        .build()
        .await
}
