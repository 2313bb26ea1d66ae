use crate::{
    data::{ticket::TicketRepository, ticket_button::TicketButtonRepository},
    error::AppError,
    model::ticket::{CreateTicketParam, TicketSource},
};
use chrono::Utc;
use test_utils::{builder::TestBuilder, factory};

mod count_open_from_source;
mod create;
