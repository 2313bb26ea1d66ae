use crate::{data::reminder::ReminderRepository, model::reminder::CreateReminderParam};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod get_due;
