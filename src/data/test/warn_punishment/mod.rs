use crate::{data::warn_punishment::WarnPunishmentRepository, error::AppError, model::moderation::Punishment};
use test_utils::builder::TestBuilder;

mod get_all;
mod get_for_count;
mod set;
