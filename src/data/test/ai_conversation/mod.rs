use crate::{data::ai_conversation::AiConversationRepository, model::ai::AiRole};
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod recent;
