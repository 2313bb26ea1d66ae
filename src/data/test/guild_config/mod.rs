use crate::{
    data::guild_config::GuildConfigRepository,
    model::guild_config::{UpdateGuildConfigParam, WarnExpireAction},
};
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::builder::TestBuilder;

mod get_or_create;
mod toggle_message_count;
mod update;
