use crate::{
    data::warning::WarningRepository,
    model::{
        guild_config::WarnExpireAction,
        moderation::{CreateWarningParam, WarningSelector},
    },
};
use chrono::{Duration, Utc};
use sea_orm::{DbErr, EntityTrait};
use test_utils::{builder::TestBuilder, factory};

mod count_active;
mod expire_before;
mod forgive;
mod get_active_page;
mod select_ids;
