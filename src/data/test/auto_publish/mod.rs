use crate::data::auto_publish::AutoPublishRepository;
use sea_orm::DbErr;
use test_utils::builder::TestBuilder;

mod blacklist;
mod remove_channel;
