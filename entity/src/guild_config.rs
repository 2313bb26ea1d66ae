use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guild_config")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub guild_id: i64,
    pub message_count_enabled: bool,
    pub link_preview_enabled: bool,
    pub warn_expire_hours: i32,
    pub warn_expire_action: String,
    pub ai_channel_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub ai_system_prompt: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
