use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    #[sea_orm(unique)]
    pub channel_id: i64,
    pub creator_id: i64,
    pub button_id: Option<i32>,
    pub option_id: Option<i32>,
    pub case_id: Option<i32>,
    pub claimed_by: Option<i64>,
    /// JSON array of user ids added after creation
    #[sea_orm(column_type = "Text")]
    pub added_users: String,
    pub created_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
