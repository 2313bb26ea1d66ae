use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ai_conversation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ai_message::Entity")]
    AiMessage,
}

impl Related<super::ai_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiMessage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
