use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ai_message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub conversation_id: i32,
    pub role: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ai_conversation::Entity",
        from = "Column::ConversationId",
        to = "super::ai_conversation::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    AiConversation,
}

impl Related<super::ai_conversation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiConversation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
