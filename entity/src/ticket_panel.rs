use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_panel")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub channel_id: i64,
    pub message_id: Option<i64>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub color: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ticket_button::Entity")]
    TicketButton,
    #[sea_orm(has_many = "super::ticket_select_menu::Entity")]
    TicketSelectMenu,
}

impl Related<super::ticket_button::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketButton.def()
    }
}

impl Related<super::ticket_select_menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketSelectMenu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
