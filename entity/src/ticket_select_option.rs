use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_select_option")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub menu_id: i32,
    pub label: String,
    pub description: Option<String>,
    pub emoji: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub open_message: Option<String>,
    pub category_id: Option<i64>,
    pub archive_category_id: Option<i64>,
    /// JSON array of role ids
    #[sea_orm(column_type = "Text")]
    pub support_roles: String,
    pub max_tickets: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ticket_select_menu::Entity",
        from = "Column::MenuId",
        to = "super::ticket_select_menu::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TicketSelectMenu,
}

impl Related<super::ticket_select_menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketSelectMenu.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
