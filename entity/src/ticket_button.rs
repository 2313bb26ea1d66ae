use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_button")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub panel_id: i32,
    pub label: String,
    pub emoji: Option<String>,
    pub style: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub open_message: Option<String>,
    pub channel_name_format: String,
    pub category_id: Option<i64>,
    pub archive_category_id: Option<i64>,
    /// JSON array of role ids
    #[sea_orm(column_type = "Text")]
    pub support_roles: String,
    /// JSON array of role ids
    #[sea_orm(column_type = "Text")]
    pub viewer_roles: String,
    pub max_tickets: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ticket_panel::Entity",
        from = "Column::PanelId",
        to = "super::ticket_panel::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    TicketPanel,
}

impl Related<super::ticket_panel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketPanel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
