use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "ticket_select_menu")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub panel_id: i32,
    pub placeholder: String,
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
    #[sea_orm(has_many = "super::ticket_select_option::Entity")]
    TicketSelectOption,
}

impl Related<super::ticket_panel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketPanel.def()
    }
}

impl Related<super::ticket_select_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TicketSelectOption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
