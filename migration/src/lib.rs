pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_guild_config_table;
mod m20260301_000002_create_warning_table;
mod m20260301_000003_create_warn_punishment_table;
mod m20260302_000004_create_music_settings_table;
mod m20260303_000005_create_ticket_panel_table;
mod m20260303_000006_create_ticket_button_table;
mod m20260303_000007_create_ticket_select_menu_table;
mod m20260303_000008_create_ticket_select_option_table;
mod m20260303_000009_create_ticket_case_table;
mod m20260303_000010_create_ticket_table;
mod m20260304_000011_create_message_count_table;
mod m20260304_000012_create_auto_publish_tables;
mod m20260305_000013_create_join_leave_event_table;
mod m20260305_000014_create_reminder_table;
mod m20260305_000015_create_repeater_table;
mod m20260306_000016_create_ai_conversation_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_guild_config_table::Migration),
            Box::new(m20260301_000002_create_warning_table::Migration),
            Box::new(m20260301_000003_create_warn_punishment_table::Migration),
            Box::new(m20260302_000004_create_music_settings_table::Migration),
            Box::new(m20260303_000005_create_ticket_panel_table::Migration),
            Box::new(m20260303_000006_create_ticket_button_table::Migration),
            Box::new(m20260303_000007_create_ticket_select_menu_table::Migration),
            Box::new(m20260303_000008_create_ticket_select_option_table::Migration),
            Box::new(m20260303_000009_create_ticket_case_table::Migration),
            Box::new(m20260303_000010_create_ticket_table::Migration),
            Box::new(m20260304_000011_create_message_count_table::Migration),
            Box::new(m20260304_000012_create_auto_publish_tables::Migration),
            Box::new(m20260305_000013_create_join_leave_event_table::Migration),
            Box::new(m20260305_000014_create_reminder_table::Migration),
            Box::new(m20260305_000015_create_repeater_table::Migration),
            Box::new(m20260306_000016_create_ai_conversation_tables::Migration),
        ]
    }
}
