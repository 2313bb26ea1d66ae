pub use super::ai_conversation::Entity as AiConversation;
pub use super::ai_message::Entity as AiMessage;
pub use super::auto_publish_channel::Entity as AutoPublishChannel;
pub use super::guild_config::Entity as GuildConfig;
pub use super::join_leave_event::Entity as JoinLeaveEvent;
pub use super::message_count::Entity as MessageCount;
pub use super::music_settings::Entity as MusicSettings;
pub use super::publish_user_blacklist::Entity as PublishUserBlacklist;
pub use super::publish_word_blacklist::Entity as PublishWordBlacklist;
pub use super::reminder::Entity as Reminder;
pub use super::repeater::Entity as Repeater;
pub use super::ticket::Entity as Ticket;
pub use super::ticket_button::Entity as TicketButton;
pub use super::ticket_case::Entity as TicketCase;
pub use super::ticket_panel::Entity as TicketPanel;
pub use super::ticket_select_menu::Entity as TicketSelectMenu;
pub use super::ticket_select_option::Entity as TicketSelectOption;
pub use super::warn_punishment::Entity as WarnPunishment;
pub use super::warning::Entity as Warning;
