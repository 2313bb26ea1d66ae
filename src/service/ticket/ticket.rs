use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::{
    ButtonStyle, ChannelId, ChannelType, CreateActionRow, CreateButton, CreateChannel,
    CreateMessage, EditChannel, GuildId, Http, PermissionOverwrite, PermissionOverwriteType,
    Permissions, RoleId, UserId,
};

use crate::data::ticket::TicketRepository;
use crate::data::ticket_button::TicketButtonRepository;
use crate::data::ticket_panel::TicketPanelRepository;
use crate::data::ticket_select_menu::TicketSelectMenuRepository;
use crate::error::AppError;
use crate::model::ticket::{CreateTicketParam, Ticket, TicketSource};
use crate::service::ticket::component::TicketComponent;
use crate::util::embed;

/// Discord's limit on channel name length.
const CHANNEL_NAME_LIMIT: usize = 100;

const DEFAULT_OPEN_MESSAGE: &str =
    "Thanks for reaching out! Describe your issue and a staff member will be with you shortly.";

/// Builds a ticket channel name from a format such as `ticket-{username}`.
///
/// `{username}` and `{id}` are substituted, then the result is lowercased and reduced to
/// characters Discord keeps in text channel names.
pub fn format_channel_name(format: &str, username: &str, user_id: u64) -> String {
    let raw = format
        .replace("{username}", username)
        .replace("{id}", &user_id.to_string())
        .to_lowercase();

    let mut name = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_alphanumeric() || c == '_' {
            name.push(c);
        } else if (c == '-' || c.is_whitespace()) && !name.ends_with('-') {
            name.push('-');
        }
    }

    let name: String = name
        .trim_matches('-')
        .chars()
        .take(CHANNEL_NAME_LIMIT)
        .collect();

    if name.is_empty() {
        format!("ticket-{}", user_id)
    } else {
        name
    }
}

fn member_access() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::SEND_MESSAGES
        | Permissions::READ_MESSAGE_HISTORY
        | Permissions::ATTACH_FILES
        | Permissions::EMBED_LINKS
}

fn member_overwrite(user_id: u64) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: member_access(),
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Member(UserId::new(user_id)),
    }
}

/// Permission overwrites of a new ticket channel.
///
/// Everyone is denied, the creator and support roles get full access, viewer roles can
/// read but not send, and the bot can manage the channel.
pub fn build_overwrites(
    guild_id: u64,
    bot_id: u64,
    creator_id: u64,
    support_roles: &[u64],
    viewer_roles: &[u64],
) -> Vec<PermissionOverwrite> {
    let mut overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            // @everyone shares the guild id
            kind: PermissionOverwriteType::Role(RoleId::new(guild_id)),
        },
        PermissionOverwrite {
            allow: member_access() | Permissions::MANAGE_CHANNELS,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(UserId::new(bot_id)),
        },
        member_overwrite(creator_id),
    ];

    overwrites.extend(support_roles.iter().map(|&role_id| PermissionOverwrite {
        allow: member_access(),
        deny: Permissions::empty(),
        kind: PermissionOverwriteType::Role(RoleId::new(role_id)),
    }));

    overwrites.extend(
        viewer_roles
            .iter()
            .filter(|role_id| !support_roles.contains(role_id))
            .map(|&role_id| PermissionOverwrite {
                allow: Permissions::VIEW_CHANNEL | Permissions::READ_MESSAGE_HISTORY,
                deny: Permissions::SEND_MESSAGES,
                kind: PermissionOverwriteType::Role(RoleId::new(role_id)),
            }),
    );

    overwrites
}

pub struct TicketService<'a> {
    db: &'a DatabaseConnection,
    http: &'a Http,
}

impl<'a> TicketService<'a> {
    pub fn new(db: &'a DatabaseConnection, http: &'a Http) -> Self {
        Self { db, http }
    }

    /// Resolves a panel button into a ticket source, checking it belongs to the guild.
    pub async fn source_for_button(
        &self,
        guild_id: u64,
        button_id: i32,
    ) -> Result<TicketSource, AppError> {
        let button = TicketButtonRepository::new(self.db)
            .get_by_id(button_id)
            .await?
            .ok_or_else(|| AppError::NotFound("This ticket button no longer exists".to_string()))?;

        self.ensure_panel_in_guild(guild_id, button.panel_id).await?;

        Ok(TicketSource::Button(button))
    }

    /// Resolves a select menu option into a ticket source, checking it belongs to the guild.
    pub async fn source_for_option(
        &self,
        guild_id: u64,
        option_id: i32,
    ) -> Result<TicketSource, AppError> {
        let menu_repo = TicketSelectMenuRepository::new(self.db);

        let option = menu_repo
            .get_option(option_id)
            .await?
            .ok_or_else(|| AppError::NotFound("This ticket option no longer exists".to_string()))?;
        let menu = menu_repo
            .get_by_id(option.menu_id)
            .await?
            .ok_or_else(|| AppError::NotFound("This ticket menu no longer exists".to_string()))?;

        self.ensure_panel_in_guild(guild_id, menu.panel_id).await?;

        Ok(TicketSource::SelectOption(option))
    }

    /// Gets the button or option a ticket was opened from, if it still exists.
    pub async fn source_of(&self, ticket: &Ticket) -> Result<Option<TicketSource>, AppError> {
        if let Some(button_id) = ticket.button_id {
            return Ok(TicketButtonRepository::new(self.db)
                .get_by_id(button_id)
                .await?
                .map(TicketSource::Button));
        }

        if let Some(option_id) = ticket.option_id {
            return Ok(TicketSelectMenuRepository::new(self.db)
                .get_option(option_id)
                .await?
                .map(TicketSource::SelectOption));
        }

        Ok(None)
    }

    /// Opens a ticket: creates the private channel, stores the ticket and posts the
    /// open message.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the panel lives in
    /// - `bot_id` - The bot's user id, granted access to the channel
    /// - `creator_id` / `creator_name` - Member opening the ticket
    /// - `source` - Button or select option that was used
    ///
    /// # Returns
    /// - `Ok(Ticket)` - The new ticket
    /// - `Err(AppError::BadRequest)` - The member reached the source's open ticket limit
    /// - `Err(AppError)` - Discord or database error
    pub async fn open(
        &self,
        guild_id: u64,
        bot_id: u64,
        creator_id: u64,
        creator_name: &str,
        source: &TicketSource,
    ) -> Result<Ticket, AppError> {
        let repo = TicketRepository::new(self.db);

        let max_tickets = source.max_tickets();
        if max_tickets > 0 {
            let open = repo
                .count_open_from_source(guild_id, creator_id, source)
                .await?;
            if open >= max_tickets as u64 {
                return Err(AppError::BadRequest(format!(
                    "You already have {} open ticket(s) for {}",
                    open,
                    source.label()
                )));
            }
        }

        let name = format_channel_name(source.channel_name_format(), creator_name, creator_id);
        let overwrites = build_overwrites(
            guild_id,
            bot_id,
            creator_id,
            source.support_roles(),
            source.viewer_roles(),
        );

        let mut builder = CreateChannel::new(name)
            .kind(ChannelType::Text)
            .permissions(overwrites);
        if let Some(category_id) = source.category_id() {
            builder = builder.category(ChannelId::new(category_id));
        }

        let channel = GuildId::new(guild_id)
            .create_channel(self.http, builder)
            .await?;

        let (button_id, option_id) = match source {
            TicketSource::Button(button) => (Some(button.id), None),
            TicketSource::SelectOption(option) => (None, Some(option.id)),
        };

        let ticket = match repo
            .create(CreateTicketParam {
                guild_id,
                channel_id: channel.id.get(),
                creator_id,
                button_id,
                option_id,
            })
            .await
        {
            Ok(ticket) => ticket,
            Err(e) => {
                if let Err(delete_err) = channel.id.delete(self.http).await {
                    tracing::error!(
                        "Failed to delete orphaned ticket channel {}: {:?}",
                        channel.id,
                        delete_err
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Opened ticket {} for {} in guild {} from '{}'",
            ticket.id,
            creator_id,
            guild_id,
            source.label()
        );

        let pings = std::iter::once(format!("<@{}>", creator_id))
            .chain(source.support_roles().iter().map(|id| format!("<@&{}>", id)))
            .collect::<Vec<_>>()
            .join(" ");

        let message = CreateMessage::new()
            .content(pings)
            .embed(
                embed::info_embed()
                    .title(source.label())
                    .description(source.open_message().unwrap_or(DEFAULT_OPEN_MESSAGE)),
            )
            .components(vec![ticket_controls()]);

        if let Err(e) = channel.id.send_message(self.http, message).await {
            tracing::error!("Failed to post open message in ticket {}: {:?}", ticket.id, e);
        }

        Ok(ticket)
    }

    /// Closes the ticket living in `channel_id`.
    ///
    /// With an archive category the channel is moved there and the creator and added
    /// members lose access; otherwise the channel is deleted.
    pub async fn close(&self, channel_id: u64, closed_by: u64) -> Result<Ticket, AppError> {
        let ticket = self.get_open(channel_id).await?;
        let channel = ChannelId::new(channel_id);

        let archive = self
            .source_of(&ticket)
            .await?
            .and_then(|source| source.archive_category_id());

        match archive {
            Some(category_id) => {
                channel
                    .edit(
                        self.http,
                        EditChannel::new().category(Some(ChannelId::new(category_id))),
                    )
                    .await?;

                for user_id in std::iter::once(ticket.creator_id).chain(ticket.added_users.clone())
                {
                    if let Err(e) = channel
                        .delete_permission(
                            self.http,
                            PermissionOverwriteType::Member(UserId::new(user_id)),
                        )
                        .await
                    {
                        tracing::debug!(
                            "Failed to remove {} from archived ticket {}: {:?}",
                            user_id,
                            ticket.id,
                            e
                        );
                    }
                }
            }
            None => {
                channel.delete(self.http).await?;
            }
        }

        // Only recorded once Discord accepted the change, a failed close can be retried.
        TicketRepository::new(self.db)
            .close(ticket.id, Utc::now())
            .await?;

        tracing::info!("Ticket {} closed by {}", ticket.id, closed_by);

        Ok(ticket)
    }

    /// Marks `staff_id` as handling the ticket.
    ///
    /// # Returns
    /// - `Err(AppError::BadRequest)` - Someone else already claimed it
    pub async fn claim(&self, channel_id: u64, staff_id: u64) -> Result<Ticket, AppError> {
        let mut ticket = self.get_open(channel_id).await?;

        match ticket.claimed_by {
            Some(claimed_by) if claimed_by == staff_id => {
                return Err(AppError::BadRequest(
                    "You already claimed this ticket".to_string(),
                ))
            }
            Some(claimed_by) => {
                return Err(AppError::BadRequest(format!(
                    "This ticket is already claimed by <@{}>",
                    claimed_by
                )))
            }
            None => {}
        }

        TicketRepository::new(self.db)
            .set_claimed_by(ticket.id, Some(staff_id))
            .await?;
        ticket.claimed_by = Some(staff_id);

        Ok(ticket)
    }

    pub async fn unclaim(&self, channel_id: u64) -> Result<Ticket, AppError> {
        let mut ticket = self.get_open(channel_id).await?;

        if ticket.claimed_by.is_none() {
            return Err(AppError::BadRequest("This ticket is not claimed".to_string()));
        }

        TicketRepository::new(self.db)
            .set_claimed_by(ticket.id, None)
            .await?;
        ticket.claimed_by = None;

        Ok(ticket)
    }

    /// Gives a member access to the ticket channel.
    pub async fn add_user(&self, channel_id: u64, user_id: u64) -> Result<Ticket, AppError> {
        let mut ticket = self.get_open(channel_id).await?;

        if ticket.creator_id == user_id || ticket.added_users.contains(&user_id) {
            return Err(AppError::BadRequest(
                "That member already has access to this ticket".to_string(),
            ));
        }

        ChannelId::new(channel_id)
            .create_permission(self.http, member_overwrite(user_id))
            .await?;

        ticket.added_users.push(user_id);
        TicketRepository::new(self.db)
            .set_added_users(ticket.id, &ticket.added_users)
            .await?;

        Ok(ticket)
    }

    /// Removes a previously added member from the ticket channel.
    pub async fn remove_user(&self, channel_id: u64, user_id: u64) -> Result<Ticket, AppError> {
        let mut ticket = self.get_open(channel_id).await?;

        if !ticket.added_users.contains(&user_id) {
            return Err(AppError::BadRequest(
                "That member was not added to this ticket".to_string(),
            ));
        }

        ChannelId::new(channel_id)
            .delete_permission(
                self.http,
                PermissionOverwriteType::Member(UserId::new(user_id)),
            )
            .await?;

        ticket.added_users.retain(|&id| id != user_id);
        TicketRepository::new(self.db)
            .set_added_users(ticket.id, &ticket.added_users)
            .await?;

        Ok(ticket)
    }

    pub async fn get_by_channel(&self, channel_id: u64) -> Result<Option<Ticket>, AppError> {
        TicketRepository::new(self.db)
            .get_by_channel(channel_id)
            .await
    }

    pub async fn list_open(&self, guild_id: u64, user_id: u64) -> Result<Vec<Ticket>, AppError> {
        TicketRepository::new(self.db)
            .get_open_by_creator(guild_id, user_id)
            .await
    }

    /// Whether `roles` include one of the support roles of the ticket's source.
    pub async fn is_support(&self, ticket: &Ticket, roles: &[RoleId]) -> Result<bool, AppError> {
        let Some(source) = self.source_of(ticket).await? else {
            return Ok(false);
        };

        Ok(source
            .support_roles()
            .iter()
            .any(|id| roles.contains(&RoleId::new(*id))))
    }

    async fn get_open(&self, channel_id: u64) -> Result<Ticket, AppError> {
        let ticket = self
            .get_by_channel(channel_id)
            .await?
            .ok_or_else(|| AppError::NotFound("This channel is not a ticket".to_string()))?;

        if !ticket.is_open() {
            return Err(AppError::BadRequest("This ticket is already closed".to_string()));
        }

        Ok(ticket)
    }

    async fn ensure_panel_in_guild(&self, guild_id: u64, panel_id: i32) -> Result<(), AppError> {
        TicketPanelRepository::new(self.db)
            .get_by_id(guild_id, panel_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Ticket panel not found".to_string()))
    }
}

fn ticket_controls() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(TicketComponent::Close.custom_id())
            .label("Close")
            .emoji('🔒')
            .style(ButtonStyle::Danger),
        CreateButton::new(TicketComponent::Claim.custom_id())
            .label("Claim")
            .emoji('🙋')
            .style(ButtonStyle::Secondary),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::builder::TestBuilder;
    use serenity::all::HttpBuilder;
    use test_utils::factory::ticket::TicketFactory;
    use test_utils::factory::ticket_button::TicketButtonFactory;
    use test_utils::factory::ticket_panel::TicketPanelFactory;

    /// An `Http` whose requests are refused locally.
    fn offline_http() -> Http {
        HttpBuilder::new("")
            .proxy("http://127.0.0.1:1")
            .ratelimiter_disabled(true)
            .build()
    }

    #[test]
    fn formats_channel_names() {
        assert_eq!(
            format_channel_name("ticket-{username}", "Cool User", 42),
            "ticket-cool-user"
        );
        assert_eq!(format_channel_name("support-{id}", "x", 42), "support-42");
        assert_eq!(
            format_channel_name("ticket-{username}", "a!!b??", 1),
            "ticket-ab"
        );
    }

    #[test]
    fn empty_channel_name_falls_back_to_id() {
        assert_eq!(format_channel_name("{username}", "!!!", 7), "ticket-7");
    }

    #[test]
    fn channel_name_is_capped() {
        let long = "a".repeat(150);
        assert_eq!(
            format_channel_name("{username}", &long, 1).len(),
            CHANNEL_NAME_LIMIT
        );
    }

    #[test]
    fn overwrites_hide_channel_from_everyone() {
        let overwrites = build_overwrites(1, 2, 3, &[10], &[20]);

        let everyone = &overwrites[0];
        assert_eq!(everyone.kind, PermissionOverwriteType::Role(RoleId::new(1)));
        assert!(everyone.deny.contains(Permissions::VIEW_CHANNEL));

        let creator = overwrites
            .iter()
            .find(|o| o.kind == PermissionOverwriteType::Member(UserId::new(3)))
            .unwrap();
        assert!(creator.allow.contains(Permissions::SEND_MESSAGES));

        let viewer = overwrites
            .iter()
            .find(|o| o.kind == PermissionOverwriteType::Role(RoleId::new(20)))
            .unwrap();
        assert!(viewer.allow.contains(Permissions::VIEW_CHANNEL));
        assert!(viewer.deny.contains(Permissions::SEND_MESSAGES));
    }

    #[test]
    fn support_roles_are_not_downgraded_to_viewers() {
        let overwrites = build_overwrites(1, 2, 3, &[10], &[10]);

        let role_overwrites: Vec<_> = overwrites
            .iter()
            .filter(|o| o.kind == PermissionOverwriteType::Role(RoleId::new(10)))
            .collect();

        assert_eq!(role_overwrites.len(), 1);
        assert!(role_overwrites[0].deny.is_empty());
    }

    /// Tests claiming a ticket that another staff member already holds.
    ///
    /// Expected: Err(BadRequest), the first claim is kept
    #[tokio::test]
    async fn claim_rejects_second_staff_member() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let http = Http::new("");

        TicketFactory::new(db, 1, 3).channel_id(100).build().await?;

        let service = TicketService::new(db, &http);
        service.claim(100, 5).await?;

        let result = service.claim(100, 6).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let ticket = service.get_by_channel(100).await?.unwrap();
        assert_eq!(ticket.claimed_by, Some(5));

        Ok(())
    }

    /// Tests that commands in a non-ticket channel are rejected.
    ///
    /// Expected: Err(NotFound)
    #[tokio::test]
    async fn unclaim_outside_ticket_fails() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let http = Http::new("");

        let result = TicketService::new(db, &http).unclaim(999).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));

        Ok(())
    }

    /// Tests closing a ticket when Discord rejects the channel deletion.
    ///
    /// Expected: Err(DiscordErr), the ticket stays open and a retry reaches Discord again
    #[tokio::test]
    async fn failed_close_keeps_ticket_open() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let http = offline_http();

        TicketFactory::new(db, 1, 3).channel_id(100).build().await?;

        let service = TicketService::new(db, &http);

        let first = service.close(100, 5).await;
        assert!(matches!(first, Err(AppError::DiscordErr(_))));

        let ticket = service.get_by_channel(100).await?.unwrap();
        assert!(ticket.closed_at.is_none());

        let retry = service.close(100, 5).await;
        assert!(matches!(retry, Err(AppError::DiscordErr(_))));

        Ok(())
    }

    /// Tests opening a ticket when the channel cannot be created.
    ///
    /// Expected: Err(DiscordErr) and no ticket is stored
    #[tokio::test]
    async fn failed_open_stores_nothing() -> Result<(), AppError> {
        let test = TestBuilder::new()
            .with_ticket_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();
        let http = offline_http();

        let panel = TicketPanelFactory::new(db, 1).build().await?;
        let button = TicketButtonFactory::new(db, panel.id).build().await?;

        let service = TicketService::new(db, &http);
        let source = service.source_for_button(1, button.id).await?;

        let result = service.open(1, 2, 3, "member", &source).await;
        assert!(matches!(result, Err(AppError::DiscordErr(_))));
        assert!(service.list_open(1, 3).await?.is_empty());

        Ok(())
    }
}
