//! Ticket panels, the button wizard, ticket channel management and cases.

use chrono::Utc;
use serenity::all::{CreateInteractionResponse, GuildChannel, User};

use crate::bot::command::{guild_id, reply, reply_ephemeral, Command, Context};
use crate::bot::handler::wizard;
use crate::error::AppError;
use crate::model::ticket::{
    CreateTicketCaseParam, CreateTicketPanelParam, CreateTicketSelectOptionParam, Ticket,
};
use crate::service::ticket::case::TicketCaseService;
use crate::service::ticket::panel::TicketPanelService;
use crate::service::ticket::ticket::TicketService;
use crate::util::embed::{self, Colors};
use crate::util::parse::parse_snowflake_list;

pub fn commands() -> Vec<Command> {
    vec![ticket(), case()]
}

/// Parses `#5865F2`, `5865f2` or `0x5865F2`.
fn parse_color(value: &str) -> Result<u32, AppError> {
    let hex = value
        .trim()
        .trim_start_matches('#')
        .trim_start_matches("0x");

    u32::from_str_radix(hex, 16)
        .ok()
        .filter(|color| *color <= 0xFFFFFF)
        .ok_or_else(|| AppError::BadRequest(format!("`{}` is not a hex color", value)))
}

/// The ticket living in the invoking channel.
async fn current_ticket(ctx: Context<'_>) -> Result<Ticket, AppError> {
    TicketService::new(&ctx.data().db, ctx.http())
        .get_by_channel(ctx.channel_id().get())
        .await?
        .filter(Ticket::is_open)
        .ok_or_else(|| AppError::NotFound("This channel is not an open ticket".to_string()))
}

/// Whether the invoker can manage channels or holds a support role of the ticket.
async fn is_staff(ctx: Context<'_>, ticket: &Ticket) -> Result<bool, AppError> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    let can_manage = match member.permissions {
        Some(permissions) => permissions.manage_channels(),
        None => ctx
            .guild()
            .is_some_and(|guild| guild.member_permissions(&member).manage_channels()),
    };
    if can_manage {
        return Ok(true);
    }

    TicketService::new(&ctx.data().db, ctx.http())
        .is_support(ticket, &member.roles)
        .await
}

async fn require_staff(ctx: Context<'_>, ticket: &Ticket) -> Result<(), AppError> {
    if !is_staff(ctx, ticket).await? {
        return Err(AppError::PermissionDenied(
            "Only support staff can do that".to_string(),
        ));
    }
    Ok(())
}

/// Support tickets
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands(
        "panel",
        "button",
        "menu",
        "option",
        "ticket_close",
        "ticket_claim",
        "ticket_unclaim",
        "ticket_add",
        "ticket_remove",
        "ticket_list"
    ),
    subcommand_required
)]
pub async fn ticket(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Manage ticket panels
#[poise::command(
    slash_command,
    prefix_command,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("panel_create", "panel_list", "panel_delete"),
    subcommand_required
)]
pub async fn panel(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Post a new ticket panel
#[poise::command(slash_command, prefix_command, rename = "create")]
pub async fn panel_create(
    ctx: Context<'_>,
    #[description = "Channel the panel is posted in"]
    #[channel_types("Text")]
    channel: GuildChannel,
    #[description = "Panel title"] title: String,
    #[description = "Panel text"] description: Option<String>,
    #[description = "Embed color, e.g. #5865F2"] color: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let color = match color {
        Some(color) => parse_color(&color)?,
        None => Colors::PRIMARY,
    };

    let panel = TicketPanelService::new(&ctx.data().db, ctx.http())
        .create_panel(CreateTicketPanelParam {
            guild_id,
            channel_id: channel.id.get(),
            title,
            description: description.unwrap_or_else(|| "Open a ticket below.".to_string()),
            color,
        })
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!(
            "Panel #{} posted in <#{}>. Add buttons with `/ticket button add`.",
            panel.id, panel.channel_id
        )),
    )
    .await
}

/// List ticket panels
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn panel_list(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let panels = TicketPanelService::new(&ctx.data().db, ctx.http())
        .list_panels(guild_id)
        .await?;

    let description = if panels.is_empty() {
        "There are no ticket panels.".to_string()
    } else {
        panels
            .iter()
            .map(|p| format!("**#{}** {} in <#{}>", p.id, p.title, p.channel_id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply_ephemeral(
        ctx,
        embed::info_embed().title("Ticket panels").description(description),
    )
    .await
}

/// Delete a ticket panel and its message
#[poise::command(slash_command, prefix_command, rename = "delete")]
pub async fn panel_delete(
    ctx: Context<'_>,
    #[description = "Panel id"] panel_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let panel = TicketPanelService::new(&ctx.data().db, ctx.http())
        .delete_panel(guild_id, panel_id)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!("Deleted panel #{} ({}).", panel.id, panel.title)),
    )
    .await
}

/// Manage panel buttons
#[poise::command(
    slash_command,
    prefix_command,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("button_add", "button_remove"),
    subcommand_required
)]
pub async fn button(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Add a button to a panel through a short setup
#[poise::command(slash_command, rename = "add")]
pub async fn button_add(
    ctx: Context<'_>,
    #[description = "Panel id"] panel_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    // Fail before the modal opens rather than after the whole setup.
    TicketPanelService::new(&data.db, ctx.http())
        .get_panel(guild_id, panel_id)
        .await?;

    let poise::Context::Application(app_ctx) = ctx else {
        return Err(AppError::BadRequest(
            "Use the slash command to add buttons".to_string(),
        ));
    };

    data.drafts
        .start(ctx.author().id.get(), panel_id, Utc::now());

    app_ctx
        .interaction
        .create_response(
            ctx.http(),
            CreateInteractionResponse::Modal(wizard::details_modal()),
        )
        .await?;

    Ok(())
}

/// Remove a button from a panel
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn button_remove(
    ctx: Context<'_>,
    #[description = "Panel id"] panel_id: i32,
    #[description = "Button id"] button_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    TicketPanelService::new(&ctx.data().db, ctx.http())
        .remove_button(guild_id, panel_id, button_id)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!("Removed button #{}.", button_id)),
    )
    .await
}

/// Manage panel select menus
#[poise::command(
    slash_command,
    prefix_command,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("menu_add", "menu_remove"),
    subcommand_required
)]
pub async fn menu(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Add a select menu to a panel
#[poise::command(slash_command, prefix_command, rename = "add")]
pub async fn menu_add(
    ctx: Context<'_>,
    #[description = "Panel id"] panel_id: i32,
    #[description = "Text shown before an option is picked"]
    #[rest]
    placeholder: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let placeholder = placeholder.unwrap_or_else(|| "Select a ticket type".to_string());

    let menu = TicketPanelService::new(&ctx.data().db, ctx.http())
        .add_menu(guild_id, panel_id, placeholder)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!(
            "Menu #{} added. It shows up once it has an option (`/ticket option add`).",
            menu.id
        )),
    )
    .await
}

/// Remove a select menu from a panel
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn menu_remove(
    ctx: Context<'_>,
    #[description = "Panel id"] panel_id: i32,
    #[description = "Menu id"] menu_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    TicketPanelService::new(&ctx.data().db, ctx.http())
        .remove_menu(guild_id, panel_id, menu_id)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!("Removed menu #{}.", menu_id)),
    )
    .await
}

/// Manage select menu options
#[poise::command(
    slash_command,
    prefix_command,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("option_add", "option_remove"),
    subcommand_required
)]
pub async fn option(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Add an option to a select menu
#[allow(clippy::too_many_arguments)]
#[poise::command(slash_command, prefix_command, rename = "add")]
pub async fn option_add(
    ctx: Context<'_>,
    #[description = "Menu id"] menu_id: i32,
    #[description = "Option label"] label: String,
    #[description = "Text under the label"] description: Option<String>,
    #[description = "Emoji"] emoji: Option<String>,
    #[description = "Category new tickets are created in"]
    #[channel_types("Category")]
    category: Option<GuildChannel>,
    #[description = "Category closed tickets are moved to"]
    #[channel_types("Category")]
    archive_category: Option<GuildChannel>,
    #[description = "Support role mentions or ids"] support_roles: Option<String>,
    #[description = "Open tickets per member, 0 for no limit"] max_tickets: Option<u32>,
    #[description = "Message posted in new tickets"] open_message: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let option = TicketPanelService::new(&ctx.data().db, ctx.http())
        .add_option(
            guild_id,
            CreateTicketSelectOptionParam {
                menu_id,
                label,
                description,
                emoji,
                open_message,
                category_id: category.map(|c| c.id.get()),
                archive_category_id: archive_category.map(|c| c.id.get()),
                support_roles: support_roles
                    .as_deref()
                    .map(parse_snowflake_list)
                    .unwrap_or_default(),
                max_tickets: max_tickets.unwrap_or(0),
            },
        )
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!(
            "Option #{} ({}) added to menu #{}.",
            option.id, option.label, option.menu_id
        )),
    )
    .await
}

/// Remove an option from a select menu
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn option_remove(
    ctx: Context<'_>,
    #[description = "Menu id"] menu_id: i32,
    #[description = "Option id"] option_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    TicketPanelService::new(&ctx.data().db, ctx.http())
        .remove_option(guild_id, menu_id, option_id)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!("Removed option #{}.", option_id)),
    )
    .await
}

/// Close this ticket
#[poise::command(slash_command, prefix_command, rename = "close")]
pub async fn ticket_close(ctx: Context<'_>) -> Result<(), AppError> {
    let ticket = current_ticket(ctx).await?;

    if ticket.creator_id != ctx.author().id.get() {
        require_staff(ctx, &ticket).await?;
    }

    // Reply first, the channel may be deleted.
    reply(
        ctx,
        embed::warning_embed().description(format!("Ticket closed by <@{}>", ctx.author().id)),
    )
    .await?;

    TicketService::new(&ctx.data().db, ctx.http())
        .close(ticket.channel_id, ctx.author().id.get())
        .await?;

    Ok(())
}

/// Claim this ticket
#[poise::command(slash_command, prefix_command, rename = "claim")]
pub async fn ticket_claim(ctx: Context<'_>) -> Result<(), AppError> {
    let ticket = current_ticket(ctx).await?;
    require_staff(ctx, &ticket).await?;

    TicketService::new(&ctx.data().db, ctx.http())
        .claim(ticket.channel_id, ctx.author().id.get())
        .await?;

    reply(
        ctx,
        embed::info_embed().description(format!("<@{}> will handle this ticket", ctx.author().id)),
    )
    .await
}

/// Release your claim on this ticket
#[poise::command(slash_command, prefix_command, rename = "unclaim")]
pub async fn ticket_unclaim(ctx: Context<'_>) -> Result<(), AppError> {
    let ticket = current_ticket(ctx).await?;
    require_staff(ctx, &ticket).await?;

    TicketService::new(&ctx.data().db, ctx.http())
        .unclaim(ticket.channel_id)
        .await?;

    reply(
        ctx,
        embed::info_embed().description("This ticket is no longer claimed."),
    )
    .await
}

/// Give a member access to this ticket
#[poise::command(slash_command, prefix_command, rename = "add")]
pub async fn ticket_add(
    ctx: Context<'_>,
    #[description = "Member to add"] user: User,
) -> Result<(), AppError> {
    let ticket = current_ticket(ctx).await?;
    if ticket.creator_id != ctx.author().id.get() {
        require_staff(ctx, &ticket).await?;
    }

    TicketService::new(&ctx.data().db, ctx.http())
        .add_user(ticket.channel_id, user.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Added <@{}> to this ticket.", user.id)),
    )
    .await
}

/// Remove a member from this ticket
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn ticket_remove(
    ctx: Context<'_>,
    #[description = "Member to remove"] user: User,
) -> Result<(), AppError> {
    let ticket = current_ticket(ctx).await?;
    if ticket.creator_id != ctx.author().id.get() {
        require_staff(ctx, &ticket).await?;
    }

    TicketService::new(&ctx.data().db, ctx.http())
        .remove_user(ticket.channel_id, user.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Removed <@{}> from this ticket.", user.id)),
    )
    .await
}

/// List your open tickets
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn ticket_list(
    ctx: Context<'_>,
    #[description = "Member to look up (staff only)"] user: Option<User>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let user = user.unwrap_or_else(|| ctx.author().clone());

    if user.id != ctx.author().id {
        let can_manage = ctx
            .author_member()
            .await
            .and_then(|member| member.permissions)
            .is_some_and(|permissions| permissions.manage_channels());
        if !can_manage {
            return Err(AppError::PermissionDenied(
                "Only staff can list someone else's tickets".to_string(),
            ));
        }
    }

    let tickets = TicketService::new(&ctx.data().db, ctx.http())
        .list_open(guild_id, user.id.get())
        .await?;

    let description = if tickets.is_empty() {
        format!("<@{}> has no open tickets.", user.id)
    } else {
        tickets
            .iter()
            .map(|t| format!("<#{}> opened <t:{}:R>", t.channel_id, t.created_at.timestamp()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply_ephemeral(
        ctx,
        embed::info_embed().title("Open tickets").description(description),
    )
    .await
}

/// Group tickets into cases
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_CHANNELS",
    required_permissions = "MANAGE_CHANNELS",
    subcommands(
        "case_create",
        "case_link",
        "case_unlink",
        "case_close",
        "case_list",
        "case_show"
    ),
    subcommand_required
)]
pub async fn case(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Open a new case
#[poise::command(slash_command, prefix_command, rename = "create")]
pub async fn case_create(
    ctx: Context<'_>,
    #[description = "Case title"] title: String,
    #[description = "Details"] description: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let case = TicketCaseService::new(&ctx.data().db)
        .create(CreateTicketCaseParam {
            guild_id,
            title,
            description,
            created_by: ctx.author().id.get(),
        })
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Opened case #{}: {}", case.id, case.title)),
    )
    .await
}

/// Link this ticket to a case
#[poise::command(slash_command, prefix_command, rename = "link")]
pub async fn case_link(
    ctx: Context<'_>,
    #[description = "Case id"] case_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let case = TicketCaseService::new(&ctx.data().db)
        .link_ticket(guild_id, case_id, ctx.channel_id().get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "This ticket is now part of case #{}: {}",
            case.id, case.title
        )),
    )
    .await
}

/// Unlink this ticket from its case
#[poise::command(slash_command, prefix_command, rename = "unlink")]
pub async fn case_unlink(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    TicketCaseService::new(&ctx.data().db)
        .unlink_ticket(guild_id, ctx.channel_id().get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description("This ticket is no longer part of a case."),
    )
    .await
}

/// Close a case
#[poise::command(slash_command, prefix_command, rename = "close")]
pub async fn case_close(
    ctx: Context<'_>,
    #[description = "Case id"] case_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let case = TicketCaseService::new(&ctx.data().db)
        .close(guild_id, case_id)
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Closed case #{}: {}", case.id, case.title)),
    )
    .await
}

/// List cases
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn case_list(
    ctx: Context<'_>,
    #[description = "Include closed cases"] all: Option<bool>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let cases = TicketCaseService::new(&ctx.data().db)
        .list(guild_id, all.unwrap_or(false))
        .await?;

    let description = if cases.is_empty() {
        "There are no cases.".to_string()
    } else {
        cases
            .iter()
            .map(|c| {
                format!(
                    "**#{}** {}{}",
                    c.id,
                    c.title,
                    if c.closed_at.is_some() { " (closed)" } else { "" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(ctx, embed::info_embed().title("Cases").description(description)).await
}

/// Show a case and its tickets
#[poise::command(slash_command, prefix_command, rename = "show")]
pub async fn case_show(
    ctx: Context<'_>,
    #[description = "Case id"] case_id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let found = TicketCaseService::new(&ctx.data().db)
        .get_with_tickets(guild_id, case_id)
        .await?;

    let tickets = if found.tickets.is_empty() {
        "No linked tickets".to_string()
    } else {
        found
            .tickets
            .iter()
            .map(|t| {
                format!(
                    "<#{}> by <@{}>{}",
                    t.channel_id,
                    t.creator_id,
                    if t.is_open() { "" } else { " (closed)" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut embed = embed::info_embed()
        .title(format!("Case #{}: {}", found.case.id, found.case.title))
        .field("Opened by", format!("<@{}>", found.case.created_by), true)
        .field(
            "Status",
            match found.case.closed_at {
                Some(at) => format!("Closed <t:{}:R>", at.timestamp()),
                None => "Open".to_string(),
            },
            true,
        )
        .field("Tickets", tickets, false);
    if let Some(description) = &found.case.description {
        embed = embed.description(description);
    }

    reply(ctx, embed).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_color("#5865F2").unwrap(), 0x5865F2);
        assert_eq!(parse_color("0xff0000").unwrap(), 0xFF0000);
        assert_eq!(parse_color(" 00ff00 ").unwrap(), 0x00FF00);
    }

    #[test]
    fn rejects_invalid_colors() {
        assert!(matches!(parse_color("blue"), Err(AppError::BadRequest(_))));
        assert!(parse_color("#1000000").is_err());
    }
}
