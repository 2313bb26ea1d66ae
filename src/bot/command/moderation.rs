//! Warnings, warn punishments, direct moderation actions, mass nickname and snipes.

use chrono::{Duration, Utc};
use futures::StreamExt;
use serenity::all::{CreateEmbedFooter, Guild, Member, Role, User, UserId};

use crate::bot::command::{guild_id, reply, Command, Context};
use crate::error::AppError;
use crate::model::guild_config::{UpdateGuildConfigParam, WarnExpireAction};
use crate::model::moderation::{Punishment, WarningSelector, MAX_TIMEOUT_MINUTES};
use crate::service::guild_config::GuildConfigService;
use crate::service::moderation::action::{ModerationActionService, MAX_BAN_DELETE_DAYS};
use crate::service::moderation::massnick::run_massnick;
use crate::service::moderation::warn::{WarnService, WARNLOG_PAGE_SIZE};
use crate::service::snipe::SnipedMessage;
use crate::util::embed;
use crate::util::permissions::{bot_can_manage, check_hierarchy};
use crate::util::time::{format_duration, parse_duration};

pub fn commands() -> Vec<Command> {
    vec![
        warn(),
        warnlog(),
        forgive(),
        deletewarn(),
        warnpunish(),
        warnexpire(),
        ban(),
        unban(),
        kick(),
        softban(),
        timeout(),
        untimeout(),
        massnick(),
        massnick_status(),
        massnick_cancel(),
        snipe(),
        editsnipe(),
    ]
}

/// Guild snapshot from the cache. Cloned so it can be held across awaits.
fn cached_guild(ctx: Context<'_>) -> Result<Guild, AppError> {
    ctx.guild()
        .map(|guild| guild.clone())
        .ok_or_else(|| AppError::NotFound("This server is not cached yet, try again".to_string()))
}

/// Ensures the invoker and the bot both outrank `target`.
///
/// Users that are not members (already left, or banned) have no roles to compare.
async fn ensure_can_act(ctx: Context<'_>, target: UserId) -> Result<(), AppError> {
    let guild = cached_guild(ctx)?;

    let serenity_ctx = ctx.serenity_context();

    let target = match guild.id.member(serenity_ctx, target).await {
        Ok(member) => member,
        Err(_) => return Ok(()),
    };
    let moderator = guild.id.member(serenity_ctx, ctx.author().id).await?;
    let bot_id = serenity_ctx.cache.current_user().id;
    let bot = guild.id.member(serenity_ctx, bot_id).await?;

    check_hierarchy(&guild, &moderator, &bot, &target)
}

fn reason_or_default(reason: &Option<String>) -> &str {
    reason.as_deref().unwrap_or("No reason given")
}

/// Warn a member
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "Member to warn"] user: User,
    #[description = "Reason shown in the warn log"]
    #[rest]
    reason: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    ensure_can_act(ctx, user.id).await?;

    let outcome = WarnService::new(&ctx.data().db)
        .warn(
            ctx.http(),
            guild_id,
            user.id.get(),
            ctx.author().id.get(),
            reason.clone(),
        )
        .await?;

    let mut embed = embed::moderation_embed()
        .title("Member warned")
        .description(format!(
            "<@{}> now has **{}** active warning(s).\nReason: {}",
            user.id,
            outcome.warning_count,
            reason_or_default(&reason)
        ));

    if let Some(applied) = &outcome.punishment {
        let value = match &applied.error {
            None => format!("Applied: {}", applied.punishment),
            Some(error) => format!("Failed to apply punishment ({}): {}", applied.punishment, error),
        };
        embed = embed.field("Punishment", value, false);
    }

    reply(ctx, embed).await
}

/// Show a member's active warnings
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn warnlog(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: User,
    #[description = "Page number"]
    #[min = 1]
    page: Option<u64>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let page = WarnService::new(&ctx.data().db)
        .warnlog(guild_id, user.id.get(), page.unwrap_or(1))
        .await?;

    if page.total == 0 {
        return reply(
            ctx,
            embed::info_embed().description(format!("<@{}> has no active warnings.", user.id)),
        )
        .await;
    }

    let first = (page.page - 1) * WARNLOG_PAGE_SIZE;
    let lines = page
        .warnings
        .iter()
        .enumerate()
        .map(|(i, warning)| {
            format!(
                "**{}.** <t:{}:R> by <@{}>: {}",
                first + i as u64 + 1,
                warning.created_at.timestamp(),
                warning.moderator_id,
                warning.reason.as_deref().unwrap_or("No reason given")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let embed = embed::moderation_embed()
        .title(format!("Warnings of {}", user.name))
        .description(lines)
        .footer(CreateEmbedFooter::new(format!(
            "Page {}/{} · {} active",
            page.page, page.total_pages, page.total
        )));

    reply(ctx, embed).await
}

/// Forgive one or all of a member's warnings
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn forgive(
    ctx: Context<'_>,
    #[description = "Member whose warnings to forgive"] user: User,
    #[description = "Position in the warn log, leave empty to forgive all"]
    #[min = 1]
    index: Option<usize>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let selector = index.map(WarningSelector::Index).unwrap_or(WarningSelector::All);

    let forgiven = WarnService::new(&ctx.data().db)
        .forgive(guild_id, user.id.get(), selector, ctx.author().id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Forgave {} warning(s) of <@{}>.",
            forgiven, user.id
        )),
    )
    .await
}

/// Permanently delete one of a member's warnings
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn deletewarn(
    ctx: Context<'_>,
    #[description = "Member whose warning to delete"] user: User,
    #[description = "Position in the warn log"]
    #[min = 1]
    index: usize,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    WarnService::new(&ctx.data().db)
        .delete_warning(guild_id, user.id.get(), index)
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Deleted warning #{} of <@{}>.", index, user.id)),
    )
    .await
}

/// Configure automatic punishments for warning counts
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("warnpunish_set", "warnpunish_remove", "warnpunish_list"),
    subcommand_required
)]
pub async fn warnpunish(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum PunishmentChoice {
    #[name = "timeout"]
    Timeout,
    #[name = "kick"]
    Kick,
    #[name = "ban"]
    Ban,
    #[name = "softban"]
    Softban,
    #[name = "addrole"]
    AddRole,
    #[name = "removeroles"]
    RemoveRoles,
}

impl PunishmentChoice {
    fn kind(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Kick => "kick",
            Self::Ban => "ban",
            Self::Softban => "softban",
            Self::AddRole => "addrole",
            Self::RemoveRoles => "removeroles",
        }
    }
}

/// Apply a punishment when a member reaches a number of warnings
#[poise::command(slash_command, prefix_command, rename = "set")]
pub async fn warnpunish_set(
    ctx: Context<'_>,
    #[description = "Active warning count that triggers the punishment"]
    #[min = 1]
    count: u32,
    #[description = "What to do"] punishment: PunishmentChoice,
    #[description = "Timeout length such as 1h30m"] duration: Option<String>,
    #[description = "Role to add"] role: Option<Role>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let minutes = match duration {
        Some(duration) => Some(
            parse_duration(&duration, Duration::minutes(MAX_TIMEOUT_MINUTES as i64))?.num_minutes()
                as i32,
        ),
        None => None,
    };
    let punishment = Punishment::from_parts(punishment.kind(), minutes, role.map(|r| r.id.get()))?;

    let stored = WarnService::new(&ctx.data().db)
        .set_punishment(guild_id, count, punishment)
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Members reaching **{}** warnings will get: {}.",
            stored.count, stored.punishment
        )),
    )
    .await
}

/// Stop punishing at a warning count
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn warnpunish_remove(
    ctx: Context<'_>,
    #[description = "Warning count"]
    #[min = 1]
    count: u32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    WarnService::new(&ctx.data().db)
        .remove_punishment(guild_id, count)
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Removed the punishment at {} warnings.", count)),
    )
    .await
}

/// List configured punishments
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn warnpunish_list(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let punishments = WarnService::new(&ctx.data().db)
        .list_punishments(guild_id)
        .await?;

    let description = if punishments.is_empty() {
        "No punishments are configured.".to_string()
    } else {
        punishments
            .iter()
            .map(|p| format!("**{}** warnings → {}", p.count, p.punishment))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(
        ctx,
        embed::moderation_embed()
            .title("Warn punishments")
            .description(description),
    )
    .await
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ExpireActionChoice {
    #[name = "clear"]
    Clear,
    #[name = "delete"]
    Delete,
}

impl From<ExpireActionChoice> for WarnExpireAction {
    fn from(choice: ExpireActionChoice) -> Self {
        match choice {
            ExpireActionChoice::Clear => WarnExpireAction::Clear,
            ExpireActionChoice::Delete => WarnExpireAction::Delete,
        }
    }
}

/// Expire warnings after a number of hours (0 disables)
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn warnexpire(
    ctx: Context<'_>,
    #[description = "Hours until a warning expires, 0 to never expire"] hours: u32,
    #[description = "Forgive (clear) or delete expired warnings"] action: Option<ExpireActionChoice>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let config = GuildConfigService::new(&data.db, &data.guild_configs)
        .update(
            guild_id,
            UpdateGuildConfigParam {
                warn_expire_hours: Some(hours),
                warn_expire_action: action.map(Into::into),
                ..Default::default()
            },
        )
        .await?;

    let description = if config.warn_expire_hours == 0 {
        "Warnings no longer expire.".to_string()
    } else {
        format!(
            "Warnings expire after {} hour(s) and are then {}.",
            config.warn_expire_hours,
            match config.warn_expire_action {
                WarnExpireAction::Clear => "forgiven",
                WarnExpireAction::Delete => "deleted",
            }
        )
    };

    reply(ctx, embed::success_embed().description(description)).await
}

/// Ban a user
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "BAN_MEMBERS",
    required_permissions = "BAN_MEMBERS"
)]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: User,
    #[description = "Days of messages to delete (0-7)"]
    #[min = 0]
    #[max = 7]
    delete_days: Option<u8>,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let delete_days = delete_days.unwrap_or(0);
    if delete_days > MAX_BAN_DELETE_DAYS {
        return Err(AppError::BadRequest(format!(
            "Message deletion is limited to {} days",
            MAX_BAN_DELETE_DAYS
        )));
    }
    ensure_can_act(ctx, user.id).await?;

    let reason = reason_or_default(&reason);
    let actions = ModerationActionService::new(ctx.http(), guild_id);
    actions
        .notify(user.id.get(), format!("You were banned from {}: {}", guild_name(ctx), reason))
        .await;
    actions.ban(user.id.get(), delete_days, reason).await?;

    reply(
        ctx,
        embed::moderation_embed().description(format!("Banned <@{}>. Reason: {}", user.id, reason)),
    )
    .await
}

/// Lift a ban
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "BAN_MEMBERS",
    required_permissions = "BAN_MEMBERS"
)]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "User to unban"] user: User,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    ModerationActionService::new(ctx.http(), guild_id)
        .unban(user.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Unbanned <@{}>.", user.id)),
    )
    .await
}

/// Kick a member
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "KICK_MEMBERS",
    required_permissions = "KICK_MEMBERS"
)]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "Member to kick"] user: User,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    ensure_can_act(ctx, user.id).await?;

    let reason = reason_or_default(&reason);
    let actions = ModerationActionService::new(ctx.http(), guild_id);
    actions
        .notify(user.id.get(), format!("You were kicked from {}: {}", guild_name(ctx), reason))
        .await;
    actions.kick(user.id.get(), reason).await?;

    reply(
        ctx,
        embed::moderation_embed().description(format!("Kicked <@{}>. Reason: {}", user.id, reason)),
    )
    .await
}

/// Ban and immediately unban a member to delete their recent messages
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "BAN_MEMBERS",
    required_permissions = "BAN_MEMBERS"
)]
pub async fn softban(
    ctx: Context<'_>,
    #[description = "Member to softban"] user: User,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    ensure_can_act(ctx, user.id).await?;

    let reason = reason_or_default(&reason);
    let actions = ModerationActionService::new(ctx.http(), guild_id);
    actions
        .notify(user.id.get(), format!("You were softbanned from {}: {}", guild_name(ctx), reason))
        .await;
    actions.softban(user.id.get(), reason).await?;

    reply(
        ctx,
        embed::moderation_embed()
            .description(format!("Softbanned <@{}>. Reason: {}", user.id, reason)),
    )
    .await
}

/// Time out a member
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn timeout(
    ctx: Context<'_>,
    #[description = "Member to time out"] user: User,
    #[description = "Length such as 10m or 1d12h (max 28 days)"] time: String,
    #[description = "Reason"]
    #[rest]
    reason: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let duration = parse_duration(&time, Duration::minutes(MAX_TIMEOUT_MINUTES as i64))?;
    ensure_can_act(ctx, user.id).await?;

    let reason = reason_or_default(&reason);
    let actions = ModerationActionService::new(ctx.http(), guild_id);
    actions
        .notify(
            user.id.get(),
            format!(
                "You were timed out in {} for {}: {}",
                guild_name(ctx),
                format_duration(duration),
                reason
            ),
        )
        .await;
    actions.timeout(user.id.get(), duration).await?;

    reply(
        ctx,
        embed::moderation_embed().description(format!(
            "Timed out <@{}> for {}. Reason: {}",
            user.id,
            format_duration(duration),
            reason
        )),
    )
    .await
}

/// Remove a member's timeout
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS",
    required_permissions = "MODERATE_MEMBERS"
)]
pub async fn untimeout(
    ctx: Context<'_>,
    #[description = "Member to release"] user: User,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    ensure_can_act(ctx, user.id).await?;

    ModerationActionService::new(ctx.http(), guild_id)
        .untimeout(user.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Removed the timeout of <@{}>.", user.id)),
    )
    .await
}

fn guild_name(ctx: Context<'_>) -> String {
    ctx.guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "the server".to_string())
}

/// Members the bot is able to rename, fetched page by page from Discord.
async fn massnick_targets(ctx: Context<'_>, guild: &Guild) -> Result<Vec<u64>, AppError> {
    let serenity_ctx = ctx.serenity_context();
    let bot_id = serenity_ctx.cache.current_user().id;
    let bot = guild.id.member(serenity_ctx, bot_id).await?;

    let mut members = guild.id.members_iter(ctx.http()).boxed();
    let mut targets = Vec::new();
    while let Some(member) = members.next().await {
        let member: Member = member?;
        if !member.user.bot && bot_can_manage(guild, bot_id, &bot, &member) {
            targets.push(member.user.id.get());
        }
    }

    Ok(targets)
}

/// Rename every member the bot can manage (leave empty to reset nicknames)
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_NICKNAMES",
    required_permissions = "MANAGE_NICKNAMES"
)]
pub async fn massnick(
    ctx: Context<'_>,
    #[description = "New nickname, empty to reset"]
    #[rest]
    nickname: Option<String>,
) -> Result<(), AppError> {
    let guild = cached_guild(ctx)?;
    let guild_id = guild.id.get();
    let data = ctx.data();

    if data.massnick.status(guild_id).is_some_and(|p| !p.finished) {
        return Err(AppError::BadRequest(
            "A mass nickname is already running here".to_string(),
        ));
    }

    ctx.defer().await?;

    let targets = massnick_targets(ctx, &guild).await?;
    data.massnick.start(guild_id, targets.len())?;

    let nickname = nickname.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let description = format!(
        "{} {} member(s). Use `massnick_status` to follow along.",
        if nickname.is_some() { "Renaming" } else { "Resetting the nickname of" },
        targets.len()
    );

    tokio::spawn(run_massnick(
        data.discord_http.clone(),
        data.massnick.clone(),
        guild_id,
        targets,
        nickname,
    ));

    reply(ctx, embed::moderation_embed().description(description)).await
}

/// Progress of the running mass nickname
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_NICKNAMES",
    required_permissions = "MANAGE_NICKNAMES"
)]
pub async fn massnick_status(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let progress = ctx
        .data()
        .massnick
        .status(guild_id)
        .ok_or_else(|| AppError::NotFound("No mass nickname has run here".to_string()))?;

    let state = if progress.cancelled {
        "Cancelled"
    } else if progress.finished {
        "Finished"
    } else {
        "Running"
    };

    reply(
        ctx,
        embed::info_embed()
            .title(format!("Mass nickname: {}", state))
            .field("Processed", format!("{}/{}", progress.processed(), progress.total), true)
            .field("Changed", progress.changed.to_string(), true)
            .field("Failed", progress.failed.to_string(), true),
    )
    .await
}

/// Stop the running mass nickname
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_NICKNAMES",
    required_permissions = "MANAGE_NICKNAMES"
)]
pub async fn massnick_cancel(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    if !ctx.data().massnick.cancel(guild_id) {
        return Err(AppError::NotFound(
            "No mass nickname is running here".to_string(),
        ));
    }

    reply(
        ctx,
        embed::success_embed().description("The mass nickname stops after the current member."),
    )
    .await
}

fn snipe_embed(message: &SnipedMessage, title: &str) -> serenity::all::CreateEmbed {
    let mut embed = embed::info_embed()
        .title(title)
        .author(serenity::all::CreateEmbedAuthor::new(&message.author_name))
        .footer(CreateEmbedFooter::new(format!("User ID: {}", message.author_id)))
        .timestamp(serenity::all::Timestamp::from(message.at));

    embed = match &message.edited_content {
        Some(after) => embed
            .field("Before", non_empty(&message.content), false)
            .field("After", non_empty(after), false),
        None => embed.description(non_empty(&message.content)),
    };

    if !message.attachments.is_empty() {
        embed = embed.field("Attachments", message.attachments.join("\n"), false);
    }

    embed
}

fn non_empty(content: &str) -> String {
    if content.is_empty() {
        "*No text*".to_string()
    } else {
        content.to_string()
    }
}

/// Show a recently deleted message in this channel
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn snipe(
    ctx: Context<'_>,
    #[description = "1 is the most recent"]
    #[min = 1]
    index: Option<usize>,
) -> Result<(), AppError> {
    let message = ctx
        .data()
        .snipes
        .deleted(ctx.channel_id().get(), index.unwrap_or(1), Utc::now())
        .ok_or_else(|| AppError::NotFound("There's nothing to snipe".to_string()))?;

    reply(ctx, snipe_embed(&message, "Deleted message")).await
}

/// Show a recently edited message in this channel
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn editsnipe(
    ctx: Context<'_>,
    #[description = "1 is the most recent"]
    #[min = 1]
    index: Option<usize>,
) -> Result<(), AppError> {
    let message = ctx
        .data()
        .snipes
        .edited(ctx.channel_id().get(), index.unwrap_or(1), Utc::now())
        .ok_or_else(|| AppError::NotFound("There's nothing to snipe".to_string()))?;

    reply(ctx, snipe_embed(&message, "Edited message")).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sniped(content: &str, edited: Option<&str>) -> SnipedMessage {
        SnipedMessage {
            message_id: 1,
            author_id: 2,
            author_name: "someone".to_string(),
            content: content.to_string(),
            attachments: Vec::new(),
            edited_content: edited.map(str::to_string),
            at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn punishment_choices_parse_as_punishments() {
        for choice in [
            PunishmentChoice::Kick,
            PunishmentChoice::Ban,
            PunishmentChoice::Softban,
            PunishmentChoice::RemoveRoles,
        ] {
            assert_eq!(
                Punishment::from_parts(choice.kind(), None, None).unwrap().kind(),
                choice.kind()
            );
        }
        assert!(Punishment::from_parts(PunishmentChoice::AddRole.kind(), None, None).is_err());
    }

    #[test]
    fn empty_snipes_show_placeholder() {
        assert_eq!(non_empty(""), "*No text*");
        assert_eq!(non_empty("hi"), "hi");

        let _ = snipe_embed(&sniped("", None), "Deleted message");
        let _ = snipe_embed(&sniped("before", Some("")), "Edited message");
    }

    #[test]
    fn expire_choice_maps_to_action() {
        assert_eq!(WarnExpireAction::from(ExpireActionChoice::Delete), WarnExpireAction::Delete);
        assert_eq!(WarnExpireAction::from(ExpireActionChoice::Clear), WarnExpireAction::Clear);
    }
}
