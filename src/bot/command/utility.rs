//! Message counting, auto-publish, link previews, join/leave stats, reminders,
//! repeaters and the AI relay settings.

use chrono::{Duration, Utc};
use serenity::all::{CreateEmbedFooter, GuildChannel, User};

use crate::bot::command::{guild_id, reply, reply_ephemeral, Command, Context};
use crate::error::AppError;
use crate::model::repeater::CreateRepeaterParam;
use crate::service::ai::AiService;
use crate::service::auto_publish::{describe_blacklist, AutoPublishService};
use crate::service::guild_config::GuildConfigService;
use crate::service::join_leave::{render_bar_chart, JoinLeaveService, MAX_STATS_DAYS};
use crate::service::message_count::MessageCountService;
use crate::service::reminder::ReminderService;
use crate::service::repeater::RepeaterService;
use crate::util::embed;
use crate::util::text::truncate;
use crate::util::time::{format_duration, parse_duration};

/// Members listed by the message count leaderboard.
const LEADERBOARD_SIZE: u64 = 10;

/// Longest repeater interval accepted by the parser; the service enforces the real bounds.
const REPEATER_PARSE_MAX: Duration = Duration::days(366);

pub fn commands() -> Vec<Command> {
    vec![
        messagecount(),
        autopublish(),
        linkpreview(),
        joinstats(),
        leavestats(),
        joinleave_clear(),
        remind(),
        reminders(),
        delreminder(),
        repeater(),
        aichannel(),
        aiprompt(),
        aireset(),
    ]
}

/// Count messages per member
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    subcommands(
        "messagecount_toggle",
        "messagecount_get",
        "messagecount_leaderboard",
        "messagecount_reset"
    ),
    subcommand_required
)]
pub async fn messagecount(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Turn message counting on or off
#[poise::command(
    slash_command,
    prefix_command,
    rename = "toggle",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn messagecount_toggle(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let enabled = MessageCountService::new(&data.db, &data.message_count)
        .toggle(guild_id)
        .await?;
    data.guild_configs.invalidate(guild_id);

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Message counting is now **{}**.",
            if enabled { "on" } else { "off" }
        )),
    )
    .await
}

/// Show how many messages a member sent
#[poise::command(slash_command, prefix_command, rename = "get")]
pub async fn messagecount_get(
    ctx: Context<'_>,
    #[description = "Member, defaults to you"] user: Option<User>,
    #[description = "Only count this channel"] channel: Option<GuildChannel>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();
    let user = user.unwrap_or_else(|| ctx.author().clone());
    let channel_id = channel.map(|c| c.id.get());

    let count = MessageCountService::new(&data.db, &data.message_count)
        .get_count(guild_id, user.id.get(), channel_id)
        .await?;

    let scope = match channel_id {
        Some(id) => format!(" in <#{}>", id),
        None => String::new(),
    };

    reply(
        ctx,
        embed::info_embed().description(format!(
            "<@{}> sent **{}** message(s){}.",
            user.id, count, scope
        )),
    )
    .await
}

/// Members with the most messages
#[poise::command(slash_command, prefix_command, rename = "leaderboard")]
pub async fn messagecount_leaderboard(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let entries = MessageCountService::new(&data.db, &data.message_count)
        .leaderboard(guild_id, LEADERBOARD_SIZE)
        .await?;

    let description = if entries.is_empty() {
        "No messages were counted yet.".to_string()
    } else {
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("**{}.** <@{}>: {}", i + 1, entry.user_id, entry.count))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(
        ctx,
        embed::info_embed()
            .title("Message leaderboard")
            .description(description),
    )
    .await
}

/// Reset counts of a member, or of everyone
#[poise::command(
    slash_command,
    prefix_command,
    rename = "reset",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn messagecount_reset(
    ctx: Context<'_>,
    #[description = "Member to reset, empty for everyone"] user: Option<User>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let removed = MessageCountService::new(&data.db, &data.message_count)
        .reset(guild_id, user.as_ref().map(|u| u.id.get()))
        .await?;

    let target = match &user {
        Some(user) => format!("<@{}>", user.id),
        None => "everyone".to_string(),
    };

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Reset message counts of {} ({} record(s)).",
            target, removed
        )),
    )
    .await
}

/// Crosspost messages in announcement channels automatically
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands(
        "autopublish_add",
        "autopublish_remove",
        "autopublish_list",
        "autopublish_user",
        "autopublish_word",
        "autopublish_blacklist"
    ),
    subcommand_required
)]
pub async fn autopublish(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Start publishing an announcement channel
#[poise::command(slash_command, prefix_command, rename = "add")]
pub async fn autopublish_add(
    ctx: Context<'_>,
    #[description = "Announcement channel"]
    #[channel_types("News")]
    channel: GuildChannel,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    AutoPublishService::new(&ctx.data().db)
        .add_channel(guild_id, channel.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Messages in <#{}> are now published.", channel.id)),
    )
    .await
}

/// Stop publishing a channel
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn autopublish_remove(
    ctx: Context<'_>,
    #[description = "Announcement channel"]
    #[channel_types("News")]
    channel: GuildChannel,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    AutoPublishService::new(&ctx.data().db)
        .remove_channel(guild_id, channel.id.get())
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("<#{}> is no longer published.", channel.id)),
    )
    .await
}

/// List published channels
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn autopublish_list(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let channels = AutoPublishService::new(&ctx.data().db)
        .list_channels(guild_id)
        .await?;

    let description = if channels.is_empty() {
        "No channels are published automatically.".to_string()
    } else {
        channels
            .iter()
            .map(|c| format!("<#{}>", c.channel_id))
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(
        ctx,
        embed::info_embed()
            .title("Auto-published channels")
            .description(description),
    )
    .await
}

/// Never publish messages from a user in a channel (run again to undo)
#[poise::command(slash_command, prefix_command, rename = "user")]
pub async fn autopublish_user(
    ctx: Context<'_>,
    #[description = "Announcement channel"]
    #[channel_types("News")]
    channel: GuildChannel,
    #[description = "User to skip"] user: User,
) -> Result<(), AppError> {
    let blacklisted = AutoPublishService::new(&ctx.data().db)
        .toggle_user(channel.id.get(), user.id.get())
        .await?;

    let description = if blacklisted {
        format!("Messages from <@{}> in <#{}> are no longer published.", user.id, channel.id)
    } else {
        format!("Messages from <@{}> in <#{}> are published again.", user.id, channel.id)
    };

    reply(ctx, embed::success_embed().description(description)).await
}

/// Never publish messages containing a word in a channel (run again to undo)
#[poise::command(slash_command, prefix_command, rename = "word")]
pub async fn autopublish_word(
    ctx: Context<'_>,
    #[description = "Announcement channel"]
    #[channel_types("News")]
    channel: GuildChannel,
    #[description = "Word to skip"] word: String,
) -> Result<(), AppError> {
    let blacklisted = AutoPublishService::new(&ctx.data().db)
        .toggle_word(channel.id.get(), &word)
        .await?;

    let description = if blacklisted {
        format!("Messages containing `{}` in <#{}> are no longer published.", word, channel.id)
    } else {
        format!("Messages containing `{}` in <#{}> are published again.", word, channel.id)
    };

    reply(ctx, embed::success_embed().description(description)).await
}

/// Show who and what is never published in a channel
#[poise::command(slash_command, prefix_command, rename = "blacklist")]
pub async fn autopublish_blacklist(
    ctx: Context<'_>,
    #[description = "Announcement channel"]
    #[channel_types("News")]
    channel: GuildChannel,
) -> Result<(), AppError> {
    let blacklist = AutoPublishService::new(&ctx.data().db)
        .blacklist(channel.id.get())
        .await?;
    let (users, words) = describe_blacklist(&blacklist);

    reply(
        ctx,
        embed::info_embed()
            .title(format!("Blacklist of #{}", channel.name))
            .field("Users", users, false)
            .field("Words", words, false),
    )
    .await
}

/// Turn previews of message links on or off
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn linkpreview(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();
    let service = GuildConfigService::new(&data.db, &data.guild_configs);

    let enabled = !service.get(guild_id).await?.link_preview_enabled;
    service.set_link_preview(guild_id, enabled).await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Message link previews are now **{}**.",
            if enabled { "on" } else { "off" }
        )),
    )
    .await
}

async fn send_stats(ctx: Context<'_>, is_join: bool, days: Option<u32>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let stats = JoinLeaveService::new(&ctx.data().db)
        .stats(guild_id, is_join, days.unwrap_or(7), Utc::now())
        .await?;

    let kind = if is_join { "Joins" } else { "Leaves" };
    let peak = match &stats.peak {
        Some(day) => format!("{} on {}", day.count, day.date.format("%Y-%m-%d")),
        None => "None".to_string(),
    };

    let embed = embed::info_embed()
        .title(format!("{} in the last {} day(s)", kind, stats.days.len()))
        .description(format!("```\n{}\n```", render_bar_chart(&stats.days)))
        .field("Total", stats.total.to_string(), true)
        .field("Peak", peak, true);

    reply(ctx, embed).await
}

/// Members who joined per day
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn joinstats(
    ctx: Context<'_>,
    #[description = "Days to show (default 7, max 90)"]
    #[min = 1]
    #[max = 90]
    days: Option<u32>,
) -> Result<(), AppError> {
    send_stats(ctx, true, days).await
}

/// Members who left per day
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn leavestats(
    ctx: Context<'_>,
    #[description = "Days to show (default 7, max 90)"]
    #[min = 1]
    #[max = 90]
    days: Option<u32>,
) -> Result<(), AppError> {
    send_stats(ctx, false, days).await
}

/// Forget every recorded join and leave
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "ADMINISTRATOR",
    required_permissions = "ADMINISTRATOR"
)]
pub async fn joinleave_clear(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;

    let removed = JoinLeaveService::new(&ctx.data().db).clear(guild_id).await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Removed {} join/leave record(s). Stats cover up to {} days.",
            removed, MAX_STATS_DAYS
        )),
    )
    .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ReminderTarget {
    /// Direct message
    #[name = "me"]
    Me,
    /// This channel
    #[name = "here"]
    Here,
}

/// Remind you of something later
#[poise::command(slash_command, prefix_command)]
pub async fn remind(
    ctx: Context<'_>,
    #[description = "me (DM) or here (this channel)"] target: ReminderTarget,
    #[description = "When, such as 10m, 2h30m or 1d"] time: String,
    #[description = "What to remind you of"]
    #[rest]
    message: String,
) -> Result<(), AppError> {
    let reminder = ReminderService::new(&ctx.data().db)
        .create(
            ctx.author().id.get(),
            ctx.channel_id().get(),
            ctx.guild_id().map(|id| id.get()),
            target == ReminderTarget::Me,
            &time,
            message,
            Utc::now(),
        )
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!(
            "I'll remind you <t:{}:R>{}.",
            reminder.remind_at.timestamp(),
            if reminder.is_private { " by DM" } else { " here" }
        )),
    )
    .await
}

/// List your reminders
#[poise::command(slash_command, prefix_command)]
pub async fn reminders(ctx: Context<'_>) -> Result<(), AppError> {
    let reminders = ReminderService::new(&ctx.data().db)
        .list(ctx.author().id.get())
        .await?;

    let description = if reminders.is_empty() {
        "You have no reminders.".to_string()
    } else {
        reminders
            .iter()
            .enumerate()
            .map(|(i, r)| {
                format!(
                    "**{}.** <t:{}:R> {}",
                    i + 1,
                    r.remind_at.timestamp(),
                    truncate(&r.message, 80)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply_ephemeral(
        ctx,
        embed::info_embed()
            .title("Your reminders")
            .description(description)
            .footer(CreateEmbedFooter::new("Delete one with delreminder <number>")),
    )
    .await
}

/// Delete one of your reminders
#[poise::command(slash_command, prefix_command)]
pub async fn delreminder(
    ctx: Context<'_>,
    #[description = "Number from the reminders list"]
    #[min = 1]
    index: usize,
) -> Result<(), AppError> {
    let reminder = ReminderService::new(&ctx.data().db)
        .delete_by_index(ctx.author().id.get(), index)
        .await?;

    reply_ephemeral(
        ctx,
        embed::success_embed().description(format!("Deleted reminder: {}", reminder.message)),
    )
    .await
}

/// Post a message on an interval
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("repeater_add", "repeater_remove", "repeater_list"),
    subcommand_required
)]
pub async fn repeater(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Repeat a message in a channel
#[poise::command(slash_command, prefix_command, rename = "add")]
pub async fn repeater_add(
    ctx: Context<'_>,
    #[description = "Channel to post in"]
    #[channel_types("Text", "News")]
    channel: GuildChannel,
    #[description = "Interval such as 30m or 1d (1 minute to 30 days)"] interval: String,
    #[description = "Skip posting while the last repeat is still the newest message"]
    no_redundant: Option<bool>,
    #[description = "Message to post"]
    #[rest]
    message: String,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let interval = parse_duration(&interval, REPEATER_PARSE_MAX)?;
    let interval = interval
        .to_std()
        .map_err(|_| AppError::BadRequest("The interval must be positive".to_string()))?;

    let repeater = RepeaterService::new(&data.db, &data.repeaters)
        .add(
            data.discord_http.clone(),
            CreateRepeaterParam {
                guild_id,
                channel_id: channel.id.get(),
                message,
                interval,
                no_redundant: no_redundant.unwrap_or(false),
            },
        )
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!(
            "Repeater #{} posts in <#{}> every {}.",
            repeater.id,
            repeater.channel_id,
            format_duration(Duration::seconds(repeater.interval.as_secs() as i64))
        )),
    )
    .await
}

/// Stop a repeater
#[poise::command(slash_command, prefix_command, rename = "remove")]
pub async fn repeater_remove(
    ctx: Context<'_>,
    #[description = "Repeater id"] id: i32,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    RepeaterService::new(&data.db, &data.repeaters)
        .remove(guild_id, id)
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("Removed repeater #{}.", id)),
    )
    .await
}

/// List repeaters
#[poise::command(slash_command, prefix_command, rename = "list")]
pub async fn repeater_list(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let repeaters = RepeaterService::new(&data.db, &data.repeaters)
        .list(guild_id)
        .await?;

    let description = if repeaters.is_empty() {
        "There are no repeaters.".to_string()
    } else {
        repeaters
            .iter()
            .map(|r| {
                format!(
                    "**#{}** <#{}> every {}{}: {}",
                    r.id,
                    r.channel_id,
                    format_duration(Duration::seconds(r.interval.as_secs() as i64)),
                    if r.no_redundant { " (no redundant)" } else { "" },
                    truncate(&r.message, 60)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    reply(ctx, embed::info_embed().title("Repeaters").description(description)).await
}

/// Choose the channel the AI answers in
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD",
    subcommands("aichannel_set", "aichannel_clear"),
    subcommand_required
)]
pub async fn aichannel(_: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Answer messages in a channel
#[poise::command(slash_command, prefix_command, rename = "set")]
pub async fn aichannel_set(
    ctx: Context<'_>,
    #[description = "Channel"]
    #[channel_types("Text")]
    channel: GuildChannel,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    if data.ai.is_none() {
        return Err(AppError::BadRequest(
            "No AI provider is configured for this bot".to_string(),
        ));
    }

    GuildConfigService::new(&data.db, &data.guild_configs)
        .set_ai_channel(guild_id, Some(channel.id.get()))
        .await?;

    reply(
        ctx,
        embed::success_embed().description(format!("I'll answer messages in <#{}>.", channel.id)),
    )
    .await
}

/// Stop answering messages
#[poise::command(slash_command, prefix_command, rename = "clear")]
pub async fn aichannel_clear(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    GuildConfigService::new(&data.db, &data.guild_configs)
        .set_ai_channel(guild_id, None)
        .await?;

    reply(
        ctx,
        embed::success_embed().description("The AI channel was cleared."),
    )
    .await
}

/// Set the instructions the AI follows (empty to clear)
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn aiprompt(
    ctx: Context<'_>,
    #[description = "System prompt"]
    #[rest]
    prompt: Option<String>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let config = GuildConfigService::new(&data.db, &data.guild_configs)
        .set_ai_system_prompt(guild_id, prompt)
        .await?;

    let description = match config.ai_system_prompt {
        Some(_) => "The system prompt was updated.",
        None => "The system prompt was cleared.",
    };

    reply_ephemeral(ctx, embed::success_embed().description(description)).await
}

/// Forget your conversation with the AI
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn aireset(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let data = ctx.data();

    let Some(ai) = &data.ai else {
        return Err(AppError::BadRequest(
            "No AI provider is configured for this bot".to_string(),
        ));
    };

    let reset = AiService::new(&data.db, &data.http_client, ai)
        .reset(guild_id, ctx.author().id.get())
        .await?;

    let description = if reset {
        "Your conversation was reset."
    } else {
        "You have no conversation to reset."
    };

    reply_ephemeral(ctx, embed::success_embed().description(description)).await
}
