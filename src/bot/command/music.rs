//! Music commands.
//!
//! Every command except `musicchannel` runs only in the guild's music channel when one
//! is set. Commands that need an active player fail with "I'm not in a voice channel"
//! through [`MusicPlayerService`].

use lavalink_rs::model::track::TrackData;
use serenity::all::{CreateEmbedFooter, GuildChannel};

use crate::bot::command::{guild_id, reply, Command, Context};
use crate::error::AppError;
use crate::model::music::{FilterPreset, RepeatMode, MAX_AUTOPLAY_AMOUNT, MAX_VOLUME};
use crate::service::music::player::{MusicPlayerService, PlayOutcome};
use crate::service::music::queue::QUEUE_PAGE_SIZE;
use crate::util::embed;
use crate::util::time::{format_track_time, parse_position};

pub fn commands() -> Vec<Command> {
    vec![
        join(),
        play(),
        pause(),
        resume(),
        skip(),
        stop(),
        seek(),
        volume(),
        queue(),
        nowplaying(),
        remove(),
        move_track(),
        shuffle(),
        clearqueue(),
        repeat(),
        autoplay(),
        nightcore(),
        bassboost(),
        resetfilters(),
        musicchannel(),
        leave(),
    ]
}

fn player(ctx: Context<'_>) -> MusicPlayerService<'_> {
    let data = ctx.data();
    MusicPlayerService::new(&data.lavalink, &data.songbird, &data.queues, &data.db)
}

/// Resolves the guild and rejects the command outside the configured music channel.
async fn music_guild(ctx: Context<'_>) -> Result<u64, AppError> {
    let guild_id = guild_id(ctx)?;

    let settings = player(ctx).settings(guild_id).await?;
    if let Some(channel_id) = settings.music_channel_id {
        if channel_id != ctx.channel_id().get() {
            return Err(AppError::BadRequest(format!(
                "Music commands can only be used in <#{}>",
                channel_id
            )));
        }
    }

    Ok(guild_id)
}

fn author_voice_channel(ctx: Context<'_>) -> Option<u64> {
    let guild = ctx.guild()?;
    guild
        .voice_states
        .get(&ctx.author().id)
        .and_then(|state| state.channel_id)
        .map(|id| id.get())
}

/// Markdown link to the track when it has a URL.
fn track_link(track: &TrackData) -> String {
    match &track.info.uri {
        Some(uri) => format!("[{}]({})", track.info.title, uri),
        None => track.info.title.clone(),
    }
}

fn track_length(track: &TrackData) -> String {
    if track.info.is_stream {
        "LIVE".to_string()
    } else {
        format_track_time(track.info.length)
    }
}

/// Join your voice channel
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn join(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let voice_channel = author_voice_channel(ctx)
        .ok_or_else(|| AppError::BadRequest("Join a voice channel first".to_string()))?;

    player(ctx)
        .join(
            guild_id,
            voice_channel,
            ctx.channel_id().get(),
            ctx.data().discord_http.clone(),
        )
        .await?;

    reply(
        ctx,
        embed::music_embed().description(format!("Joined <#{}>.", voice_channel)),
    )
    .await
}

/// Play a song or playlist from a URL or search terms
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search terms"]
    #[rest]
    query: String,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let voice_channel = author_voice_channel(ctx)
        .ok_or_else(|| AppError::BadRequest("Join a voice channel first".to_string()))?;

    ctx.defer().await?;

    let player = player(ctx);
    player
        .join(
            guild_id,
            voice_channel,
            ctx.channel_id().get(),
            ctx.data().discord_http.clone(),
        )
        .await?;

    let description = match player.play(guild_id, &query, ctx.author().id.get()).await? {
        PlayOutcome::Started { title } => format!("Now playing **{}**", title),
        PlayOutcome::Queued { title, position } => {
            format!("Queued **{}** at position {}", title, position)
        }
        PlayOutcome::Playlist { name, count } => {
            format!("Queued {} tracks from **{}**", count, name)
        }
    };

    reply(ctx, embed::music_embed().description(description)).await
}

/// Pause playback
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn pause(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    player(ctx).set_paused(guild_id, true).await?;

    reply(ctx, embed::music_embed().description("⏸️ Paused.")).await
}

/// Resume playback
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn resume(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    player(ctx).set_paused(guild_id, false).await?;

    reply(ctx, embed::music_embed().description("▶️ Resumed.")).await
}

/// Skip the current track, or jump to a queue position
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn skip(
    ctx: Context<'_>,
    #[description = "Queue position to jump to"]
    #[min = 1]
    to: Option<usize>,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let player = player(ctx);

    let description = match to {
        Some(position) => format!("Jumped to **{}**", player.jump(guild_id, position).await?),
        None => match player.skip(guild_id).await? {
            Some(title) => format!("Skipped. Now playing **{}**", title),
            None => "Skipped. The queue is empty.".to_string(),
        },
    };

    reply(ctx, embed::music_embed().description(description)).await
}

/// Stop playback and clear the queue
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    player(ctx).stop(guild_id).await?;

    reply(
        ctx,
        embed::music_embed().description("⏹️ Stopped and cleared the queue."),
    )
    .await
}

/// Seek to a position such as 1:30 or 90s
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn seek(
    ctx: Context<'_>,
    #[description = "Position such as 1:30, 1m30s or 90"] position: String,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let position = parse_position(&position)?;

    player(ctx).seek(guild_id, position).await?;

    reply(
        ctx,
        embed::music_embed().description(format!(
            "Seeked to {}.",
            format_track_time(position.as_millis() as u64)
        )),
    )
    .await
}

/// Show or change the volume
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume from 0 to 200"]
    #[min = 0]
    #[max = 200]
    volume: Option<u16>,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let player = player(ctx);

    let description = match volume {
        Some(volume) => {
            player.set_volume(guild_id, volume).await?;
            format!("🔊 Volume set to {}%.", volume)
        }
        None => format!(
            "🔊 Volume is {}% (max {}%).",
            player.settings(guild_id).await?.volume,
            MAX_VOLUME
        ),
    };

    reply(ctx, embed::music_embed().description(description)).await
}

/// Show the queue
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page number"]
    #[min = 1]
    page: Option<usize>,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    let (current, lines, footer) = player(ctx).with_queue(guild_id, |queue| {
        let current = queue.current().map(|q| track_link(&q.track));
        let page = queue.page(page.unwrap_or(1), QUEUE_PAGE_SIZE);
        let lines = page
            .items
            .iter()
            .map(|q| {
                format!(
                    "`{}.` {} `{}`",
                    q.position,
                    track_link(&q.track),
                    track_length(&q.track)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let footer = format!(
            "Page {}/{} · {} upcoming",
            page.page, page.total_pages, page.total
        );
        (current, lines, footer)
    });

    if current.is_none() && lines.is_empty() {
        return reply(ctx, embed::music_embed().description("The queue is empty.")).await;
    }

    let mut embed = embed::music_embed()
        .title("Queue")
        .footer(CreateEmbedFooter::new(footer));
    if let Some(current) = current {
        embed = embed.field("Now playing", current, false);
    }
    if !lines.is_empty() {
        embed = embed.field("Up next", lines, false);
    }

    reply(ctx, embed).await
}

/// Show the playing track
#[poise::command(slash_command, prefix_command, guild_only, aliases("np"))]
pub async fn nowplaying(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    let Some(now) = player(ctx).now_playing(guild_id).await? else {
        return reply(ctx, embed::music_embed().description("Nothing is playing.")).await;
    };

    let mut embed = embed::music_embed()
        .title(if now.paused { "⏸️ Paused" } else { "🎶 Now playing" })
        .description(format!("{}\nby {}", track_link(&now.track), now.track.info.author))
        .field(
            "Position",
            format!(
                "{} / {}",
                format_track_time(now.position_ms),
                track_length(&now.track)
            ),
            true,
        );
    if let Some(requester) = now.requester {
        embed = embed.field("Requested by", format!("<@{}>", requester), true);
    }
    if let Some(artwork) = &now.track.info.artwork_url {
        embed = embed.thumbnail(artwork);
    }

    reply(ctx, embed).await
}

/// Remove a track from the queue
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Queue position"]
    #[min = 1]
    position: usize,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    let removed = player(ctx)
        .with_queue(guild_id, |queue| queue.remove(position))
        .ok_or_else(|| AppError::BadRequest(format!("There is no track at position {}", position)))?;

    reply(
        ctx,
        embed::music_embed().description(format!("Removed **{}**.", removed.track.info.title)),
    )
    .await
}

/// Move a track to another queue position
#[poise::command(slash_command, prefix_command, guild_only, rename = "move")]
pub async fn move_track(
    ctx: Context<'_>,
    #[description = "Current position"]
    #[min = 1]
    from: usize,
    #[description = "New position"]
    #[min = 1]
    to: usize,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    if !player(ctx).with_queue(guild_id, |queue| queue.move_track(from, to)) {
        return Err(AppError::BadRequest(
            "Both positions must be in the queue".to_string(),
        ));
    }

    reply(
        ctx,
        embed::music_embed().description(format!("Moved track {} to position {}.", from, to)),
    )
    .await
}

/// Shuffle the upcoming tracks
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn shuffle(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    player(ctx).with_queue(guild_id, |queue| queue.shuffle(&mut rand::rng()));

    reply(ctx, embed::music_embed().description("🔀 Shuffled the queue.")).await
}

/// Remove every upcoming track, keeping the playing one
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn clearqueue(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    let removed = player(ctx).with_queue(guild_id, |queue| queue.clear());

    reply(
        ctx,
        embed::music_embed().description(format!("Removed {} track(s) from the queue.", removed)),
    )
    .await
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum RepeatChoice {
    #[name = "off"]
    Off,
    #[name = "track"]
    Track,
    #[name = "queue"]
    Queue,
}

impl From<RepeatChoice> for RepeatMode {
    fn from(choice: RepeatChoice) -> Self {
        match choice {
            RepeatChoice::Off => RepeatMode::Off,
            RepeatChoice::Track => RepeatMode::Track,
            RepeatChoice::Queue => RepeatMode::Queue,
        }
    }
}

/// Set the repeat mode
#[poise::command(slash_command, prefix_command, guild_only, aliases("loop"))]
pub async fn repeat(
    ctx: Context<'_>,
    #[description = "off, track or queue"] mode: RepeatChoice,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    let mode = RepeatMode::from(mode);

    player(ctx).set_repeat_mode(guild_id, mode).await?;

    reply(
        ctx,
        embed::music_embed().description(format!("🔁 Repeat mode is now **{}**.", mode)),
    )
    .await
}

/// Queue similar tracks when the queue runs out (0 turns it off)
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn autoplay(
    ctx: Context<'_>,
    #[description = "Similar tracks to queue, 0 to 5"]
    #[min = 0]
    #[max = 5]
    amount: u8,
) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;

    player(ctx).set_autoplay(guild_id, amount).await?;

    let description = if amount == 0 {
        "Autoplay is off.".to_string()
    } else {
        format!(
            "Autoplay queues {} similar track(s) (max {}) when the queue ends.",
            amount, MAX_AUTOPLAY_AMOUNT
        )
    };

    reply(ctx, embed::music_embed().description(description)).await
}

async fn apply_filter(ctx: Context<'_>, preset: FilterPreset, message: &str) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    player(ctx).apply_filter(guild_id, preset).await?;

    reply(ctx, embed::music_embed().description(message)).await
}

/// Speed up and pitch up the audio
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn nightcore(ctx: Context<'_>) -> Result<(), AppError> {
    apply_filter(ctx, FilterPreset::Nightcore, "Nightcore enabled.").await
}

/// Boost the low frequencies
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn bassboost(ctx: Context<'_>) -> Result<(), AppError> {
    apply_filter(ctx, FilterPreset::BassBoost, "Bass boost enabled.").await
}

/// Remove all audio filters
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn resetfilters(ctx: Context<'_>) -> Result<(), AppError> {
    apply_filter(ctx, FilterPreset::Reset, "Filters cleared.").await
}

/// Restrict music commands to one channel, or lift the restriction
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    default_member_permissions = "MANAGE_GUILD",
    required_permissions = "MANAGE_GUILD"
)]
pub async fn musicchannel(
    ctx: Context<'_>,
    #[description = "Channel for music commands, empty to allow every channel"]
    #[channel_types("Text")]
    channel: Option<GuildChannel>,
) -> Result<(), AppError> {
    let guild_id = guild_id(ctx)?;
    let channel_id = channel.map(|c| c.id.get());

    player(ctx).set_music_channel(guild_id, channel_id).await?;

    let description = match channel_id {
        Some(id) => format!("Music commands now only work in <#{}>.", id),
        None => "Music commands work in every channel.".to_string(),
    };

    reply(ctx, embed::success_embed().description(description)).await
}

/// Leave the voice channel
#[poise::command(slash_command, prefix_command, guild_only, aliases("disconnect"))]
pub async fn leave(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = music_guild(ctx).await?;
    player(ctx).leave(guild_id).await?;

    reply(ctx, embed::music_embed().description("👋 Left the voice channel.")).await
}
