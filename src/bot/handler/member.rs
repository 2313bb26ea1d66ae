use chrono::Utc;
use sea_orm::DatabaseConnection;
use serenity::all::{Context, GuildId, Member, User};

use crate::service::join_leave::JoinLeaveService;

/// Handles the guild_member_addition event when a member joins a guild
pub async fn handle_guild_member_addition(
    db: &DatabaseConnection,
    _ctx: Context,
    new_member: Member,
) {
    let guild_id = new_member.guild_id.get();
    let user_id = new_member.user.id.get();

    if let Err(e) = JoinLeaveService::new(db)
        .record(guild_id, user_id, true, Utc::now())
        .await
    {
        tracing::error!("Failed to record join of {} in guild {}: {:?}", user_id, guild_id, e);
    } else {
        tracing::debug!("Recorded join of {} in guild {}", user_id, guild_id);
    }
}

/// Handles the guild_member_removal event when a member leaves a guild
pub async fn handle_guild_member_removal(
    db: &DatabaseConnection,
    _ctx: Context,
    guild_id: GuildId,
    user: User,
    _member_data_if_available: Option<Member>,
) {
    let guild_id = guild_id.get();
    let user_id = user.id.get();

    if let Err(e) = JoinLeaveService::new(db)
        .record(guild_id, user_id, false, Utc::now())
        .await
    {
        tracing::error!("Failed to record leave of {} in guild {}: {:?}", user_id, guild_id, e);
    } else {
        tracing::debug!("Recorded leave of {} in guild {}", user_id, guild_id);
    }
}
