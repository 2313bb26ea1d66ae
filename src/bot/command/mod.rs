//! Slash and prefix commands.
//!
//! Commands are thin: they resolve the invoking guild and arguments, call a service
//! and render the result as an embed. Errors returned from a command are shown to the
//! invoker by [`on_error`] using [`AppError::user_message`].

use poise::CreateReply;
use serenity::all::CreateEmbed;

use crate::error::AppError;
use crate::state::AppState;
use crate::util::embed;

pub mod moderation;
pub mod music;
pub mod ticket;
pub mod utility;

pub type Context<'a> = poise::Context<'a, AppState, AppError>;
pub type Command = poise::Command<AppState, AppError>;

/// Every command registered with the framework.
pub fn all() -> Vec<Command> {
    let mut commands = Vec::new();
    commands.extend(moderation::commands());
    commands.extend(music::commands());
    commands.extend(ticket::commands());
    commands.extend(utility::commands());
    commands
}

/// Reports command errors to the invoker and logs them.
pub async fn on_error(error: poise::FrameworkError<'_, AppState, AppError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = ctx.command().qualified_name,
                error = ?error,
                "Command error"
            );

            let embed = embed::error_embed()
                .title("Error")
                .description(error.user_message());
            if let Err(e) = ctx
                .send(CreateReply::default().embed(embed).ephemeral(true))
                .await
            {
                tracing::debug!("Failed to report command error: {:?}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {:?}", e);
            }
        }
    }
}

/// Id of the guild the command runs in.
///
/// Commands are registered `guild_only`, so this only fails for malformed invocations.
pub fn guild_id(ctx: Context<'_>) -> Result<u64, AppError> {
    ctx.guild_id()
        .map(|id| id.get())
        .ok_or_else(|| AppError::BadRequest("This command only works in a server".to_string()))
}

pub async fn reply(ctx: Context<'_>, embed: CreateEmbed) -> Result<(), AppError> {
    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

pub async fn reply_ephemeral(ctx: Context<'_>, embed: CreateEmbed) -> Result<(), AppError> {
    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk<'a>(commands: &'a [Command], out: &mut Vec<&'a Command>) {
        for command in commands {
            out.push(command);
            walk(&command.subcommands, out);
        }
    }

    /// Tests that prefix invocations enforce the same permissions as slash invocations.
    ///
    /// Discord only applies `default_member_permissions` to slash commands, so a prefix
    /// command relies on `required_permissions` being checked by the framework.
    ///
    /// Expected: every prefix command with slash permissions requires at least those
    /// permissions
    #[test]
    fn prefix_commands_require_slash_permissions() {
        let commands = all();
        let mut flat = Vec::new();
        walk(&commands, &mut flat);

        for command in flat {
            if command.prefix_action.is_none() || command.default_member_permissions.is_empty() {
                continue;
            }
            assert!(
                command
                    .required_permissions
                    .contains(command.default_member_permissions),
                "{} is missing required_permissions",
                command.qualified_name
            );
        }
    }

    /// Tests that moderation commands cannot be run by prefix without permissions.
    ///
    /// Expected: ban requires BAN_MEMBERS and massnick requires MANAGE_NICKNAMES
    #[test]
    fn destructive_commands_require_permissions() {
        let commands = all();
        let find = |name: &str| {
            commands
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.required_permissions)
                .unwrap_or_default()
        };

        assert!(find("ban").contains(serenity::all::Permissions::BAN_MEMBERS));
        assert!(find("kick").contains(serenity::all::Permissions::KICK_MEMBERS));
        assert!(find("massnick").contains(serenity::all::Permissions::MANAGE_NICKNAMES));
        assert!(find("warnpunish").contains(serenity::all::Permissions::MANAGE_GUILD));
    }
}
