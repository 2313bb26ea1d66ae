//! Role hierarchy checks for moderation actions.
//!
//! Discord only lets a member act on members whose highest role is strictly lower than
//! their own; the guild owner outranks everyone and cannot be acted on.

use serenity::all::{Guild, Member, UserId};

use crate::error::AppError;

/// Position of the member's highest role, `0` when they only have `@everyone`.
pub fn highest_role_position(guild: &Guild, member: &Member) -> u16 {
    member
        .roles
        .iter()
        .filter_map(|role_id| guild.roles.get(role_id))
        .map(|role| role.position)
        .max()
        .unwrap_or(0)
}

/// Whether `actor` ranks above `target` in the guild's role hierarchy.
pub fn outranks(guild: &Guild, actor: &Member, target: &Member) -> bool {
    if target.user.id == guild.owner_id {
        return false;
    }
    if actor.user.id == guild.owner_id {
        return true;
    }

    highest_role_position(guild, actor) > highest_role_position(guild, target)
}

/// Ensures both the moderator and the bot rank above the target.
///
/// # Returns
/// - `Ok(())` - The action may proceed
/// - `Err(AppError::PermissionDenied)` - Target is the moderator, the owner, or ranks too high
pub fn check_hierarchy(
    guild: &Guild,
    moderator: &Member,
    bot: &Member,
    target: &Member,
) -> Result<(), AppError> {
    if moderator.user.id == target.user.id {
        return Err(AppError::PermissionDenied(
            "You can't use this on yourself.".to_string(),
        ));
    }
    if target.user.id == guild.owner_id {
        return Err(AppError::PermissionDenied(
            "The server owner can't be moderated.".to_string(),
        ));
    }
    if !outranks(guild, moderator, target) {
        return Err(AppError::PermissionDenied(format!(
            "<@{}> has a role equal to or higher than yours.",
            target.user.id
        )));
    }
    if !outranks(guild, bot, target) {
        return Err(AppError::PermissionDenied(format!(
            "My highest role is not above <@{}>.",
            target.user.id
        )));
    }

    Ok(())
}

/// Whether the bot can rename the member; used to pick mass nickname targets.
pub fn bot_can_manage(guild: &Guild, bot_id: UserId, bot: &Member, target: &Member) -> bool {
    target.user.id != bot_id && outranks(guild, bot, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::serenity::{create_test_guild, create_test_member, create_test_role};

    const GUILD: u64 = 900;
    const OWNER: u64 = 1;

    fn guild() -> Guild {
        create_test_guild(
            GUILD,
            OWNER,
            vec![
                create_test_role(10, "Bot", 30),
                create_test_role(11, "Moderator", 20),
                create_test_role(12, "Member", 10),
            ],
        )
    }

    #[test]
    fn uses_highest_assigned_role() {
        let guild = guild();
        let member = create_test_member(GUILD, 5, "alice", &[12, 11]);

        assert_eq!(highest_role_position(&guild, &member), 20);
    }

    #[test]
    fn allows_moderator_above_target() {
        let guild = guild();
        let moderator = create_test_member(GUILD, 2, "mod", &[11]);
        let bot = create_test_member(GUILD, 3, "bot", &[10]);
        let target = create_test_member(GUILD, 4, "member", &[12]);

        assert!(check_hierarchy(&guild, &moderator, &bot, &target).is_ok());
    }

    #[test]
    fn denies_equal_rank() {
        let guild = guild();
        let moderator = create_test_member(GUILD, 2, "mod", &[11]);
        let bot = create_test_member(GUILD, 3, "bot", &[10]);
        let target = create_test_member(GUILD, 4, "other-mod", &[11]);

        assert!(matches!(
            check_hierarchy(&guild, &moderator, &bot, &target),
            Err(AppError::PermissionDenied(_))
        ));
    }

    #[test]
    fn denies_when_bot_is_too_low() {
        let guild = guild();
        let moderator = create_test_member(GUILD, OWNER, "owner", &[]);
        let bot = create_test_member(GUILD, 3, "bot", &[12]);
        let target = create_test_member(GUILD, 4, "mod", &[11]);

        let err = check_hierarchy(&guild, &moderator, &bot, &target).unwrap_err();
        assert!(err.user_message().contains("My highest role"));
    }

    #[test]
    fn never_allows_acting_on_owner_or_self() {
        let guild = guild();
        let moderator = create_test_member(GUILD, 2, "mod", &[11]);
        let bot = create_test_member(GUILD, 3, "bot", &[10]);
        let owner = create_test_member(GUILD, OWNER, "owner", &[]);

        assert!(check_hierarchy(&guild, &moderator, &bot, &owner).is_err());
        assert!(check_hierarchy(&guild, &moderator, &bot, &moderator).is_err());
    }
}
