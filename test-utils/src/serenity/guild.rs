//! Test factory for creating Serenity Guild objects.

use serenity::all::{Guild, Role};

/// Creates a test Serenity Guild owned by `owner_id` with the given roles.
///
/// The `@everyone` role (same id as the guild, position 0) is always added.
///
/// # Panics
/// - If the JSON cannot be deserialized into a Guild (indicates invalid test data)
pub fn create_test_guild(guild_id: u64, owner_id: u64, roles: Vec<Role>) -> Guild {
    let mut role_values = vec![serde_json::json!({
        "id": guild_id.to_string(),
        "name": "@everyone",
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "position": 0,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    })];
    role_values.extend(
        roles
            .iter()
            .map(|role| serde_json::to_value(role).expect("Failed to serialize test role")),
    );

    serde_json::from_value(serde_json::json!({
        "id": guild_id.to_string(),
        "name": "Test Guild",
        "icon": null,
        "owner_id": owner_id.to_string(),
        "afk_timeout": 300,
        "verification_level": 0,
        "default_message_notifications": 0,
        "explicit_content_filter": 0,
        "roles": role_values,
        "emojis": [],
        "stickers": [],
        "features": [],
        "mfa_level": 0,
        "system_channel_flags": 0,
        "premium_tier": 0,
        "premium_subscription_count": 0,
        "premium_progress_bar_enabled": false,
        "preferred_locale": "en-US",
        "nsfw_level": 0,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "large": false,
        "member_count": 100,
        "voice_states": [],
        "channels": [],
        "threads": [],
        "presences": [],
        "max_presences": 25000,
        "max_members": 100000,
        "unavailable": false,
        "members": [],
        "stage_instances": [],
        "guild_scheduled_events": [],
    }))
    .expect("Failed to create test guild - invalid JSON structure")
}
