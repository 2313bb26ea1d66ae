//! Test factory for creating Serenity Role objects.

use serenity::all::Role;

/// Creates a test Serenity Role at the given hierarchy position with no permissions.
///
/// # Arguments
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name
/// - `position` - Role position in the hierarchy (higher = more important)
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
pub fn create_test_role(role_id: u64, name: &str, position: i16) -> Role {
    create_test_role_with_permissions(role_id, name, position, 0)
}

/// Creates a test Serenity Role carrying the given permission bits.
pub fn create_test_role_with_permissions(
    role_id: u64,
    name: &str,
    position: i16,
    permissions: u64,
) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "name": name,
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": permissions.to_string(),
        "managed": false,
        "mentionable": false,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_role_at_position() {
        let role = create_test_role_with_permissions(10, "Moderator", 20, 8);

        assert_eq!(role.id.get(), 10);
        assert_eq!(role.position, 20);
        assert!(role.permissions.administrator());
    }
}
