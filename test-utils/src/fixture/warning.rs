//! Warning fixtures for creating in-memory test data.

use chrono::{DateTime, TimeZone, Utc};
use entity::warning;

pub const DEFAULT_GUILD_ID: i64 = 987654321;
pub const DEFAULT_USER_ID: i64 = 111111111;
pub const DEFAULT_MODERATOR_ID: i64 = 222222222;

/// Creates an active warning entity model with default values.
///
/// # Default Values
/// - id: `1`
/// - guild_id: `987654321`
/// - user_id: `111111111`
/// - moderator_id: `222222222`
/// - reason: `Some("Spamming")`
/// - forgiven: `false`
/// - created_at: `2026-01-01T00:00:00Z`
pub fn entity() -> warning::Model {
    entity_builder().build()
}

pub fn entity_builder() -> WarningEntityBuilder {
    WarningEntityBuilder::default()
}

/// Builder for creating customized warning entity models.
pub struct WarningEntityBuilder {
    entity: warning::Model,
}

impl Default for WarningEntityBuilder {
    fn default() -> Self {
        Self {
            entity: warning::Model {
                id: 1,
                guild_id: DEFAULT_GUILD_ID,
                user_id: DEFAULT_USER_ID,
                moderator_id: DEFAULT_MODERATOR_ID,
                reason: Some("Spamming".to_string()),
                forgiven: false,
                forgiven_by: None,
                created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            },
        }
    }
}

impl WarningEntityBuilder {
    pub fn id(mut self, id: i32) -> Self {
        self.entity.id = id;
        self
    }

    pub fn guild_id(mut self, guild_id: i64) -> Self {
        self.entity.guild_id = guild_id;
        self
    }

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.entity.user_id = user_id;
        self
    }

    pub fn moderator_id(mut self, moderator_id: i64) -> Self {
        self.entity.moderator_id = moderator_id;
        self
    }

    pub fn reason(mut self, reason: Option<&str>) -> Self {
        self.entity.reason = reason.map(str::to_string);
        self
    }

    /// Marks the warning forgiven by the given moderator.
    pub fn forgiven_by(mut self, moderator_id: i64) -> Self {
        self.entity.forgiven = true;
        self.entity.forgiven_by = Some(moderator_id);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.entity.created_at = created_at;
        self
    }

    pub fn build(self) -> warning::Model {
        self.entity
    }
}
