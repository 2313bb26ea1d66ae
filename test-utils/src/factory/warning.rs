//! Warning factory for creating test warning entities.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

use crate::fixture;

/// Factory for creating test warnings with customizable fields.
///
/// Defaults are sourced from `fixture::warning::entity()` with `created_at` set to now so
/// the warning counts as active.
///
/// # Example
///
/// ```rust,ignore
/// let warning = WarningFactory::new(&db, guild_id, user_id)
///     .forgiven_by(moderator_id)
///     .build()
///     .await?;
/// ```
pub struct WarningFactory<'a> {
    db: &'a DatabaseConnection,
    entity: entity::warning::Model,
}

impl<'a> WarningFactory<'a> {
    pub fn new(db: &'a DatabaseConnection, guild_id: i64, user_id: i64) -> Self {
        let entity = fixture::warning::entity_builder()
            .guild_id(guild_id)
            .user_id(user_id)
            .created_at(Utc::now())
            .build();

        Self { db, entity }
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.entity.reason = Some(reason.to_string());
        self
    }

    pub fn moderator_id(mut self, moderator_id: i64) -> Self {
        self.entity.moderator_id = moderator_id;
        self
    }

    pub fn forgiven_by(mut self, moderator_id: i64) -> Self {
        self.entity.forgiven = true;
        self.entity.forgiven_by = Some(moderator_id);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.entity.created_at = created_at;
        self
    }

    /// Builds and inserts the warning entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::warning::Model)` - Created warning entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::warning::Model, DbErr> {
        entity::warning::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.entity.guild_id),
            user_id: ActiveValue::Set(self.entity.user_id),
            moderator_id: ActiveValue::Set(self.entity.moderator_id),
            reason: ActiveValue::Set(self.entity.reason),
            forgiven: ActiveValue::Set(self.entity.forgiven),
            forgiven_by: ActiveValue::Set(self.entity.forgiven_by),
            created_at: ActiveValue::Set(self.entity.created_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active warning with default values.
///
/// Shorthand for `WarningFactory::new(db, guild_id, user_id).build().await`.
pub async fn create_warning(
    db: &DatabaseConnection,
    guild_id: i64,
    user_id: i64,
) -> Result<entity::warning::Model, DbErr> {
    WarningFactory::new(db, guild_id, user_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_active_warning_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let warning = create_warning(db, 1, 2).await?;

        assert_eq!(warning.guild_id, 1);
        assert_eq!(warning.user_id, 2);
        assert!(!warning.forgiven);
        assert!(warning.forgiven_by.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn creates_forgiven_warning() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_table(Warning).build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let warning = WarningFactory::new(db, 1, 2)
            .reason("Off-topic")
            .forgiven_by(3)
            .build()
            .await?;

        assert_eq!(warning.reason.as_deref(), Some("Off-topic"));
        assert!(warning.forgiven);
        assert_eq!(warning.forgiven_by, Some(3));

        Ok(())
    }
}
