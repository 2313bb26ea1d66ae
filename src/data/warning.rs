//! Warning data repository for database operations.
//!
//! Provides the `WarningRepository` for storing member warnings and querying a member's
//! active (not forgiven) warnings. Warn log positions shown to moderators are 1-based
//! and ordered newest first; the selection helpers here resolve those positions to ids.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Select,
};

use crate::model::{
    guild_config::WarnExpireAction,
    moderation::{CreateWarningParam, Warning, WarningPage, WarningSelector},
};

/// Repository providing database operations for member warnings.
///
/// This struct holds a reference to the database connection and provides methods
/// for creating, listing, forgiving and deleting warning records.
pub struct WarningRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WarningRepository<'a> {
    /// Creates a new WarningRepository instance
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `WarningRepository` - new repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a new warning.
    ///
    /// # Arguments
    /// - `param` - Guild, member, moderator and optional reason
    ///
    /// # Returns
    /// - `Ok(Warning)` - The created warning
    /// - `Err(DbErr)` - Database error during insert
    pub async fn create(&self, param: CreateWarningParam) -> Result<Warning, DbErr> {
        let entity = entity::warning::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(param.guild_id as i64),
            user_id: ActiveValue::Set(param.user_id as i64),
            moderator_id: ActiveValue::Set(param.moderator_id as i64),
            reason: ActiveValue::Set(param.reason),
            forgiven: ActiveValue::Set(false),
            forgiven_by: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(Warning::from_entity(entity))
    }

    /// Counts a member's active warnings.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `user_id` - Discord user ID of the warned member
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings that have not been forgiven
    /// - `Err(DbErr)` - Database error during count
    pub async fn count_active(&self, guild_id: u64, user_id: u64) -> Result<u64, DbErr> {
        active_warnings(guild_id, user_id).count(self.db).await
    }

    /// Gets one page of a member's active warnings, newest first.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `user_id` - Discord user ID of the warned member
    /// - `page` - Zero-based page number
    /// - `per_page` - Number of warnings per page
    ///
    /// # Returns
    /// - `Ok(WarningPage)` - Warnings on the page plus totals
    /// - `Err(DbErr)` - Database error during query
    pub async fn get_active_page(
        &self,
        guild_id: u64,
        user_id: u64,
        page: u64,
        per_page: u64,
    ) -> Result<WarningPage, DbErr> {
        let paginator = active_warnings(guild_id, user_id).paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let total_pages = paginator.num_pages().await?;
        let entities = paginator.fetch_page(page).await?;

        Ok(WarningPage {
            warnings: entities.into_iter().map(Warning::from_entity).collect(),
            page,
            total,
            total_pages,
        })
    }

    /// Gets all of a member's active warnings, newest first.
    pub async fn get_active(&self, guild_id: u64, user_id: u64) -> Result<Vec<Warning>, DbErr> {
        let entities = active_warnings(guild_id, user_id).all(self.db).await?;

        Ok(entities.into_iter().map(Warning::from_entity).collect())
    }

    /// Resolves a warn log selection to warning ids.
    ///
    /// # Returns
    /// - `Ok(Vec<i32>)` - Matching ids, empty when the index is out of range
    /// - `Err(DbErr)` - Database error during query
    pub async fn select_ids(
        &self,
        guild_id: u64,
        user_id: u64,
        selector: WarningSelector,
    ) -> Result<Vec<i32>, DbErr> {
        let warnings = self.get_active(guild_id, user_id).await?;

        let ids = match selector {
            WarningSelector::All => warnings.iter().map(|w| w.id).collect(),
            WarningSelector::Index(index) => index
                .checked_sub(1)
                .and_then(|i| warnings.get(i))
                .map(|w| vec![w.id])
                .unwrap_or_default(),
        };

        Ok(ids)
    }

    /// Marks warnings as forgiven.
    ///
    /// # Arguments
    /// - `ids` - Warning ids to forgive
    /// - `forgiven_by` - Moderator who forgave them, `None` for automatic expiry
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings updated
    /// - `Err(DbErr)` - Database error during update
    pub async fn forgive(&self, ids: &[i32], forgiven_by: Option<u64>) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Warning::update_many()
            .col_expr(entity::warning::Column::Forgiven, Expr::value(true))
            .col_expr(
                entity::warning::Column::ForgivenBy,
                Expr::value(forgiven_by.map(|id| id as i64)),
            )
            .filter(entity::warning::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Deletes warnings by id.
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings deleted
    /// - `Err(DbErr)` - Database error during delete
    pub async fn delete(&self, ids: &[i32]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Warning::delete_many()
            .filter(entity::warning::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Applies the guild's expiry action to active warnings created before `cutoff`.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    /// - `cutoff` - Warnings created strictly before this instant expire
    /// - `action` - Forgive (`Clear`) or remove (`Delete`) expired warnings
    ///
    /// # Returns
    /// - `Ok(u64)` - Number of warnings affected
    /// - `Err(DbErr)` - Database error during update or delete
    pub async fn expire_before(
        &self,
        guild_id: u64,
        cutoff: DateTime<Utc>,
        action: WarnExpireAction,
    ) -> Result<u64, DbErr> {
        let ids: Vec<i32> = entity::prelude::Warning::find()
            .filter(entity::warning::Column::GuildId.eq(guild_id as i64))
            .filter(entity::warning::Column::Forgiven.eq(false))
            .filter(entity::warning::Column::CreatedAt.lt(cutoff))
            .all(self.db)
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect();

        match action {
            WarnExpireAction::Clear => self.forgive(&ids, None).await,
            WarnExpireAction::Delete => self.delete(&ids).await,
        }
    }
}

fn active_warnings(guild_id: u64, user_id: u64) -> Select<entity::prelude::Warning> {
    entity::prelude::Warning::find()
        .filter(entity::warning::Column::GuildId.eq(guild_id as i64))
        .filter(entity::warning::Column::UserId.eq(user_id as i64))
        .filter(entity::warning::Column::Forgiven.eq(false))
        .order_by_desc(entity::warning::Column::CreatedAt)
        .order_by_desc(entity::warning::Column::Id)
}
