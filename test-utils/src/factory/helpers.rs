//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Gets a unique snowflake-sized id for guilds, channels and users in tests.
pub fn next_snowflake() -> i64 {
    100_000_000_000_000_000 + next_id() as i64
}

/// Creates a ticket panel in a fresh guild with a single default button.
///
/// # Returns
/// - `Ok((panel, button))` - Created panel and its button
/// - `Err(DbErr)` - Database error during creation
pub async fn create_panel_with_button(
    db: &DatabaseConnection,
) -> Result<(entity::ticket_panel::Model, entity::ticket_button::Model), DbErr> {
    let panel = crate::factory::ticket_panel::create_panel(db, next_snowflake()).await?;
    let button = crate::factory::ticket_button::create_button(db, panel.id).await?;

    Ok((panel, button))
}
