use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{GuildConfig, Warning};
///
/// let test = TestBuilder::new()
///     .with_table(GuildConfig)
///     .with_table(Warning)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables should be added in dependency order (tables with foreign
    /// keys after their referenced tables).
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds all tables required for warning and punishment operations.
    ///
    /// Adds in order:
    /// - GuildConfig
    /// - Warning
    /// - WarnPunishment
    pub fn with_moderation_tables(self) -> Self {
        self.with_table(GuildConfig)
            .with_table(Warning)
            .with_table(WarnPunishment)
    }

    /// Adds all tables required for ticket panels, tickets and cases.
    ///
    /// Adds in dependency order:
    /// - TicketPanel
    /// - TicketButton
    /// - TicketSelectMenu
    /// - TicketSelectOption
    /// - TicketCase
    /// - Ticket
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let test = TestBuilder::new()
    ///     .with_ticket_tables()
    ///     .build()
    ///     .await?;
    /// ```
    pub fn with_ticket_tables(self) -> Self {
        self.with_table(TicketPanel)
            .with_table(TicketButton)
            .with_table(TicketSelectMenu)
            .with_table(TicketSelectOption)
            .with_table(TicketCase)
            .with_table(Ticket)
    }

    /// Adds the auto-publish channel table and both blacklist tables.
    pub fn with_auto_publish_tables(self) -> Self {
        self.with_table(AutoPublishChannel)
            .with_table(PublishUserBlacklist)
            .with_table(PublishWordBlacklist)
    }

    /// Adds the AI conversation and message tables.
    pub fn with_ai_tables(self) -> Self {
        self.with_table(AiConversation).with_table(AiMessage)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
