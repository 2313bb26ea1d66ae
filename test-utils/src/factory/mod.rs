//! Factory methods for creating test data.
//!
//! Factories insert entities with sensible defaults, reducing boilerplate in tests. Each
//! entity has its own module with a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let warning = factory::warning::create_warning(&db, guild_id, user_id).await?;
//!
//! let (panel, button) = factory::helpers::create_panel_with_button(&db).await?;
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let warning = factory::warning::WarningFactory::new(&db, guild_id, user_id)
//!     .reason("Off-topic")
//!     .created_at(Utc::now() - Duration::hours(48))
//!     .build()
//!     .await?;
//! ```

pub mod helpers;
pub mod reminder;
pub mod repeater;
pub mod ticket;
pub mod ticket_button;
pub mod ticket_panel;
pub mod warning;

pub use reminder::create_reminder;
pub use repeater::create_repeater;
pub use ticket::create_ticket;
pub use ticket_button::create_button;
pub use ticket_panel::create_panel;
pub use warning::create_warning;
