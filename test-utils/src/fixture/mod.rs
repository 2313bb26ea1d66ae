//! Test fixtures providing reusable test data without database insertion.
//!
//! Fixture functions create in-memory entity models for unit tests and serve as default
//! values for factories. Unlike factories, fixtures do NOT insert data into the database.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! let button = fixture::ticket_button::entity();
//!
//! let danger = fixture::ticket_button::entity_builder()
//!     .style("danger")
//!     .build();
//! ```

pub mod ticket_button;
pub mod ticket_panel;
pub mod warning;

pub use ticket_button::{entity as ticket_button_entity, entity_builder as ticket_button_entity_builder};
pub use ticket_panel::entity as ticket_panel_entity;
pub use warning::{entity as warning_entity, entity_builder as warning_entity_builder};
