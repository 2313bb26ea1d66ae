//! Test factories for creating Serenity API objects.
//!
//! These create valid Serenity structs by deserializing JSON, simulating what Discord's API
//! would return, so permission and hierarchy logic can be tested without a gateway.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_guild, create_test_member, create_test_role};
//!
//! let guild = create_test_guild(123456789, 100, vec![
//!     create_test_role(111111111, "Moderator", 10),
//!     create_test_role(222222222, "Member", 1),
//! ]);
//! let member = create_test_member(123456789, 200, "alice", &[111111111]);
//! ```

pub mod guild;
pub mod member;
pub mod role;

pub use guild::create_test_guild;
pub use member::create_test_member;
pub use role::create_test_role;
