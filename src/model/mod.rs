//! Domain models and operation-specific parameter types.
//!
//! Repositories convert SeaORM entity models into these types at the data layer
//! boundary via `from_entity`, so services and commands never touch entity models
//! directly. Snowflake ids are stored as `i64` in the database and exposed as `u64`.

pub mod ai;
pub mod auto_publish;
pub mod guild_config;
pub mod join_leave;
pub mod message_count;
pub mod moderation;
pub mod music;
pub mod reminder;
pub mod repeater;
pub mod ticket;
