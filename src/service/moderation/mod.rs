//! Moderation: direct actions, warnings with automatic punishments, and mass nickname runs.

pub mod action;
pub mod massnick;
pub mod warn;
