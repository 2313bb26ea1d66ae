//! Cron jobs started once at boot.

pub mod reminders;
pub mod warn_expiry;
