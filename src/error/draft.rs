use thiserror::Error;

/// Errors raised by the ticket button creation wizard.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DraftError {
    /// No draft exists for the user, or it expired.
    #[error("Your ticket button setup has expired, please start again")]
    NotFound,

    /// `build()` was called before a required step was completed.
    #[error("The ticket button is missing its {0}")]
    MissingField(&'static str),
}
