use thiserror::Error;

/// Errors produced while parsing user supplied durations such as `1d2h30m` or `1:30`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("No time was provided")]
    Empty,

    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    #[error("Unknown time unit '{0}', use s, m, h, d or w")]
    InvalidUnit(char),

    #[error("A number is missing its unit")]
    MissingUnit,

    #[error("The duration must be greater than zero")]
    Zero,

    #[error("The duration may not exceed {0}")]
    TooLong(String),
}
