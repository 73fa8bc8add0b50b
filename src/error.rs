use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calendar_notifier::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calendar_notifier::config))]
    Config(String),

    #[error("Calendar fetch error: {0}")]
    #[diagnostic(
        code(calendar_notifier::calendar_fetch),
        help("check CALDAV_SERVER_URL and the CalDAV credentials")
    )]
    CalendarFetch(String),

    #[error("Notification error: {0}")]
    #[diagnostic(code(calendar_notifier::notify))]
    Notify(String),

    #[error(transparent)]
    #[diagnostic(code(calendar_notifier::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(calendar_notifier::other))]
    Other(String),
}

/// Why a single event block was skipped.
///
/// These never abort a run: the parser logs them and moves on to the next block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventParseError {
    #[error("event has no DTSTART field")]
    MissingStart,

    #[error("DTSTART is the last line of the block and is not terminated")]
    UnterminatedStart,

    #[error("DTSTART value {raw:?} does not look like NAME[;PARAMS]:YYYYMMDD")]
    MalformedStart { raw: String },

    #[error("DTSTART value {raw:?} has an invalid date: {source}")]
    InvalidDate {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Type alias for Result with our Error type
pub type NotifierResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create calendar fetch errors
pub fn fetch_error(message: &str) -> Error {
    Error::CalendarFetch(message.to_string())
}

/// Helper to create notification errors
pub fn notify_error(message: &str) -> Error {
    Error::Notify(message.to_string())
}
