/// Errors raised by the memory aggregation core.
///
/// `Clone` so one failed recomputation can be handed to every caller that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MemoriesError {
    #[error("invalid anchor date '{0}': expected YYYY-MM-DD")]
    InvalidAnchor(String),
    #[error("month {month} has no day {day}")]
    InvalidDay { month: u32, day: u32 },
    #[error("year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),
    #[error("timestamp {0} ms is outside the supported calendar range")]
    TimestampOutOfRange(i64),
    #[error("empty year range {from}..={to}")]
    EmptyYearRange { from: i32, to: i32 },
    #[error("invalid notification time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
    #[error("asset library unavailable: {0}")]
    LibraryUnavailable(String),
    #[error("background worker failed: {0}")]
    Worker(String),
}

impl From<rusqlite::Error> for MemoriesError {
    fn from(e: rusqlite::Error) -> Self {
        MemoriesError::LibraryUnavailable(e.to_string())
    }
}

impl From<tokio::task::JoinError> for MemoriesError {
    fn from(e: tokio::task::JoinError) -> Self {
        MemoriesError::Worker(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MemoriesError>;
