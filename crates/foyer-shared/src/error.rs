use chrono::NaiveTime;
use thiserror::Error;

/// A caller-supplied value violated a domain invariant.
///
/// Always reported back to the caller, never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Message content is empty")]
    EmptyContent,

    #[error("Message content is {len} characters (maximum {max})")]
    ContentTooLong { len: usize, max: usize },

    #[error("Block label exceeds {max} characters")]
    LabelTooLong { max: usize },

    #[error("Timed block is missing a start or end time")]
    MissingTime,

    #[error("Block start {start} is not before end {end}")]
    InvalidTimeRange { start: NaiveTime, end: NaiveTime },

    #[error("Blocks {first} and {second} overlap")]
    OverlappingBlocks { first: String, second: String },

    #[error("Invalid week key: {0}")]
    InvalidWeekKey(String),

    #[error("Unknown day name: {0}")]
    UnknownDay(String),
}
