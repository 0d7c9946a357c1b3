//! # foyer-shared
//!
//! Domain types and pure logic shared by every Foyer crate: user and message
//! identifiers, the calendar-week resolver, time-block validation, and the
//! validation error taxonomy.  Nothing in this crate performs I/O.

pub mod constants;
pub mod schedule;
pub mod types;
pub mod week;

mod error;

pub use error::ValidationError;
pub use types::{DayOfWeek, MessageId, UserId};
pub use week::{WeekContext, WeekKey};
