//! Calendar-week resolution.
//!
//! Schedule data is partitioned by week key: `YYYY-Www` under ISO-8601
//! numbering, weeks starting on Monday.  Two dates share a key iff they fall
//! in the same ISO week, and lexicographic key order matches chronological
//! order.  Resolution is pure; only `is_current_week` consults the clock,
//! and the `resolve_on` form takes "today" explicitly.

use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::DayOfWeek;

/// Stable identifier for one Monday-to-Sunday week, e.g. `2025-W32`.
///
/// Internally the Monday that starts the week; the textual form is derived,
/// so every constructed key names a real ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    monday: NaiveDate,
}

impl WeekKey {
    /// Key of the week containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        Self { monday }
    }

    /// Parse a `YYYY-Www` key, rejecting strings that do not name a real
    /// ISO week (wrong shape, week 00, or week 53 of a 52-week year).
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let err = || ValidationError::InvalidWeekKey(s.to_string());

        let (year_part, week_part) = s.split_once("-W").ok_or_else(err)?;
        if year_part.len() != 4 || week_part.len() != 2 {
            return Err(err());
        }
        let year: i32 = year_part.parse().map_err(|_| err())?;
        let week: u32 = week_part.parse().map_err(|_| err())?;

        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).ok_or_else(err)?;
        Ok(Self { monday })
    }

    /// Monday of this week.
    pub fn start(&self) -> NaiveDate {
        self.monday
    }

    /// Sunday of this week.
    pub fn end(&self) -> NaiveDate {
        self.monday + Duration::days(6)
    }

    /// The key `n` weeks away (negative for past weeks).
    pub fn offset(&self, n: i64) -> Self {
        Self {
            monday: self.monday + Duration::weeks(n),
        }
    }

    /// Calendar date of `day` within this week.
    pub fn date_of(&self, day: DayOfWeek) -> NaiveDate {
        self.monday + Duration::days(day.offset_from_week_start())
    }
}

impl std::fmt::Display for WeekKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let iso = self.monday.iso_week();
        write!(f, "{:04}-W{:02}", iso.year(), iso.week())
    }
}

impl TryFrom<String> for WeekKey {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

/// A resolved week: key, bounds, and whether it is the week "now" falls in.
/// Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekContext {
    pub week_key: WeekKey,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub is_current_week: bool,
}

/// Resolve `date` against the week containing it, judging
/// `is_current_week` from the UTC calendar date at call time.
pub fn resolve(date: NaiveDate) -> WeekContext {
    resolve_on(date, Utc::now().date_naive())
}

/// Pure core of [`resolve`]: `today` only decides `is_current_week`.
pub fn resolve_on(date: NaiveDate, today: NaiveDate) -> WeekContext {
    let week_key = WeekKey::for_date(date);
    WeekContext {
        week_key,
        week_start: week_key.start(),
        week_end: week_key.end(),
        is_current_week: week_key == WeekKey::for_date(today),
    }
}
