//! Time blocks and the per-day invariants of the weekly schedule.
//!
//! Validation lives here so the store and the API layer agree on exactly one
//! definition of a well-formed day: every block shape-checked, timed blocks
//! pairwise non-overlapping under half-open `[start, end)` comparison.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_LABEL_LEN;
use crate::error::ValidationError;
use crate::types::{DayOfWeek, UserId};

/// One availability block within a single day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBlock {
    /// Assigned by the store on first write; `None` for new blocks.
    pub id: Option<Uuid>,
    /// Inclusive start of the block.  Ignored when `all_day` is set.
    pub start: Option<NaiveTime>,
    /// Exclusive end of the block.  Ignored when `all_day` is set.
    pub end: Option<NaiveTime>,
    /// Free-text label shown on the board ("Work", "Gym", ...).
    pub label: String,
    /// Whole-day block; exempt from time-range and overlap checks.
    pub all_day: bool,
}

impl TimeBlock {
    /// Shape check for a single block.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.chars().count() > MAX_LABEL_LEN {
            return Err(ValidationError::LabelTooLong { max: MAX_LABEL_LEN });
        }
        if self.all_day {
            return Ok(());
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) if start < end => Ok(()),
            (Some(start), Some(end)) => Err(ValidationError::InvalidTimeRange { start, end }),
            _ => Err(ValidationError::MissingTime),
        }
    }

    /// Half-open `[start, end)` interval overlap.  All-day blocks never
    /// conflict.
    pub fn overlaps(&self, other: &TimeBlock) -> bool {
        if self.all_day || other.all_day {
            return false;
        }
        match (self.start, self.end, other.start, other.end) {
            (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) => {
                a_start < b_end && b_start < a_end
            }
            _ => false,
        }
    }

    fn span(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
            }
            _ => self.label.clone(),
        }
    }
}

/// Validate a full replacement sequence for one day: every block well
/// formed, no two timed blocks overlapping.
pub fn validate_day(blocks: &[TimeBlock]) -> Result<(), ValidationError> {
    for block in blocks {
        block.validate()?;
    }
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.overlaps(b) {
                return Err(ValidationError::OverlappingBlocks {
                    first: a.span(),
                    second: b.span(),
                });
            }
        }
    }
    Ok(())
}

/// Canonical in-day ordering: all-day blocks first, then ascending start.
pub fn sort_blocks(blocks: &mut [TimeBlock]) {
    blocks.sort_by_key(|b| (!b.all_day, b.start));
}

/// Seven-day block map for one user in one week.
///
/// Every day is present; days without blocks hold an empty vector, never
/// null.  Serializes as a map keyed by lowercase day name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSchedule(BTreeMap<DayOfWeek, Vec<TimeBlock>>);

impl UserSchedule {
    /// Empty week: all seven days, no blocks.
    pub fn empty() -> Self {
        Self(DayOfWeek::ALL.iter().map(|d| (*d, Vec::new())).collect())
    }

    pub fn day(&self, day: DayOfWeek) -> &[TimeBlock] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace one day's blocks, normalizing to canonical order.
    pub fn set_day(&mut self, day: DayOfWeek, mut blocks: Vec<TimeBlock>) {
        sort_blocks(&mut blocks);
        self.0.insert(day, blocks);
    }

    /// Days in Monday-first order.
    pub fn days(&self) -> impl Iterator<Item = (DayOfWeek, &[TimeBlock])> {
        self.0.iter().map(|(day, blocks)| (*day, blocks.as_slice()))
    }
}

impl Default for UserSchedule {
    fn default() -> Self {
        Self::empty()
    }
}

/// All household schedules for one week, keyed by user id.
pub type Schedules = BTreeMap<UserId, UserSchedule>;
