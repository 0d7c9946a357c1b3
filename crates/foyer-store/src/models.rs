//! Domain model structs persisted in the local SQLite database.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the contract layer when assembling response payloads.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foyer_shared::schedule::TimeBlock;
use foyer_shared::{DayOfWeek, MessageId, UserId, WeekKey};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A household member.  The roster is curated externally; the store keeps it
/// only for read-only display joins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Human-readable display name.
    pub display_name: String,
    /// Color tag used by the board UI.
    pub color: String,
    /// Single-character badge initial.
    pub initial: String,
    /// Timestamp when this member was first added to the roster.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Schedule record
// ---------------------------------------------------------------------------

/// The persisted form of a [`TimeBlock`]: one row per block, keyed to its
/// owner, week, and day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleRecord {
    /// Unique block identifier.
    pub id: Uuid,
    /// The member this block belongs to.
    pub user_id: UserId,
    /// Week partition key.
    pub week_key: WeekKey,
    /// Weekday within the week.
    pub day: DayOfWeek,
    /// Block start (`None` for all-day blocks).
    pub start: Option<NaiveTime>,
    /// Block end (`None` for all-day blocks).
    pub end: Option<NaiveTime>,
    /// Free-text label.
    pub label: String,
    /// Whole-day flag.
    pub all_day: bool,
    /// Calendar date resolved from week and day at write time.
    pub date: Option<NaiveDate>,
    /// When the row was written.
    pub created_at: DateTime<Utc>,
}

impl ScheduleRecord {
    /// Strip persistence keys down to the exchanged block shape.
    pub fn to_block(&self) -> TimeBlock {
        TimeBlock {
            id: Some(self.id),
            start: self.start,
            end: self.end,
            label: self.label.clone(),
            all_day: self.all_day,
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single notice on the household board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique notice identifier.
    pub id: MessageId,
    /// The member who posted the notice.
    pub sender_id: UserId,
    /// Notice text (non-empty, bounded).
    pub content: String,
    /// When the notice was posted.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker; the row is retained once set.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// ---------------------------------------------------------------------------
// Message read
// ---------------------------------------------------------------------------

/// A read receipt: one member acknowledged one notice.  At most one exists
/// per (message, user) pair, and receipts are never removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRead {
    /// Unique receipt identifier.
    pub id: Uuid,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub read_at: DateTime<Utc>,
}

/// A notice annotated with its read-receipt set, for display purposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageWithReads {
    pub message: Message,
    pub reads: Vec<MessageRead>,
}
