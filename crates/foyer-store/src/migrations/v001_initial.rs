//! v001 -- Initial schema creation.
//!
//! Creates the four core tables: `users`, `schedule_blocks`, `messages`,
//! and `message_reads`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users (household roster, curated externally)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY NOT NULL,
    display_name TEXT NOT NULL,
    color        TEXT NOT NULL,                -- color tag for the board
    initial      TEXT NOT NULL,                -- single-character badge
    created_at   TEXT NOT NULL                 -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Schedule blocks
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS schedule_blocks (
    id         TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    user_id    INTEGER NOT NULL,               -- FK -> users(id), trusted
    week_key   TEXT NOT NULL,                  -- e.g. 2025-W32
    day        TEXT NOT NULL,                  -- lowercase weekday name
    start_time TEXT,                           -- HH:MM, NULL for all-day
    end_time   TEXT,                           -- HH:MM, NULL for all-day
    label      TEXT NOT NULL,
    all_day    INTEGER NOT NULL DEFAULT 0,     -- boolean 0/1
    date       TEXT,                           -- resolved calendar date
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_blocks_user_week_day
    ON schedule_blocks(user_id, week_key, day);

-- ----------------------------------------------------------------
-- Messages (notices, soft-deleted via deleted_at)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id         TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    sender_id  INTEGER NOT NULL,
    content    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    deleted_at TEXT                            -- NULL while active
);

CREATE INDEX IF NOT EXISTS idx_messages_active
    ON messages(created_at DESC) WHERE deleted_at IS NULL;

-- ----------------------------------------------------------------
-- Message reads (at most one per message/user pair)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS message_reads (
    id         TEXT PRIMARY KEY NOT NULL,      -- UUID v4
    message_id TEXT NOT NULL,
    user_id    INTEGER NOT NULL,
    read_at    TEXT NOT NULL,

    FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_reads_message_user
    ON message_reads(message_id, user_id);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
