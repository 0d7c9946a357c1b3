//! Notice operations: append-only posts, read receipts, soft deletion.
//!
//! Receipts are written with `INSERT OR IGNORE` against a unique
//! (message_id, user_id) index, so acknowledging is a single atomic upsert
//! and repeating it is a no-op.  Deletion stamps `deleted_at` behind a
//! `WHERE deleted_at IS NULL` guard; the row and its receipts are retained.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use foyer_shared::constants::MAX_MESSAGE_LEN;
use foyer_shared::{MessageId, UserId, ValidationError};

use crate::auth;
use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{Message, MessageRead, MessageWithReads};

impl Database {
    /// Post a new notice.  Content is trimmed, and must be non-empty and at
    /// most [`MAX_MESSAGE_LEN`] characters.
    pub fn post_message(&self, sender_id: UserId, content: &str) -> Result<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent.into());
        }
        let len = content.chars().count();
        if len > MAX_MESSAGE_LEN {
            return Err(ValidationError::ContentTooLong {
                len,
                max: MAX_MESSAGE_LEN,
            }
            .into());
        }

        let message = Message {
            id: MessageId::new(),
            sender_id,
            content: content.to_string(),
            created_at: Utc::now(),
            deleted_at: None,
        };

        self.conn().execute(
            "INSERT INTO messages (id, sender_id, content, created_at, deleted_at)
             VALUES (?1, ?2, ?3, ?4, NULL)",
            params![
                message.id.to_string(),
                message.sender_id.0,
                message.content,
                message.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(msg = %message.id, sender = %sender_id, "notice posted");
        Ok(message)
    }

    /// List non-deleted notices, newest first, each annotated with its
    /// read-receipt set.
    pub fn list_active_messages(&self, limit: u32, offset: u32) -> Result<Vec<MessageWithReads>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, sender_id, content, created_at, deleted_at
             FROM messages
             WHERE deleted_at IS NULL
             ORDER BY created_at DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let rows = stmt.query_map(params![limit, offset], row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }

        let mut annotated = Vec::with_capacity(messages.len());
        for message in messages {
            let reads = self.get_reads_for_message(message.id)?;
            annotated.push(MessageWithReads { message, reads });
        }
        Ok(annotated)
    }

    /// Fetch one notice by id, soft-deleted or not.
    pub fn get_message(&self, id: MessageId) -> Result<Message> {
        self.conn()
            .query_row(
                "SELECT id, sender_id, content, created_at, deleted_at
                 FROM messages WHERE id = ?1",
                params![id.to_string()],
                row_to_message,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Record that `user_id` has seen a notice.  Idempotent: the first call
    /// creates the receipt, later calls change nothing, and both return
    /// `true`.  Fails with `NotFound` only when the notice is absent or
    /// soft-deleted.
    pub fn mark_read(&self, message_id: MessageId, user_id: UserId) -> Result<bool> {
        let message = self.get_message(message_id)?;
        if message.is_deleted() {
            return Err(StoreError::NotFound);
        }

        self.conn().execute(
            "INSERT OR IGNORE INTO message_reads (id, message_id, user_id, read_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Uuid::new_v4().to_string(),
                message_id.to_string(),
                user_id.0,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(true)
    }

    /// Soft-delete a notice on behalf of `requester_id`.
    ///
    /// Only the sender may delete; anyone else gets `Forbidden`.  A missing
    /// or already-deleted notice is a normal `false` outcome.  The row and
    /// its receipts are retained.
    pub fn soft_delete_message(&self, message_id: MessageId, requester_id: UserId) -> Result<bool> {
        let message = match self.get_message(message_id) {
            Ok(message) => message,
            Err(StoreError::NotFound) => return Ok(false),
            Err(other) => return Err(other),
        };

        if !auth::can_delete(&message, requester_id) {
            return Err(StoreError::Forbidden("only the sender may delete a notice"));
        }
        if message.is_deleted() {
            return Ok(false);
        }

        let affected = self.conn().execute(
            "UPDATE messages SET deleted_at = ?1 WHERE id = ?2 AND deleted_at IS NULL",
            params![Utc::now().to_rfc3339(), message_id.to_string()],
        )?;

        tracing::debug!(msg = %message_id, "notice deleted");
        Ok(affected > 0)
    }

    /// Receipts for one notice, oldest first.  Works for soft-deleted
    /// notices too: read history outlives deletion.
    pub fn get_reads_for_message(&self, message_id: MessageId) -> Result<Vec<MessageRead>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, message_id, user_id, read_at
             FROM message_reads
             WHERE message_id = ?1
             ORDER BY read_at ASC",
        )?;

        let rows = stmt.query_map(params![message_id.to_string()], row_to_read)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let sender_id: i64 = row.get(1)?;
    let content: String = row.get(2)?;
    let created_str: String = row.get(3)?;
    let deleted_str: Option<String> = row.get(4)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let deleted_at = deleted_str
        .map(|s| DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Message {
        id: MessageId(id),
        sender_id: UserId(sender_id),
        content,
        created_at,
        deleted_at,
    })
}

fn row_to_read(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRead> {
    let id_str: String = row.get(0)?;
    let message_id_str: String = row.get(1)?;
    let user_id: i64 = row.get(2)?;
    let read_str: String = row.get(3)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let message_id = Uuid::parse_str(&message_id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let read_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&read_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(MessageRead {
        id,
        message_id: MessageId(message_id),
        user_id: UserId(user_id),
        read_at,
    })
}
