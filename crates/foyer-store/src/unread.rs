//! Derived unread counts.
//!
//! Read-only: safe to call arbitrarily often, which the badge endpoint does
//! on a polling timer.

use rusqlite::params;

use foyer_shared::UserId;

use crate::database::Database;
use crate::error::Result;

impl Database {
    /// Number of active notices `user_id` has not acknowledged.
    ///
    /// A member's own notices count until explicitly marked read; nothing is
    /// auto-acknowledged on post.
    pub fn count_unread(&self, user_id: UserId) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*)
             FROM messages m
             WHERE m.deleted_at IS NULL
               AND NOT EXISTS (
                   SELECT 1 FROM message_reads r
                   WHERE r.message_id = m.id AND r.user_id = ?1
               )",
            params![user_id.0],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn unread_drops_once_on_first_acknowledgement() {
        let (_dir, db) = test_db();
        let message = db.post_message(UserId(1), "Dinner at 7").unwrap();

        assert_eq!(db.count_unread(UserId(2)).unwrap(), 1);

        db.mark_read(message.id, UserId(2)).unwrap();
        assert_eq!(db.count_unread(UserId(2)).unwrap(), 0);

        // Acknowledging again changes nothing.
        db.mark_read(message.id, UserId(2)).unwrap();
        assert_eq!(db.count_unread(UserId(2)).unwrap(), 0);
    }

    #[test]
    fn own_messages_count_until_acknowledged() {
        let (_dir, db) = test_db();
        let message = db.post_message(UserId(1), "note to self").unwrap();

        assert_eq!(db.count_unread(UserId(1)).unwrap(), 1);
        db.mark_read(message.id, UserId(1)).unwrap();
        assert_eq!(db.count_unread(UserId(1)).unwrap(), 0);
    }

    #[test]
    fn deleted_messages_never_count() {
        let (_dir, db) = test_db();
        let message = db.post_message(UserId(1), "going away").unwrap();
        assert_eq!(db.count_unread(UserId(2)).unwrap(), 1);

        db.soft_delete_message(message.id, UserId(1)).unwrap();
        assert_eq!(db.count_unread(UserId(2)).unwrap(), 0);
    }
}
