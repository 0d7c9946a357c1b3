//! Schedule operations: per-user, per-day block sets keyed by week.
//!
//! Writes go through [`Database::replace_day`], which validates the whole
//! replacement sequence first and applies it inside a single write
//! transaction, so a failed validation leaves prior state untouched and a
//! concurrent writer to the same (user, week, day) key cannot interleave.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rusqlite::{params, TransactionBehavior};
use uuid::Uuid;

use foyer_shared::schedule::{self, Schedules, TimeBlock, UserSchedule};
use foyer_shared::{DayOfWeek, UserId, WeekKey};

use crate::database::Database;
use crate::error::Result;
use crate::models::ScheduleRecord;

impl Database {
    /// Fetch one member's week: all seven days, empty days included, blocks
    /// in canonical order (all-day first, then ascending start).
    pub fn get_week(&self, user_id: UserId, week_key: &WeekKey) -> Result<UserSchedule> {
        let mut stmt = self.conn().prepare(
            "SELECT id, user_id, week_key, day, start_time, end_time, label, all_day, date, created_at
             FROM schedule_blocks
             WHERE user_id = ?1 AND week_key = ?2",
        )?;

        let rows = stmt.query_map(params![user_id.0, week_key.to_string()], row_to_record)?;

        let mut schedule = UserSchedule::empty();
        let mut by_day: Vec<(DayOfWeek, Vec<TimeBlock>)> = Vec::new();
        for row in rows {
            let record = row?;
            match by_day.iter_mut().find(|(day, _)| *day == record.day) {
                Some((_, blocks)) => blocks.push(record.to_block()),
                None => by_day.push((record.day, vec![record.to_block()])),
            }
        }
        for (day, blocks) in by_day {
            schedule.set_day(day, blocks);
        }
        Ok(schedule)
    }

    /// Fetch the whole household's week, one entry per roster member.
    pub fn get_week_all(&self, week_key: &WeekKey) -> Result<Schedules> {
        let mut schedules = Schedules::new();
        for user in self.list_users()? {
            schedules.insert(user.id, self.get_week(user.id, week_key)?);
        }
        Ok(schedules)
    }

    /// Atomically replace all blocks for one (user, week, day).
    ///
    /// The replacement sequence is validated as a whole before anything is
    /// written; blocks without an id get a fresh one, and every row is
    /// stamped with the calendar date the week and day resolve to.  Returns
    /// the updated week.
    pub fn replace_day(
        &mut self,
        user_id: UserId,
        week_key: &WeekKey,
        day: DayOfWeek,
        blocks: &[TimeBlock],
    ) -> Result<UserSchedule> {
        schedule::validate_day(blocks)?;

        let date = week_key.date_of(day);
        let now = Utc::now();

        let tx = self
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "DELETE FROM schedule_blocks
             WHERE user_id = ?1 AND week_key = ?2 AND day = ?3",
            params![user_id.0, week_key.to_string(), day.as_str()],
        )?;

        for block in blocks {
            let id = block.id.unwrap_or_else(Uuid::new_v4);
            tx.execute(
                "INSERT INTO schedule_blocks
                     (id, user_id, week_key, day, start_time, end_time, label, all_day, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    id.to_string(),
                    user_id.0,
                    week_key.to_string(),
                    day.as_str(),
                    block.start.map(|t| t.format("%H:%M").to_string()),
                    block.end.map(|t| t.format("%H:%M").to_string()),
                    block.label,
                    block.all_day as i32,
                    date.format("%Y-%m-%d").to_string(),
                    now.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()?;

        tracing::debug!(
            user = %user_id,
            week = %week_key,
            day = %day,
            blocks = blocks.len(),
            "replaced day"
        );

        self.get_week(user_id, week_key)
    }

    /// Remove one block, scoped to its owner.  Returns `true` if a row was
    /// actually removed; a missing block is a normal outcome, not an error.
    pub fn delete_block(
        &self,
        user_id: UserId,
        week_key: &WeekKey,
        day: DayOfWeek,
        block_id: Uuid,
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM schedule_blocks
             WHERE id = ?1 AND user_id = ?2 AND week_key = ?3 AND day = ?4",
            params![
                block_id.to_string(),
                user_id.0,
                week_key.to_string(),
                day.as_str()
            ],
        )?;
        Ok(affected > 0)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleRecord> {
    let id_str: String = row.get(0)?;
    let user_id: i64 = row.get(1)?;
    let week_key_str: String = row.get(2)?;
    let day_str: String = row.get(3)?;
    let start_str: Option<String> = row.get(4)?;
    let end_str: Option<String> = row.get(5)?;
    let label: String = row.get(6)?;
    let all_day: bool = row.get::<_, i64>(7)? != 0;
    let date_str: Option<String> = row.get(8)?;
    let created_str: String = row.get(9)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let week_key = WeekKey::parse(&week_key_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let day = DayOfWeek::parse(&day_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let start = start_str
        .map(|s| NaiveTime::parse_from_str(&s, "%H:%M"))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let end = end_str
        .map(|s| NaiveTime::parse_from_str(&s, "%H:%M"))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let date = date_str
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(ScheduleRecord {
        id,
        user_id: UserId(user_id),
        week_key,
        day,
        start,
        end,
        label,
        all_day,
        date,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use foyer_shared::ValidationError;
    use crate::error::StoreError;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn block(start: (u32, u32), end: (u32, u32), label: &str) -> TimeBlock {
        TimeBlock {
            id: None,
            start: Some(time(start.0, start.1)),
            end: Some(time(end.0, end.1)),
            label: label.to_string(),
            all_day: false,
        }
    }

    fn all_day(label: &str) -> TimeBlock {
        TimeBlock {
            id: None,
            start: None,
            end: None,
            label: label.to_string(),
            all_day: true,
        }
    }

    fn week() -> WeekKey {
        WeekKey::parse("2024-W05").unwrap()
    }

    #[test]
    fn replace_then_get_round_trips_sorted() {
        let (_dir, mut db) = test_db();
        let blocks = vec![
            block((13, 0), (18, 0), "Work"),
            all_day("Away"),
            block((8, 0), (12, 0), "Gym"),
        ];

        let schedule = db
            .replace_day(UserId(5), &week(), DayOfWeek::Monday, &blocks)
            .unwrap();

        let monday = schedule.day(DayOfWeek::Monday);
        assert_eq!(monday.len(), 3);
        assert!(monday[0].all_day);
        assert_eq!(monday[1].label, "Gym");
        assert_eq!(monday[2].label, "Work");
        // Ids were assigned on write.
        assert!(monday.iter().all(|b| b.id.is_some()));

        // Read-after-write agrees.
        let again = db.get_week(UserId(5), &week()).unwrap();
        assert_eq!(again.day(DayOfWeek::Monday), monday);
        assert!(again.day(DayOfWeek::Tuesday).is_empty());
    }

    #[test]
    fn second_replace_supersedes_first() {
        let (_dir, mut db) = test_db();
        db.replace_day(
            UserId(5),
            &week(),
            DayOfWeek::Monday,
            &[block((9, 0), (17, 0), "Work")],
        )
        .unwrap();

        let schedule = db
            .replace_day(
                UserId(5),
                &week(),
                DayOfWeek::Monday,
                &[block((8, 0), (12, 0), "Gym"), block((13, 0), (18, 0), "Work")],
            )
            .unwrap();

        let monday = schedule.day(DayOfWeek::Monday);
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].label, "Gym");
        assert_eq!(monday[1].label, "Work");
    }

    #[test]
    fn overlap_fails_and_leaves_state_unchanged() {
        let (_dir, mut db) = test_db();
        db.replace_day(
            UserId(5),
            &week(),
            DayOfWeek::Monday,
            &[block((9, 0), (17, 0), "Work")],
        )
        .unwrap();

        let result = db.replace_day(
            UserId(5),
            &week(),
            DayOfWeek::Monday,
            &[block((9, 0), (10, 0), "a"), block((9, 30), (11, 0), "b")],
        );
        assert!(matches!(
            result,
            Err(StoreError::Validation(
                ValidationError::OverlappingBlocks { .. }
            ))
        ));

        let monday_after = db.get_week(UserId(5), &week()).unwrap();
        assert_eq!(monday_after.day(DayOfWeek::Monday).len(), 1);
        assert_eq!(monday_after.day(DayOfWeek::Monday)[0].label, "Work");
    }

    #[test]
    fn replace_never_touches_other_users_or_days() {
        let (_dir, mut db) = test_db();
        db.replace_day(
            UserId(1),
            &week(),
            DayOfWeek::Monday,
            &[block((9, 0), (10, 0), "Mine")],
        )
        .unwrap();
        db.replace_day(
            UserId(1),
            &week(),
            DayOfWeek::Tuesday,
            &[block((9, 0), (10, 0), "Tue")],
        )
        .unwrap();

        db.replace_day(UserId(2), &week(), DayOfWeek::Monday, &[all_day("Trip")])
            .unwrap();
        db.replace_day(UserId(1), &week(), DayOfWeek::Monday, &[])
            .unwrap();

        assert!(db
            .get_week(UserId(1), &week())
            .unwrap()
            .day(DayOfWeek::Monday)
            .is_empty());
        assert_eq!(
            db.get_week(UserId(1), &week())
                .unwrap()
                .day(DayOfWeek::Tuesday)
                .len(),
            1
        );
        assert_eq!(
            db.get_week(UserId(2), &week())
                .unwrap()
                .day(DayOfWeek::Monday)
                .len(),
            1
        );
    }

    #[test]
    fn weeks_are_isolated_by_key() {
        let (_dir, mut db) = test_db();
        let next_week = week().offset(1);

        db.replace_day(
            UserId(1),
            &week(),
            DayOfWeek::Friday,
            &[block((19, 0), (22, 0), "Dinner")],
        )
        .unwrap();

        assert!(db
            .get_week(UserId(1), &next_week)
            .unwrap()
            .day(DayOfWeek::Friday)
            .is_empty());
    }

    #[test]
    fn delete_block_is_owner_scoped() {
        let (_dir, mut db) = test_db();
        let schedule = db
            .replace_day(
                UserId(1),
                &week(),
                DayOfWeek::Monday,
                &[block((9, 0), (10, 0), "Gym")],
            )
            .unwrap();
        let block_id = schedule.day(DayOfWeek::Monday)[0].id.unwrap();

        // Another member cannot remove it.
        assert!(!db
            .delete_block(UserId(2), &week(), DayOfWeek::Monday, block_id)
            .unwrap());
        assert_eq!(
            db.get_week(UserId(1), &week())
                .unwrap()
                .day(DayOfWeek::Monday)
                .len(),
            1
        );

        // The owner can, and a second attempt reports nothing removed.
        assert!(db
            .delete_block(UserId(1), &week(), DayOfWeek::Monday, block_id)
            .unwrap());
        assert!(!db
            .delete_block(UserId(1), &week(), DayOfWeek::Monday, block_id)
            .unwrap());
    }

    #[test]
    fn date_is_stamped_from_week_and_day() {
        let (_dir, mut db) = test_db();
        db.replace_day(
            UserId(1),
            &week(),
            DayOfWeek::Wednesday,
            &[block((9, 0), (10, 0), "Vet")],
        )
        .unwrap();

        let date: String = db
            .conn()
            .query_row(
                "SELECT date FROM schedule_blocks WHERE user_id = 1",
                [],
                |row| row.get(0),
            )
            .unwrap();
        // 2024-W05 starts Monday 2024-01-29.
        assert_eq!(date, "2024-01-31");
    }

    #[test]
    fn get_week_all_covers_the_roster() {
        let (_dir, mut db) = test_db();
        for (id, name) in [(1, "Alice"), (2, "Bo")] {
            db.upsert_user(&User {
                id: UserId(id),
                display_name: name.to_string(),
                color: "#81b29a".to_string(),
                initial: name.chars().next().unwrap().to_string(),
                created_at: Utc::now(),
            })
            .unwrap();
        }
        db.replace_day(UserId(2), &week(), DayOfWeek::Saturday, &[all_day("Hike")])
            .unwrap();

        let schedules = db.get_week_all(&week()).unwrap();
        assert_eq!(schedules.len(), 2);
        assert!(schedules[&UserId(1)].day(DayOfWeek::Saturday).is_empty());
        assert_eq!(schedules[&UserId(2)].day(DayOfWeek::Saturday).len(), 1);
    }
}
