//! User accounts and the study-day streak

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::User;

use super::{format_date, parse_date, parse_timestamp};

pub fn insert_user(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
        params![username, now.to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, days_studied, last_study_day, created_at FROM users WHERE id = ?1",
        params![id],
        |row| row_to_user(row),
    )
    .optional()
}

pub fn get_user_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    conn.query_row(
        "SELECT id, username, days_studied, last_study_day, created_at FROM users WHERE username = ?1",
        params![username],
        |row| row_to_user(row),
    )
    .optional()
}

/// Fetch a user by name, creating it on first use
pub fn ensure_user(conn: &Connection, username: &str, now: DateTime<Utc>) -> Result<User> {
    if let Some(user) = get_user_by_username(conn, username)? {
        return Ok(user);
    }
    let id = insert_user(conn, username, now)?;
    tracing::info!("Created user '{}' (id {})", username, id);
    get_user_by_id(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Count `today` towards the user's streak. Only the first call of a
/// calendar day increments; returns whether it did.
pub fn record_study_day(conn: &Connection, user_id: i64, today: NaiveDate) -> Result<bool> {
    let today_str = format_date(today);
    let updated = conn.execute(
        r#"
        UPDATE users
        SET days_studied = days_studied + 1, last_study_day = ?1
        WHERE id = ?2 AND (last_study_day IS NULL OR last_study_day <> ?1)
        "#,
        params![today_str, user_id],
    )?;

    if updated > 0 {
        // Open the day's stats row so the history shows days with no answers yet
        conn.execute(
            "INSERT OR IGNORE INTO user_stats (user_id, date) VALUES (?1, ?2)",
            params![user_id, today_str],
        )?;
    }
    Ok(updated > 0)
}

fn row_to_user(row: &rusqlite::Row) -> Result<User> {
    let last_study_day_str: Option<String> = row.get(3)?;
    let created_at_str: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        days_studied: row.get(2)?,
        last_study_day: last_study_day_str
            .map(|s| parse_date(3, &s))
            .transpose()?,
        created_at: parse_timestamp(4, &created_at_str)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestEnv;

    #[test]
    fn test_ensure_user_creates_once() {
        let env = TestEnv::new().unwrap();
        let a = ensure_user(&env.conn, "alice", env.now()).unwrap();
        let later = env.now() + chrono::Duration::hours(1);
        let b = ensure_user(&env.conn, "alice", later).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.created_at, env.now());
        assert_eq!(a.days_studied, 0);
        assert!(a.last_study_day.is_none());
    }

    #[test]
    fn test_record_study_day_once_per_day() {
        let env = TestEnv::new().unwrap();
        let today = env.today();

        assert!(record_study_day(&env.conn, env.user_id, today).unwrap());
        assert!(!record_study_day(&env.conn, env.user_id, today).unwrap());

        let user = get_user_by_id(&env.conn, env.user_id).unwrap().unwrap();
        assert_eq!(user.days_studied, 1);
        assert_eq!(user.last_study_day, Some(today));

        let tomorrow = today.succ_opt().unwrap();
        assert!(record_study_day(&env.conn, env.user_id, tomorrow).unwrap());
        let user = get_user_by_id(&env.conn, env.user_id).unwrap().unwrap();
        assert_eq!(user.days_studied, 2);
    }

    #[test]
    fn test_record_study_day_unknown_user() {
        let env = TestEnv::new().unwrap();
        assert!(!record_study_day(&env.conn, 999, env.today()).unwrap());
    }
}
