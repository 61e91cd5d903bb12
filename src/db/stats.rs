//! Daily study statistics

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{UserStats, VocabularyStats};

use super::{format_date, parse_date};

/// Count one studied word in the user's rollup for `date`
pub fn record_word_studied(conn: &Connection, user_id: i64, date: NaiveDate) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO user_stats (user_id, date, words_studied)
        VALUES (?1, ?2, 1)
        ON CONFLICT(user_id, date) DO UPDATE SET words_studied = words_studied + 1
        "#,
        params![user_id, format_date(date)],
    )?;
    Ok(())
}

/// Count one newly learned word in the user's rollup for `date`
pub fn record_word_learned(conn: &Connection, user_id: i64, date: NaiveDate) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO user_stats (user_id, date, words_learned)
        VALUES (?1, ?2, 1)
        ON CONFLICT(user_id, date) DO UPDATE SET words_learned = words_learned + 1
        "#,
        params![user_id, format_date(date)],
    )?;
    Ok(())
}

pub fn get_vocabulary_stats(conn: &Connection, user_id: i64) -> Result<VocabularyStats> {
    let (total_groups, total_words, learned_words): (i64, i64, i64) = conn.query_row(
        r#"
        SELECT
          (SELECT COUNT(*) FROM vocabulary_groups WHERE user_id = ?1),
          COUNT(w.id),
          COALESCE(SUM(w.learned), 0)
        FROM vocabulary_words w
        JOIN vocabulary_groups g ON g.id = w.group_id
        WHERE g.user_id = ?1
        "#,
        params![user_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let days_studied: i64 = conn
        .query_row(
            "SELECT days_studied FROM users WHERE id = ?1",
            params![user_id],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);

    Ok(VocabularyStats {
        total_groups,
        total_words,
        learned_words,
        days_studied,
    })
}

/// Most recent `limit` daily rollups, newest first
pub fn get_stats_history(conn: &Connection, user_id: i64, limit: u32) -> Result<Vec<UserStats>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT user_id, date, words_studied, words_learned
        FROM user_stats
        WHERE user_id = ?1
        ORDER BY date DESC
        LIMIT ?2
        "#,
    )?;

    let rows = stmt
        .query_map(params![user_id, limit], |row| {
            let date_str: String = row.get(1)?;
            Ok(UserStats {
                user_id: row.get(0)?,
                date: parse_date(1, &date_str)?,
                words_studied: row.get(2)?,
                words_learned: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(rows)
}
