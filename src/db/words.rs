//! Word CRUD and progress updates

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::domain::{Level, Meaning, NewWord, Word, WordProgress};

use super::{format_date, parse_date, parse_timestamp};

const WORD_COLUMNS: &str = "id, group_id, word, ipa, part_of_speech, definition, meanings, level, \
     learned, studied_today, last_studied_date, last_studied, created_at";

pub fn insert_word(conn: &Connection, word: &NewWord, now: DateTime<Utc>) -> Result<i64> {
    let meanings = serde_json::to_string(&word.meanings)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

    conn.execute(
        r#"
        INSERT INTO vocabulary_words (group_id, word, ipa, part_of_speech, definition, meanings, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            word.group_id,
            word.word.trim(),
            word.ipa,
            word.part_of_speech,
            word.definition,
            meanings,
            now.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_word_by_id(conn: &Connection, id: i64) -> Result<Option<Word>> {
    conn.query_row(
        &format!("SELECT {} FROM vocabulary_words WHERE id = ?1", WORD_COLUMNS),
        params![id],
        row_to_word,
    )
    .optional()
}

/// Words of a group in insertion order, optionally restricted to some levels.
pub fn get_words_for_group(
    conn: &Connection,
    group_id: i64,
    levels: Option<&[Level]>,
) -> Result<Vec<Word>> {
    let level_clause = match levels {
        Some([]) => return Ok(vec![]),
        Some(levels) => {
            let level_list = levels
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join(",");
            format!("AND level IN ({})", level_list)
        }
        None => String::new(),
    };

    let query = format!(
        "SELECT {} FROM vocabulary_words WHERE group_id = ?1 {} ORDER BY id ASC",
        WORD_COLUMNS, level_clause
    );
    let mut stmt = conn.prepare(&query)?;
    let words = stmt
        .query_map(params![group_id], row_to_word)?
        .collect::<Result<Vec<_>>>()?;
    Ok(words)
}

/// The word texts already present in a group
pub fn get_group_word_texts(conn: &Connection, group_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT word FROM vocabulary_words WHERE group_id = ?1")?;
    let words = stmt
        .query_map(params![group_id], |row| row.get(0))?
        .collect::<Result<Vec<String>>>()?;
    Ok(words)
}

/// User owning the group that contains the word
pub fn get_word_owner(conn: &Connection, word_id: i64) -> Result<Option<i64>> {
    conn.query_row(
        r#"
        SELECT g.user_id
        FROM vocabulary_words w
        JOIN vocabulary_groups g ON g.id = w.group_id
        WHERE w.id = ?1
        "#,
        params![word_id],
        |row| row.get(0),
    )
    .optional()
}

/// Write a level transition. Only succeeds while the word has not been
/// studied today; returns false when another answer claimed the day first.
pub fn apply_level_change(
    conn: &Connection,
    id: i64,
    after: &WordProgress,
    now: DateTime<Utc>,
) -> Result<bool> {
    let updated = conn.execute(
        r#"
        UPDATE vocabulary_words
        SET level = ?1, learned = ?2, studied_today = 1, last_studied_date = ?3, last_studied = ?4
        WHERE id = ?5 AND studied_today = 0
        "#,
        params![
            after.level,
            after.learned,
            after.last_studied_date.map(format_date),
            now.to_rfc3339(),
            id,
        ],
    )?;
    Ok(updated == 1)
}

/// Record a study interaction that does not change level or learned
pub fn stamp_studied(
    conn: &Connection,
    id: i64,
    studied_today: bool,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        r#"
        UPDATE vocabulary_words
        SET studied_today = ?1, last_studied_date = ?2, last_studied = ?3
        WHERE id = ?4
        "#,
        params![studied_today, format_date(today), now.to_rfc3339(), id],
    )?;
    Ok(())
}

pub(crate) fn row_to_word(row: &rusqlite::Row) -> Result<Word> {
    let meanings_str: String = row.get(6)?;
    let last_studied_date_str: Option<String> = row.get(10)?;
    let last_studied_str: Option<String> = row.get(11)?;
    let created_at_str: String = row.get(12)?;

    let meanings: Vec<Meaning> = serde_json::from_str(&meanings_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Word {
        id: row.get(0)?,
        group_id: row.get(1)?,
        word: row.get(2)?,
        ipa: row.get(3)?,
        part_of_speech: row.get(4)?,
        definition: row.get(5)?,
        meanings,
        level: row.get(7)?,
        learned: row.get(8)?,
        studied_today: row.get(9)?,
        last_studied_date: last_studied_date_str
            .map(|s| parse_date(10, &s))
            .transpose()?,
        last_studied: last_studied_str
            .map(|s| parse_timestamp(11, &s))
            .transpose()?,
        created_at: parse_timestamp(12, &created_at_str)?,
    })
}
