//! Word creation, single and batch (dictionary import).

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::db;
use crate::domain::{DictionaryEntry, NewWord, Word};
use crate::error::{AppError, AppResult};

/// Result of a batch import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    /// Entries received, including the skipped ones
    pub total: usize,
    pub words: Vec<Word>,
}

/// Key two spellings of the same word share: NFC, trimmed, lowercased
pub fn word_key(word: &str) -> String {
    word.trim().nfc().collect::<String>().to_lowercase()
}

pub fn create_word(conn: &Connection, word: &NewWord, now: DateTime<Utc>) -> AppResult<Word> {
    if word.word.trim().is_empty() {
        return Err(AppError::validation("Word text must not be empty"));
    }
    if db::get_group_by_id(conn, word.group_id)?.is_none() {
        return Err(AppError::NotFound("Group"));
    }

    let id = db::insert_word(conn, word, now)?;
    db::get_word_by_id(conn, id)?.ok_or(AppError::NotFound("Word"))
}

/// Insert dictionary entries into a group in one transaction. Malformed or
/// blank entries are skipped, as are words the group already has.
pub fn import_words(
    conn: &mut Connection,
    group_id: i64,
    entries: Vec<Value>,
    now: DateTime<Utc>,
) -> AppResult<ImportSummary> {
    let tx = conn.transaction()?;

    if db::get_group_by_id(&tx, group_id)?.is_none() {
        return Err(AppError::NotFound("Group"));
    }

    let mut seen: HashSet<String> = db::get_group_word_texts(&tx, group_id)?
        .iter()
        .map(|w| word_key(w))
        .collect();

    let total = entries.len();
    let mut words = Vec::new();
    for (index, raw) in entries.into_iter().enumerate() {
        let entry: DictionaryEntry = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed entry {} for group {}: {}",
                    index,
                    group_id,
                    e
                );
                continue;
            }
        };
        let key = word_key(&entry.word);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        let id = db::insert_word(&tx, &entry.into_new_word(group_id), now)?;
        if let Some(word) = db::get_word_by_id(&tx, id)? {
            words.push(word);
        }
    }

    tx.commit()?;
    tracing::info!(
        "Imported {} of {} words into group {}",
        words.len(),
        total,
        group_id
    );

    Ok(ImportSummary {
        added: words.len(),
        total,
        words,
    })
}
