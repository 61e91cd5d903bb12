//! Study flows: listing a session's words, recording answers and pings.
//!
//! Each mutation runs in its own transaction so a failure leaves the word
//! exactly as it was and the client can retry.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

use crate::db;
use crate::domain::Word;
use crate::error::{AppError, AppResult};
use crate::srs::{self, SessionContext};

/// Words of a group eligible for the session, most urgent first
pub fn list_eligible(
    conn: &Connection,
    group_id: i64,
    ctx: &SessionContext,
    today: NaiveDate,
) -> AppResult<Vec<Word>> {
    let levels = ctx.level_filter();
    let words = db::get_words_for_group(conn, group_id, levels.as_deref())?;
    Ok(srs::select_eligible(words, ctx, today))
}

/// Apply a typed answer and return the updated word
pub fn record_answer(
    conn: &mut Connection,
    word_id: i64,
    is_correct: bool,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> AppResult<Word> {
    let tx = conn.transaction()?;

    let word = db::get_word_by_id(&tx, word_id)?.ok_or(AppError::NotFound("Word"))?;
    let transition = srs::apply_answer(word.progress(), is_correct, today);

    let applied = transition.change.is_level_affecting()
        && db::apply_level_change(&tx, word_id, &transition.after, now)?;

    if applied {
        tracing::debug!(
            "Word {} answered {}: {:?}",
            word_id,
            if is_correct { "correctly" } else { "wrongly" },
            transition.change
        );
        if transition.newly_learned() {
            if let Some(user_id) = db::get_word_owner(&tx, word_id)? {
                db::record_word_learned(&tx, user_id, today)?;
            }
            tracing::info!("Word {} reached level {}", word_id, transition.after.level);
        }
    } else {
        // Either the day was already claimed or a concurrent answer won the CAS
        db::stamp_studied(&tx, word_id, true, today, now)?;
        tracing::debug!(
            "Word {} already studied today, level stays {}",
            word_id,
            word.level
        );
    }

    let updated = db::get_word_by_id(&tx, word_id)?.ok_or(AppError::NotFound("Word"))?;
    tx.commit()?;
    Ok(updated)
}

/// Passive slideshow ping: refresh the timestamps without touching the level
pub fn mark_studied(
    conn: &mut Connection,
    word_id: i64,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> AppResult<Word> {
    let tx = conn.transaction()?;

    let word = db::get_word_by_id(&tx, word_id)?.ok_or(AppError::NotFound("Word"))?;
    let after = srs::apply_ping(word.progress(), today);
    db::stamp_studied(&tx, word_id, after.studied_today, today, now)?;

    if let Some(user_id) = db::get_word_owner(&tx, word_id)? {
        db::record_word_studied(&tx, user_id, today)?;
    }

    let updated = db::get_word_by_id(&tx, word_id)?.ok_or(AppError::NotFound("Word"))?;
    tx.commit()?;
    Ok(updated)
}
