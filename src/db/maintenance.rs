//! Daily reset sweep.
//!
//! Runs once per local calendar day. Words that were not studied on the day
//! that just ended and are past their last study date fall back to level 1,
//! then every `studied_today` flag is cleared so the new day can claim a
//! fresh transition per word.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::format_date;

/// Outcome of one sweep invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub words_reclaimed: usize,
    pub flags_cleared: usize,
    /// The sweep for this date had already completed; nothing was touched
    pub already_ran: bool,
}

pub fn has_run_for(conn: &Connection, date: NaiveDate) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM maintenance_runs WHERE run_date = ?1",
            params![format_date(date)],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Send stale words above level 1 back to level 1
pub fn reclaim_stale_words(conn: &Connection, today: NaiveDate) -> Result<usize> {
    conn.execute(
        r#"
        UPDATE vocabulary_words
        SET level = 1, learned = 0
        WHERE studied_today = 0
          AND level > 1
          AND (last_studied_date IS NULL OR last_studied_date < ?1)
        "#,
        params![format_date(today)],
    )
}

pub fn clear_studied_today(conn: &Connection) -> Result<usize> {
    conn.execute(
        "UPDATE vocabulary_words SET studied_today = 0 WHERE studied_today = 1",
        [],
    )
}

fn record_run(
    conn: &Connection,
    date: NaiveDate,
    now: DateTime<Utc>,
    report: &SweepReport,
) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO maintenance_runs (run_date, ran_at, words_reclaimed, flags_cleared)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            format_date(date),
            now.to_rfc3339(),
            report.words_reclaimed as i64,
            report.flags_cleared as i64,
        ],
    )?;
    Ok(())
}

/// Run the sweep for `today` in one transaction. A second call for the same
/// date is a no-op.
pub fn run_daily_reset(
    conn: &mut Connection,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<SweepReport> {
    let tx = conn.transaction()?;

    if has_run_for(&tx, today)? {
        return Ok(SweepReport {
            already_ran: true,
            ..SweepReport::default()
        });
    }

    // Reclaim first: words studied yesterday still carry their flag and keep their level
    let words_reclaimed = reclaim_stale_words(&tx, today)?;
    let flags_cleared = clear_studied_today(&tx)?;
    let report = SweepReport {
        words_reclaimed,
        flags_cleared,
        already_ran: false,
    };
    record_run(&tx, today, now, &report)?;

    tx.commit()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::words::{get_word_by_id, get_words_for_group};
    use crate::testing::TestEnv;

    #[test]
    fn test_sweep_reclaims_stale_and_clears_flags() {
        let mut env = TestEnv::new().unwrap();
        let today = env.today();
        let yesterday = today.pred_opt().unwrap();
        let last_week = today - chrono::Duration::days(7);
        let group = env.seed_group("G").unwrap();

        // Studied yesterday, flag still set: keeps its level
        let studied = env.seed_word(group, "studied", 3, Some(yesterday)).unwrap();
        env.set_studied_today(studied, true).unwrap();
        // Not studied for a week: reclaimed
        let stale = env.seed_word(group, "stale", 5, Some(last_week)).unwrap();
        // Never studied at level 1: untouched
        let fresh = env.seed_word(group, "fresh", 1, None).unwrap();

        let report = run_daily_reset(&mut env.conn, today, Utc::now()).unwrap();
        assert_eq!(report.words_reclaimed, 1);
        assert_eq!(report.flags_cleared, 1);
        assert!(!report.already_ran);

        let studied = get_word_by_id(&env.conn, studied).unwrap().unwrap();
        assert_eq!(studied.level.value(), 3);
        let stale = get_word_by_id(&env.conn, stale).unwrap().unwrap();
        assert_eq!(stale.level.value(), 1);
        assert!(!stale.learned);
        let fresh = get_word_by_id(&env.conn, fresh).unwrap().unwrap();
        assert_eq!(fresh.level.value(), 1);

        let words = get_words_for_group(&env.conn, group, None).unwrap();
        assert!(words.iter().all(|w| !w.studied_today));
    }

    #[test]
    fn test_sweep_is_idempotent_per_day() {
        let mut env = TestEnv::new().unwrap();
        let today = env.today();
        let group = env.seed_group("G").unwrap();
        env.seed_word(group, "stale", 4, None).unwrap();

        let first = run_daily_reset(&mut env.conn, today, Utc::now()).unwrap();
        assert_eq!(first.words_reclaimed, 1);
        assert!(has_run_for(&env.conn, today).unwrap());

        // A word studied after the sweep must not be touched by a repeat run
        let later = env.seed_word(group, "later", 2, Some(today)).unwrap();
        env.set_studied_today(later, true).unwrap();

        let second = run_daily_reset(&mut env.conn, today, Utc::now()).unwrap();
        assert!(second.already_ran);
        assert_eq!(second.words_reclaimed, 0);

        let later = get_word_by_id(&env.conn, later).unwrap().unwrap();
        assert_eq!(later.level.value(), 2);
        assert!(later.studied_today);
    }

    #[test]
    fn test_sweep_scenario_stale_level_three() {
        // level 3, last studied yesterday, flag already cleared
        let mut env = TestEnv::new().unwrap();
        let today = env.today();
        let group = env.seed_group("G").unwrap();
        let id = env
            .seed_word(group, "stale", 3, today.pred_opt())
            .unwrap();

        let report = run_daily_reset(&mut env.conn, today, Utc::now()).unwrap();
        assert_eq!(report.words_reclaimed, 1);

        let word = get_word_by_id(&env.conn, id).unwrap().unwrap();
        assert_eq!(word.level.value(), 1);
        assert!(!word.studied_today);
    }
}
