//! Test utilities for database setup.
//!
//! Provides helpers that reuse the authoritative schema initialization,
//! eliminating schema duplication in test code.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::clock::Clock;
use crate::db;
use crate::state::AppState;

const DB_FILE: &str = "vocab.db";

/// Instant every test environment is pinned to (10:00 at UTC+7)
pub const TEST_NOW: &str = "2026-10-19T10:00:00+07:00";

/// Test database in a temporary directory with the full schema and a seeded
/// demo user. The clock is pinned so "today" is stable across a test.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
    pub clock: Clock,
    /// Id of the seeded demo user
    pub user_id: i64,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let instant = DateTime::parse_from_rfc3339(TEST_NOW)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let clock = Clock::Fixed(instant);

        let conn = Connection::open(temp.path().join(DB_FILE))?;
        db::run_migrations(&conn)?;
        let user_id = db::seed_demo_user(&conn, clock.now_utc())?;

        Ok(Self {
            temp,
            conn,
            clock,
            user_id,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Application state over a second connection to the same database file
    pub fn app_state(&self, clock: Clock) -> rusqlite::Result<AppState> {
        let conn = Connection::open(self.path().join(DB_FILE))?;
        db::run_migrations(&conn)?;
        Ok(AppState::new(Arc::new(Mutex::new(conn)), clock))
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    pub fn seed_group(&self, name: &str) -> rusqlite::Result<i64> {
        db::insert_group(
            &self.conn,
            &crate::domain::NewGroup {
                name: name.to_string(),
                user_id: self.user_id,
            },
            self.now(),
        )
    }

    /// Insert a word directly at a given level; level 5 words are learned
    pub fn seed_word(
        &self,
        group_id: i64,
        text: &str,
        level: u8,
        last_studied_date: Option<NaiveDate>,
    ) -> rusqlite::Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO vocabulary_words (group_id, word, level, learned, last_studied_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                group_id,
                text,
                level,
                level == 5,
                last_studied_date.map(db::format_date),
                self.now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn set_studied_today(&self, word_id: i64, studied_today: bool) -> rusqlite::Result<()> {
        self.conn.execute(
            "UPDATE vocabulary_words SET studied_today = ?1 WHERE id = ?2",
            params![studied_today, word_id],
        )?;
        Ok(())
    }
}
