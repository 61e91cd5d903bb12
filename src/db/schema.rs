use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Foreign keys are per-connection in SQLite; group deletion relies on the cascade
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    // Create tables with COMPLETE schema for new databases
    // Migrations below handle upgrades for existing databases
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            days_studied INTEGER NOT NULL DEFAULT 0,
            last_study_day TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vocabulary_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS vocabulary_words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id INTEGER NOT NULL,
            word TEXT NOT NULL,
            ipa TEXT NOT NULL DEFAULT '',
            part_of_speech TEXT NOT NULL DEFAULT '',
            definition TEXT NOT NULL DEFAULT '',
            -- JSON array of { meaning, examples: [{ en, vi }] }
            meanings TEXT NOT NULL DEFAULT '[]',
            level INTEGER NOT NULL DEFAULT 1 CHECK (level BETWEEN 1 AND 5),
            learned INTEGER NOT NULL DEFAULT 0,
            studied_today INTEGER NOT NULL DEFAULT 0,
            last_studied_date TEXT,
            last_studied TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (group_id) REFERENCES vocabulary_groups(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS user_stats (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            words_studied INTEGER NOT NULL DEFAULT 0,
            words_learned INTEGER NOT NULL DEFAULT 0,
            UNIQUE (user_id, date),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        -- One row per local calendar day the reset sweep has completed
        CREATE TABLE IF NOT EXISTS maintenance_runs (
            run_date TEXT PRIMARY KEY,
            ran_at TEXT NOT NULL,
            words_reclaimed INTEGER NOT NULL DEFAULT 0,
            flags_cleared INTEGER NOT NULL DEFAULT 0
        );

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_groups_user_id ON vocabulary_groups(user_id);
        CREATE INDEX IF NOT EXISTS idx_words_group_id ON vocabulary_words(group_id);
        CREATE INDEX IF NOT EXISTS idx_words_group_level ON vocabulary_words(group_id, level);
        CREATE INDEX IF NOT EXISTS idx_words_studied_today ON vocabulary_words(studied_today);
        CREATE INDEX IF NOT EXISTS idx_user_stats_user_date ON user_stats(user_id, date);
        "#,
    )?;

    // ============================================================
    // MIGRATIONS FOR EXISTING DATABASES
    // These are no-ops for new databases (columns already exist)
    // ============================================================

    // Migration: streak tracking moved from client-side bookkeeping to the server
    add_column_if_missing(conn, "users", "last_study_day", "TEXT")?;

    // Migration: passive pings keep their own timestamp apart from the level date
    add_column_if_missing(conn, "vocabulary_words", "last_studied", "TEXT")?;

    Ok(())
}

/// Check if a column exists in a table
pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn.prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    column_def: &str,
) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}
