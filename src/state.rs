//! Application state shared by all handlers.

use crate::clock::Clock;
use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,

    /// Source of "today" for leveling, streaks and the daily reset
    pub clock: Clock,
}

impl AppState {
    pub fn new(db: DbPool, clock: Clock) -> Self {
        Self { db, clock }
    }
}
