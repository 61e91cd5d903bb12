//! Level transitions for input-mode answers and slideshow pings.
//!
//! A word moves at most once per calendar day. The first answer of the day
//! promotes it one level on success and sends it back to level 1 on failure;
//! later answers that day only update the study bookkeeping.

use chrono::NaiveDate;

use crate::domain::{Level, WordProgress};

/// What an answer did to the word's level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Promoted { from: Level, to: Level },
    Regressed { from: Level },
    /// A level-affecting answer was already recorded today
    AlreadyStudiedToday,
}

impl LevelChange {
    pub fn is_level_affecting(&self) -> bool {
        !matches!(self, Self::AlreadyStudiedToday)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub before: WordProgress,
    pub after: WordProgress,
    pub change: LevelChange,
}

impl Transition {
    /// True when this answer is the one that reached full mastery
    pub fn newly_learned(&self) -> bool {
        !self.before.learned && self.after.learned
    }
}

/// Apply a typed answer to a word.
pub fn apply_answer(before: WordProgress, is_correct: bool, today: NaiveDate) -> Transition {
    if before.studied_today {
        return bookkeeping_only(before, today);
    }

    let (level, learned, change) = if is_correct {
        let to = before.level.promoted();
        (
            to,
            before.learned || to.is_max(),
            LevelChange::Promoted {
                from: before.level,
                to,
            },
        )
    } else {
        (
            Level::MIN,
            false,
            LevelChange::Regressed { from: before.level },
        )
    };

    Transition {
        before,
        after: WordProgress {
            level,
            learned,
            studied_today: true,
            last_studied_date: Some(today),
        },
        change,
    }
}

/// Stamp the study bookkeeping without touching level or learned.
pub fn bookkeeping_only(before: WordProgress, today: NaiveDate) -> Transition {
    Transition {
        before,
        after: WordProgress {
            studied_today: true,
            last_studied_date: Some(today),
            ..before
        },
        change: LevelChange::AlreadyStudiedToday,
    }
}

/// Passive "studied" ping from slideshow mode.
///
/// Never changes level and never claims the day's level transition. On the
/// first ping of a new day the stale flag from a previous day is dropped.
pub fn apply_ping(before: WordProgress, today: NaiveDate) -> WordProgress {
    if before.last_studied_date == Some(today) {
        return before;
    }
    WordProgress {
        studied_today: false,
        last_studied_date: Some(today),
        ..before
    }
}
