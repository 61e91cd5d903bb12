//! Eligibility rules deciding which words of a group surface in a session.

use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::domain::{Level, Word, WordProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// Read-only review of low-mastery words
    Slideshow,
    /// Typed answers that drive level transitions
    Input,
}

/// Session request, resolved once from the query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionContext {
    /// Every word in the group
    All,
    /// Exactly the words at these levels
    Levels(BTreeSet<Level>),
    Slideshow,
    /// First input session of the day: words whose review offset has elapsed
    InputFirstSession,
    /// Later input sessions the same day: low-mastery words only
    InputRepeatSession,
}

impl SessionContext {
    /// An explicit, non-empty level set wins over the mode.
    pub fn resolve(
        mode: Option<StudyMode>,
        is_first_session: bool,
        levels: BTreeSet<Level>,
    ) -> Self {
        if !levels.is_empty() {
            return Self::Levels(levels);
        }
        match mode {
            Some(StudyMode::Slideshow) => Self::Slideshow,
            Some(StudyMode::Input) if is_first_session => Self::InputFirstSession,
            Some(StudyMode::Input) => Self::InputRepeatSession,
            None => Self::All,
        }
    }

    /// Levels the store can filter on before the date rules run
    pub fn level_filter(&self) -> Option<Vec<Level>> {
        match self {
            Self::Levels(levels) => Some(levels.iter().copied().collect()),
            Self::Slideshow | Self::InputRepeatSession => Some(Level::low_mastery().to_vec()),
            Self::All | Self::InputFirstSession => None,
        }
    }
}

/// Parse `levels` query values. Each value may itself be a comma list
/// (`levels=1&levels=3` and `levels=1,3` are equivalent).
pub fn parse_levels(raw: &[String]) -> Result<BTreeSet<Level>, String> {
    let mut levels = BTreeSet::new();
    for part in raw.iter().flat_map(|v| v.split(',')) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let value: u8 = part
            .parse()
            .map_err(|_| format!("Invalid level '{}': expected an integer from 1 to 5", part))?;
        levels.insert(Level::try_from(value)?);
    }
    Ok(levels)
}

/// Date on which the word becomes due again; `None` if it was never studied
pub fn next_due_date(progress: &WordProgress) -> Option<NaiveDate> {
    let last = progress.last_studied_date?;
    let offset = progress.level.review_offset_days() as u64;
    Some(last.checked_add_days(Days::new(offset)).unwrap_or(NaiveDate::MAX))
}

pub fn is_due(progress: &WordProgress, today: NaiveDate) -> bool {
    next_due_date(progress).is_none_or(|due| due <= today)
}

/// Filter a group's words down to the ones eligible for the session and
/// order them by urgency: lowest level first, then earliest due date
/// (never-studied first), then insertion order.
pub fn select_eligible(words: Vec<Word>, ctx: &SessionContext, today: NaiveDate) -> Vec<Word> {
    let mut selected: Vec<Word> = words
        .into_iter()
        .filter(|word| match ctx {
            SessionContext::All => true,
            SessionContext::Levels(levels) => levels.contains(&word.level),
            SessionContext::Slideshow | SessionContext::InputRepeatSession => {
                Level::low_mastery().contains(&word.level)
            }
            SessionContext::InputFirstSession => is_due(&word.progress(), today),
        })
        .collect();

    selected.sort_by_key(|word| (word.level, next_due_date(&word.progress()), word.id));
    selected
}
