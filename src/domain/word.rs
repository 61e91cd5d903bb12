use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mastery level of a word, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// One level up, saturating at the maximum
    pub fn promoted(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    /// Days that must pass after the last study before the word is due again
    pub fn review_offset_days(self) -> i64 {
        match self.0 {
            1 => 1,
            2 => 2,
            3 => 3,
            4 => 4,
            _ => 7,
        }
    }

    /// Levels shown in slideshow mode and in repeat input sessions
    pub fn low_mastery() -> [Level; 2] {
        [Level(1), Level(2)]
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or_else(|| format!("level must be between 1 and 5, got {}", value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl ToSql for Level {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(i64::from(self.0)))
    }
}

impl FromSql for Level {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_i64()?;
        u8::try_from(raw)
            .ok()
            .and_then(Level::new)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub en: String,
    pub vi: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub meaning: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}

/// The part of a word the leveling engine reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WordProgress {
    pub level: Level,
    pub learned: bool,
    pub studied_today: bool,
    pub last_studied_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub group_id: i64,
    pub word: String,
    pub ipa: String,
    pub part_of_speech: String,
    pub definition: String,
    pub meanings: Vec<Meaning>,
    pub level: Level,
    pub learned: bool,
    pub studied_today: bool,
    pub last_studied_date: Option<NaiveDate>,
    pub last_studied: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Word {
    pub fn progress(&self) -> WordProgress {
        WordProgress {
            level: self.level,
            learned: self.learned,
            studied_today: self.studied_today,
            last_studied_date: self.last_studied_date,
        }
    }
}

/// Payload for creating a single word
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWord {
    pub group_id: i64,
    pub word: String,
    #[serde(default)]
    pub ipa: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

/// One entry of a dictionary import (`{ word, IPA, part_of_speech, definition, meanings }`)
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(rename = "IPA", alias = "ipa", default)]
    pub ipa: String,
    #[serde(alias = "partOfSpeech", default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

impl DictionaryEntry {
    pub fn into_new_word(self, group_id: i64) -> NewWord {
        NewWord {
            group_id,
            word: self.word,
            ipa: self.ipa,
            part_of_speech: self.part_of_speech,
            definition: self.definition,
            meanings: self.meanings,
        }
    }
}
