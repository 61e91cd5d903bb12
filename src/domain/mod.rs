pub mod group;
pub mod user;
pub mod word;

pub use group::{Group, GroupSummary, NewGroup};
pub use user::{User, UserStats, VocabularyStats};
pub use word::{DictionaryEntry, Example, Level, Meaning, NewWord, Word, WordProgress};
