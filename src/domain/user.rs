use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub days_studied: i64,
    /// Calendar day the streak counter was last bumped
    pub last_study_day: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Daily rollup of study activity for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: i64,
    pub date: NaiveDate,
    pub words_studied: i64,
    pub words_learned: i64,
}

/// Totals shown on the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyStats {
    pub total_groups: i64,
    pub total_words: i64,
    pub learned_words: i64,
    pub days_studied: i64,
}
