//! Streak and statistics handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Deserialize;

use crate::config::{STATS_HISTORY_DAYS, STATS_HISTORY_MAX_DAYS};
use crate::db;
use crate::domain::{User, UserStats, VocabularyStats};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::IdPath;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<u32>,
}

/// Count today towards the user's study streak (once per day).
///
/// PUT /api/users/{id}/days-studied
pub async fn record_study_day(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
) -> AppResult<Json<User>> {
    let today = state.clock.today();

    let conn = db::try_lock(&state.db)?;
    if db::record_study_day(&conn, user_id, today)? {
        tracing::debug!("User {} studied on {}", user_id, today);
    }
    let user = db::get_user_by_id(&conn, user_id)?.ok_or(AppError::NotFound("User"))?;
    Ok(Json(user))
}

/// GET /api/stats/{userId}
pub async fn vocabulary_stats(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
) -> AppResult<Json<VocabularyStats>> {
    let conn = db::try_lock(&state.db)?;
    Ok(Json(db::get_vocabulary_stats(&conn, user_id)?))
}

/// GET /api/stats/{userId}/history?days=N
pub async fn stats_history(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
    WithRejection(Query(query), _): WithRejection<Query<HistoryQuery>, AppError>,
) -> AppResult<Json<Vec<UserStats>>> {
    let days = query.days.unwrap_or(STATS_HISTORY_DAYS);
    if !(1..=STATS_HISTORY_MAX_DAYS).contains(&days) {
        return Err(AppError::validation(format!(
            "days must be between 1 and {}",
            STATS_HISTORY_MAX_DAYS
        )));
    }

    let conn = db::try_lock(&state.db)?;
    Ok(Json(db::get_stats_history(&conn, user_id, days)?))
}
