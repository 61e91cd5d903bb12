use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::Value;

use crate::db;
use crate::domain::{NewWord, Word};
use crate::error::AppResult;
use crate::services::import::{self, ImportSummary};
use crate::state::AppState;

use super::JsonBody;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchImportRequest {
    pub group_id: i64,
    /// Dictionary entries, validated one by one during import
    pub words: Vec<Value>,
}

/// POST /api/words
pub async fn create_word(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<NewWord>,
) -> AppResult<(StatusCode, Json<Word>)> {
    let conn = db::try_lock(&state.db)?;
    let word = import::create_word(&conn, &request, state.clock.now_utc())?;
    Ok((StatusCode::CREATED, Json(word)))
}

/// Import dictionary entries, skipping words the group already has.
///
/// POST /api/words/batch
pub async fn import_words(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<BatchImportRequest>,
) -> AppResult<(StatusCode, Json<ImportSummary>)> {
    let mut conn = db::try_lock(&state.db)?;
    let summary = import::import_words(
        &mut conn,
        request.group_id,
        request.words,
        state.clock.now_utc(),
    )?;
    Ok((StatusCode::CREATED, Json(summary)))
}
