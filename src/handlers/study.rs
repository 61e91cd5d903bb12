//! Study session handlers: word lists and the two answer paths.

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::{Query, WithRejection};
use serde::Deserialize;

use crate::db;
use crate::domain::Word;
use crate::error::{AppError, AppResult};
use crate::services::study;
use crate::srs::{parse_levels, SessionContext, StudyMode};
use crate::state::AppState;

use super::{IdPath, JsonBody};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWordsQuery {
    pub mode: Option<StudyMode>,
    pub is_first_session: Option<bool>,
    /// Repeated (`levels=1&levels=2`) or comma separated (`levels=1,2`)
    #[serde(default)]
    pub levels: Vec<String>,
}

impl ListWordsQuery {
    pub fn session_context(&self) -> Result<SessionContext, AppError> {
        let levels = parse_levels(&self.levels).map_err(AppError::Validation)?;
        Ok(SessionContext::resolve(
            self.mode,
            self.is_first_session.unwrap_or(false),
            levels,
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub is_correct: bool,
}

/// Words of a group eligible for the requested session.
///
/// GET /api/words/{groupId}?mode=&isFirstSession=&levels=
pub async fn list_words(
    State(state): State<AppState>,
    WithRejection(Path(group_id), _): IdPath,
    WithRejection(Query(query), _): WithRejection<Query<ListWordsQuery>, AppError>,
) -> AppResult<Json<Vec<Word>>> {
    let ctx = query.session_context()?;
    let today = state.clock.today();

    let conn = db::try_lock(&state.db)?;
    let words = study::list_eligible(&conn, group_id, &ctx, today)?;
    Ok(Json(words))
}

/// Record a typed answer.
///
/// PUT /api/words/{id}/level
pub async fn record_answer(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(request), _): JsonBody<AnswerRequest>,
) -> AppResult<Json<Word>> {
    let today = state.clock.today();
    let now = state.clock.now_utc();

    let mut conn = db::try_lock(&state.db)?;
    let word = study::record_answer(&mut conn, id, request.is_correct, today, now)?;
    Ok(Json(word))
}

/// Passive "seen in slideshow" ping.
///
/// PUT /api/words/{id}/studied
pub async fn mark_studied(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<Json<Word>> {
    let today = state.clock.today();
    let now = state.clock.now_utc();

    let mut conn = db::try_lock(&state.db)?;
    let word = study::mark_studied(&mut conn, id, today, now)?;
    Ok(Json(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_resolves_context() {
        let query = ListWordsQuery {
            mode: Some(StudyMode::Input),
            is_first_session: Some(true),
            levels: vec![],
        };
        assert_eq!(query.session_context().unwrap(), SessionContext::InputFirstSession);

        let query = ListWordsQuery {
            mode: Some(StudyMode::Input),
            is_first_session: None,
            levels: vec![],
        };
        assert_eq!(query.session_context().unwrap(), SessionContext::InputRepeatSession);
    }

    #[test]
    fn test_query_rejects_bad_levels() {
        let query = ListWordsQuery {
            levels: vec!["7".to_string()],
            ..ListWordsQuery::default()
        };
        assert!(matches!(query.session_context(), Err(AppError::Validation(_))));
    }
}
