use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::db;
use crate::domain::{Group, GroupSummary, NewGroup};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::{IdPath, JsonBody};

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub name: String,
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Group name must not be empty"));
    }
    Ok(())
}

/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    WithRejection(Json(request), _): JsonBody<NewGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    validate_name(&request.name)?;

    let conn = db::try_lock(&state.db)?;
    if db::get_user_by_id(&conn, request.user_id)?.is_none() {
        return Err(AppError::NotFound("User"));
    }

    let id = db::insert_group(&conn, &request, state.clock.now_utc())?;
    let group = db::get_group_by_id(&conn, id)?.ok_or(AppError::NotFound("Group"))?;
    tracing::info!("Created group {} '{}'", group.id, group.name);
    Ok((StatusCode::CREATED, Json(group)))
}

/// Groups of a user with word counts.
///
/// GET /api/groups/{userId}
pub async fn list_groups(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): IdPath,
) -> AppResult<Json<Vec<GroupSummary>>> {
    let conn = db::try_lock(&state.db)?;
    Ok(Json(db::get_groups_for_user(&conn, user_id)?))
}

/// PUT /api/groups/{id}
pub async fn rename_group(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
    WithRejection(Json(request), _): JsonBody<RenameGroupRequest>,
) -> AppResult<Json<Group>> {
    validate_name(&request.name)?;

    let conn = db::try_lock(&state.db)?;
    let group = db::rename_group(&conn, id, &request.name)?.ok_or(AppError::NotFound("Group"))?;
    Ok(Json(group))
}

/// Delete a group together with its words.
///
/// DELETE /api/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    WithRejection(Path(id), _): IdPath,
) -> AppResult<StatusCode> {
    let conn = db::try_lock(&state.db)?;
    if !db::delete_group(&conn, id)? {
        return Err(AppError::NotFound("Group"));
    }
    tracing::info!("Deleted group {}", id);
    Ok(StatusCode::NO_CONTENT)
}
