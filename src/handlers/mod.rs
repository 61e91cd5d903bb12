//! JSON API under `/api`.

pub mod groups;
pub mod stats;
pub mod study;
pub mod words;

use axum::{
    extract::Path,
    routing::{get, post, put},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Numeric path id; anything else is a 400
pub type IdPath = WithRejection<Path<i64>, AppError>;

/// JSON request body; malformed bodies are a 400
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/groups", post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::list_groups)
                .put(groups::rename_group)
                .delete(groups::delete_group),
        )
        .route("/words", post(words::create_word))
        .route("/words/batch", post(words::import_words))
        .route("/words/{id}", get(study::list_words))
        .route("/words/{id}/level", put(study::record_answer))
        .route("/words/{id}/studied", put(study::mark_studied))
        .route("/users/{id}/days-studied", put(stats::record_study_day))
        .route("/stats/{id}", get(stats::vocabulary_stats))
        .route("/stats/{id}/history", get(stats::stats_history));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
