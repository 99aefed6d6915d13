//! JSON API handlers wiring the quiz modes to the scheduling core.

pub mod progress;
pub mod study;
pub mod words;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::DbPool;

pub use progress::{item_history, item_progress, set_flags, stats};
pub use study::{check_answer, fail_item, rate_answer, score_sentence, study_queue};
pub use words::{get_word_by_id, list_categories, list_words, upsert_word};

pub fn router(pool: DbPool) -> Router {
  Router::new()
    .route("/api/words", get(list_words).post(upsert_word))
    .route("/api/words/{id}", get(get_word_by_id))
    .route("/api/categories", get(list_categories))
    .route("/api/queue", get(study_queue))
    .route("/api/review/rate", post(rate_answer))
    .route("/api/review/check", post(check_answer))
    .route("/api/review/score", post(score_sentence))
    .route("/api/review/fail", post(fail_item))
    .route("/api/progress/{id}", get(item_progress))
    .route("/api/progress/{id}/history", get(item_history))
    .route("/api/progress/{id}/flags", post(set_flags))
    .route("/api/stats", get(stats))
    .layer(TraceLayer::new_for_http())
    .with_state(pool)
}

pub(crate) fn db_unavailable() -> Response {
  (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response()
}

pub(crate) fn unknown_item(id: &str) -> Response {
  (StatusCode::NOT_FOUND, format!("unknown item: {}", id)).into_response()
}
