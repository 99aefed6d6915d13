//! Word catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::db::{self, DbPool, LogOnError};
use crate::domain::WordItem;

use super::{db_unavailable, unknown_item};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
}

pub async fn list_words(
  State(pool): State<DbPool>,
  Query(params): Query<ListParams>,
) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };

  let words = match params.category.as_deref() {
    Some(category) => {
      db::get_words_by_category(&conn, category).log_warn_default("Failed to list words")
    }
    None => db::get_all_words(&conn).log_warn_default("Failed to list words"),
  };

  Json(words).into_response()
}

pub async fn list_categories(State(pool): State<DbPool>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };

  let categories = db::get_categories(&conn).log_warn_default("Failed to list categories");
  Json(categories).into_response()
}

pub async fn get_word_by_id(State(pool): State<DbPool>, Path(id): Path<String>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };

  match db::get_word(&conn, &id).log_warn("Failed to get word").flatten() {
    Some(word) => Json(word).into_response(),
    None => unknown_item(&id),
  }
}

pub async fn upsert_word(State(pool): State<DbPool>, Json(mut word): Json<WordItem>) -> Response {
  if word.id.is_empty() {
    word.id = WordItem::stable_id(&word.word);
  }

  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };

  if db::upsert_word(&conn, &word)
    .log_warn("Failed to upsert word")
    .is_none()
  {
    return db_unavailable();
  }

  tracing::debug!("Upserted word {}", word.id);
  Json(word).into_response()
}
