//! Progress and aggregate-stats endpoints.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool, LogOnError};
use crate::domain::ItemProgress;
use crate::srs;

use super::{db_unavailable, unknown_item};

/// Fetch one item's progress. Absence of a record is not an error: the
/// default record is returned, matching how the scheduler treats it.
pub async fn item_progress(State(pool): State<DbPool>, Path(id): Path<String>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&id);
  }

  let progress = db::get_progress(&conn, &id)
    .log_warn("Failed to get progress")
    .flatten()
    .unwrap_or_else(|| ItemProgress::new(&id));

  Json(progress).into_response()
}

/// Recent review events for one item, newest first.
pub async fn item_history(State(pool): State<DbPool>, Path(id): Path<String>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&id);
  }

  let logs = db::get_recent_logs(&conn, &id, 20).log_warn_default("Failed to load review logs");
  Json(logs).into_response()
}

#[derive(Debug, Deserialize)]
pub struct FlagsForm {
  pub favorite: Option<bool>,
  pub flagged_for_today: Option<bool>,
}

/// Set the bookkeeping flags on an item, creating the default record first
/// if the item has never been answered.
pub async fn set_flags(
  State(pool): State<DbPool>,
  Path(id): Path<String>,
  Json(form): Json<FlagsForm>,
) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&id);
  }

  let mut progress = db::get_progress(&conn, &id)
    .log_warn("Failed to get progress")
    .flatten()
    .unwrap_or_else(|| ItemProgress::new(&id));

  if let Some(favorite) = form.favorite {
    progress.favorite = favorite;
  }
  if let Some(flagged) = form.flagged_for_today {
    progress.flagged_for_today = flagged;
  }

  if db::put_progress(&conn, &progress)
    .log_warn("Failed to store progress")
    .is_none()
  {
    return db_unavailable();
  }

  Json(progress).into_response()
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub total_words: i64,
  pub total_reviews: i64,
  pub due_count: i64,
  pub points: i64,
  pub streak: i64,
  pub daily_goal: i64,
  pub daily_count: i64,
}

pub async fn stats(State(pool): State<DbPool>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  let now = Utc::now();

  let words = db::get_all_words(&conn).log_warn_default("Failed to load catalog");
  let progress = db::get_all_progress(&conn).log_warn_default("Failed to load progress");
  let due_count = words
    .iter()
    .filter(|w| srs::is_due(progress.get(&w.id).map(|p| &p.review), now))
    .count() as i64;

  let response = StatsResponse {
    total_words: words.len() as i64,
    total_reviews: db::count_reviews(&conn).log_warn_default("Failed to count reviews"),
    due_count,
    points: db::get_points(&conn).log_warn_default("Failed to read points"),
    streak: db::get_streak(&conn).log_warn_default("Failed to read streak"),
    daily_goal: db::get_daily_goal(&conn).unwrap_or(crate::config::DEFAULT_DAILY_GOAL),
    daily_count: db::get_daily_count(&conn, now).log_warn_default("Failed to read daily count"),
  };

  Json(response).into_response()
}
