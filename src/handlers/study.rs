//! Quiz mode endpoints: queue fetch and the four ways an answer reaches the
//! scheduler (self-rating, graded typed answer, AI sentence score, explicit
//! failure).

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::db::{self, DailyStatus, DbPool, LogOnError};
use crate::domain::{ItemProgress, Quality, ReviewLog, StudyMode};
use crate::grading::{self, cloze, Verdict};
use crate::queue::{self, QueueFilter};
use crate::srs;

use super::{db_unavailable, unknown_item};

#[derive(Debug, Deserialize)]
pub struct QueueParams {
  pub filter: Option<String>,
  pub limit: Option<usize>,
  pub category: Option<String>,
}

pub async fn study_queue(
  State(pool): State<DbPool>,
  Query(params): Query<QueueParams>,
) -> Response {
  let filter = params
    .filter
    .as_deref()
    .and_then(QueueFilter::from_str)
    .unwrap_or(QueueFilter::Due);
  let limit = params.limit.unwrap_or(match filter {
    QueueFilter::Due => config::DUE_QUEUE_LIMIT,
    _ => config::ENDLESS_BATCH_LIMIT,
  });

  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };

  let words = match params.category.as_deref() {
    Some(category) => {
      db::get_words_by_category(&conn, category).log_warn_default("Failed to load catalog")
    }
    None => db::get_all_words(&conn).log_warn_default("Failed to load catalog"),
  };
  let ids: Vec<String> = words.iter().map(|w| w.id.clone()).collect();
  let progress = db::get_progress_map(&conn, &ids).log_warn_default("Failed to load progress");

  let queue = queue::build_queue(&words, &progress, filter, limit, Utc::now());
  Json(queue).into_response()
}

/// What every review endpoint hands back: the persisted progress plus
/// today's study status.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
  pub progress: ItemProgress,
  pub daily: Option<DailyStatus>,
}

/// Persist an answered review: store progress, log the event, award points,
/// and bump today's counter.
fn commit_answer(
  conn: &Connection,
  progress: ItemProgress,
  quality: u8,
  score: f64,
  study_mode: StudyMode,
) -> Response {
  if db::put_progress(conn, &progress)
    .log_warn("Failed to store progress")
    .is_none()
  {
    return db_unavailable();
  }

  let _ = db::insert_review_log(
    conn,
    &ReviewLog::new(&progress.item_id, quality, score, study_mode),
  )
  .log_warn("Failed to log review");
  let _ = db::add_points(conn, score as i64).log_warn("Failed to add points");
  let daily = db::record_study_event(conn, Utc::now()).log_warn("Failed to update daily count");

  Json(AnswerResponse { progress, daily }).into_response()
}

#[derive(Debug, Deserialize)]
pub struct RateForm {
  pub item_id: String,
  pub quality: Quality,
}

/// Flashcards: the learner picked Hard / Medium / Easy after flipping.
pub async fn rate_answer(State(pool): State<DbPool>, Json(form): Json<RateForm>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &form.item_id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&form.item_id);
  }

  let prev = db::get_progress(&conn, &form.item_id)
    .log_warn("Failed to get progress")
    .flatten();
  let score = form.quality.flashcard_points();
  let next = srs::record_answer(prev.as_ref(), &form.item_id, form.quality, score, Utc::now());

  commit_answer(&conn, next, form.quality.as_u8(), score, StudyMode::Flashcards)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckTarget {
  Word,
  Definition,
}

impl Default for CheckTarget {
  fn default() -> Self {
    Self::Word
  }
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
  pub item_id: String,
  pub answer: String,
  #[serde(default)]
  pub target: CheckTarget,
  #[serde(default)]
  pub hints_used: u8,
  pub study_mode: Option<StudyMode>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
  pub verdict: Verdict,
  pub score: u8,
  pub expected: String,
  pub progress: ItemProgress,
  pub daily: Option<DailyStatus>,
}

/// Type-it / Cloze / Rapid-fire: grade a typed answer, then route it into
/// the scheduler. Exact and near answers become graded updates; a miss goes
/// through the failure path.
pub async fn check_answer(State(pool): State<DbPool>, Json(form): Json<CheckForm>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  let Some(word) = db::get_word(&conn, &form.item_id)
    .log_warn("Failed to get word")
    .flatten()
  else {
    return unknown_item(&form.item_id);
  };

  let (verdict, expected) = match form.target {
    CheckTarget::Word => {
      let grade = grading::grade_spelling(&form.answer, &word.word);
      (grade.verdict, word.word.clone())
    }
    CheckTarget::Definition => {
      let grade = grading::grade_definition(&form.answer, &word.definition_en);
      (grade.verdict, word.definition_en.clone())
    }
  };
  let score = cloze::apply_hint_penalty(verdict.score(), form.hints_used);
  let study_mode = form.study_mode.unwrap_or(StudyMode::TypeIt);

  let now = Utc::now();
  let prev = db::get_progress(&conn, &form.item_id)
    .log_warn("Failed to get progress")
    .flatten();
  let (next, quality) = match verdict.quality() {
    Some(quality) => (
      srs::record_answer(prev.as_ref(), &form.item_id, quality, score as f64, now),
      quality.as_u8(),
    ),
    None => (srs::record_failure(prev.as_ref(), &form.item_id, now), 0),
  };

  if db::put_progress(&conn, &next)
    .log_warn("Failed to store progress")
    .is_none()
  {
    return db_unavailable();
  }
  let _ = db::insert_review_log(
    &conn,
    &ReviewLog::new(&form.item_id, quality, score as f64, study_mode),
  )
  .log_warn("Failed to log review");
  let _ = db::add_points(&conn, score as i64).log_warn("Failed to add points");
  let daily = db::record_study_event(&conn, now).log_warn("Failed to update daily count");

  Json(CheckResponse {
    verdict,
    score,
    expected,
    progress: next,
    daily,
  })
  .into_response()
}

#[derive(Debug, Deserialize)]
pub struct ScoreForm {
  pub item_id: String,
  /// Sentence score from the AI grader, 0-5. Larger values are read as 5.
  pub score: u8,
}

/// Use-it: apply an AI-assigned sentence score to the schedule.
pub async fn score_sentence(State(pool): State<DbPool>, Json(form): Json<ScoreForm>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &form.item_id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&form.item_id);
  }

  let ai_score = form.score.min(5);
  let quality = grading::quality_from_ai_score(ai_score);
  let points = grading::points_from_ai_score(ai_score);

  let prev = db::get_progress(&conn, &form.item_id)
    .log_warn("Failed to get progress")
    .flatten();
  let next = srs::record_answer(prev.as_ref(), &form.item_id, quality, points, Utc::now());

  commit_answer(&conn, next, quality.as_u8(), points, StudyMode::UseIt)
}

#[derive(Debug, Deserialize)]
pub struct FailForm {
  pub item_id: String,
  pub study_mode: Option<StudyMode>,
}

/// Explicit miss: a skipped rapid-fire card or a blank answer.
pub async fn fail_item(State(pool): State<DbPool>, Json(form): Json<FailForm>) -> Response {
  let conn = match db::try_lock(&pool) {
    Ok(conn) => conn,
    Err(_) => return db_unavailable(),
  };
  if db::get_word(&conn, &form.item_id).log_warn("Failed to get word").flatten().is_none() {
    return unknown_item(&form.item_id);
  }

  let prev = db::get_progress(&conn, &form.item_id)
    .log_warn("Failed to get progress")
    .flatten();
  let next = srs::record_failure(prev.as_ref(), &form.item_id, Utc::now());
  let study_mode = form.study_mode.unwrap_or(StudyMode::RapidFire);

  commit_answer(&conn, next, 0, 0.0, study_mode)
}
