//! Composite entry points quiz modes call: one answer in, one new
//! `ItemProgress` out. Callers persist the returned record themselves.

use chrono::{DateTime, Utc};

use crate::domain::{ItemProgress, Quality};

use super::scheduler;

/// Record a graded answer for `item_id`.
///
/// Runs the scheduler update, bumps `total_answers`, extends or resets the
/// correct streak (Medium and Easy keep it alive), and stores `raw_score` as
/// the last score. Flags carry over untouched.
pub fn record_answer(
  prev: Option<&ItemProgress>,
  item_id: &str,
  quality: Quality,
  raw_score: f64,
  now: DateTime<Utc>,
) -> ItemProgress {
  let base = prev.map(|p| p.review).unwrap_or_default();
  let correct_streak = if quality.is_good() {
    prev.map(|p| p.correct_streak).unwrap_or(0) + 1
  } else {
    0
  };

  ItemProgress {
    item_id: item_id.to_string(),
    review: scheduler::update(&base, quality, now),
    total_answers: prev.map(|p| p.total_answers).unwrap_or(0) + 1,
    correct_streak,
    last_score: raw_score,
    favorite: prev.map(|p| p.favorite).unwrap_or(false),
    flagged_for_today: prev.map(|p| p.flagged_for_today).unwrap_or(false),
  }
}

/// Record a complete miss for `item_id`: schedule reset, streak and last
/// score zeroed, `total_answers` still counted.
pub fn record_failure(
  prev: Option<&ItemProgress>,
  item_id: &str,
  now: DateTime<Utc>,
) -> ItemProgress {
  let base = prev.map(|p| p.review).unwrap_or_default();

  ItemProgress {
    item_id: item_id.to_string(),
    review: scheduler::fail(&base, now),
    total_answers: prev.map(|p| p.total_answers).unwrap_or(0) + 1,
    correct_streak: 0,
    last_score: 0.0,
    favorite: prev.map(|p| p.favorite).unwrap_or(false),
    flagged_for_today: prev.map(|p| p.flagged_for_today).unwrap_or(false),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_answer_from_absent_record() {
    let now = Utc::now();
    let p = record_answer(None, "give-up", Quality::Easy, 3.0, now);

    assert_eq!(p.item_id, "give-up");
    assert_eq!(p.total_answers, 1);
    assert_eq!(p.correct_streak, 1);
    assert!((p.last_score - 3.0).abs() < f64::EPSILON);
    assert_eq!(p.review.repetitions, 1);
    assert_eq!(p.review.interval_days, 1);
  }

  #[test]
  fn test_streak_grows_on_good_answers() {
    let now = Utc::now();
    let first = record_answer(None, "hinge", Quality::Medium, 2.0, now);
    let second = record_answer(Some(&first), "hinge", Quality::Easy, 3.0, now);

    assert_eq!(second.correct_streak, 2);
    assert_eq!(second.total_answers, 2);
  }

  #[test]
  fn test_hard_resets_streak() {
    let now = Utc::now();
    let mut p = record_answer(None, "hinge", Quality::Easy, 3.0, now);
    p = record_answer(Some(&p), "hinge", Quality::Easy, 3.0, now);
    assert_eq!(p.correct_streak, 2);

    p = record_answer(Some(&p), "hinge", Quality::Hard, 1.0, now);
    assert_eq!(p.correct_streak, 0);
    // Hard still counts as a successful repetition for the scheduler.
    assert_eq!(p.review.repetitions, 3);
    assert_eq!(p.total_answers, 3);
  }

  #[test]
  fn test_record_answer_stores_last_score() {
    let now = Utc::now();
    let first = record_answer(None, "hinge", Quality::Medium, 2.0, now);
    assert!((first.last_score - 2.0).abs() < f64::EPSILON);

    let second = record_answer(Some(&first), "hinge", Quality::Easy, 3.0, now);
    assert!((second.last_score - 3.0).abs() < f64::EPSILON);
  }

  #[test]
  fn test_record_answer_preserves_flags() {
    let now = Utc::now();
    let mut prev = ItemProgress::new("hinge");
    prev.favorite = true;
    prev.flagged_for_today = true;

    let next = record_answer(Some(&prev), "hinge", Quality::Easy, 3.0, now);
    assert!(next.favorite);
    assert!(next.flagged_for_today);
  }

  #[test]
  fn test_record_failure_zeroes_streak_and_score() {
    let now = Utc::now();
    let mut p = record_answer(None, "hinge", Quality::Easy, 3.0, now);
    p = record_answer(Some(&p), "hinge", Quality::Easy, 3.0, now);

    let failed = record_failure(Some(&p), "hinge", now);
    assert_eq!(failed.correct_streak, 0);
    assert!((failed.last_score - 0.0).abs() < f64::EPSILON);
    assert_eq!(failed.total_answers, 3);
    assert_eq!(failed.review.repetitions, 0);
    assert_eq!(failed.review.interval_days, 1);
  }

  #[test]
  fn test_record_failure_from_absent_record() {
    let failed = record_failure(None, "hinge", Utc::now());
    assert_eq!(failed.total_answers, 1);
    assert_eq!(failed.review.repetitions, 0);
    assert!((failed.review.easiness - 2.3).abs() < 1e-9);
  }

  #[test]
  fn test_total_answers_never_resets() {
    let now = Utc::now();
    let mut p = record_answer(None, "hinge", Quality::Easy, 3.0, now);
    for _ in 0..4 {
      p = record_failure(Some(&p), "hinge", now);
      p = record_answer(Some(&p), "hinge", Quality::Hard, 1.0, now);
    }
    assert_eq!(p.total_answers, 9);
  }
}
