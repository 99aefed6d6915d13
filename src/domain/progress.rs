use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling state for one vocabulary item.
///
/// A `next_review` of `None` means the item has never been scheduled and is
/// always due. Both timestamps stay `None` until the first answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
  /// Easiness factor. Starts at 2.5, never drops below 1.3.
  pub easiness: f64,
  /// Days until the next scheduled review. 0 means due immediately.
  pub interval_days: i64,
  /// Consecutive non-failing reviews since creation or the last failure.
  pub repetitions: i64,
  pub last_reviewed: Option<DateTime<Utc>>,
  pub next_review: Option<DateTime<Utc>>,
}

impl ReviewState {
  pub fn new() -> Self {
    Self {
      easiness: 2.5,
      interval_days: 0,
      repetitions: 0,
      last_reviewed: None,
      next_review: None,
    }
  }
}

impl Default for ReviewState {
  fn default() -> Self {
    Self::new()
  }
}

/// Per-item progress record: the scheduling state plus session bookkeeping.
/// One record per catalog item, keyed by `item_id`; a missing record is
/// equivalent to `ItemProgress::new(id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProgress {
  pub item_id: String,
  pub review: ReviewState,
  /// Total answers ever given for this item. Never reset.
  pub total_answers: i64,
  /// Consecutive answers at Medium quality or better.
  pub correct_streak: i64,
  /// Raw point value of the most recent grading.
  pub last_score: f64,
  pub favorite: bool,
  pub flagged_for_today: bool,
}

impl ItemProgress {
  pub fn new(item_id: impl Into<String>) -> Self {
    Self {
      item_id: item_id.into(),
      review: ReviewState::new(),
      total_answers: 0,
      correct_streak: 0,
      last_score: 0.0,
      favorite: false,
      flagged_for_today: false,
    }
  }
}
