//! Builds study queues from the catalog and stored progress.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::domain::{ItemProgress, WordItem};
use crate::srs;

/// Which slice of the catalog a study queue draws from.
///
/// `Due` is the finite SRS queue; the other filters back the endless
/// sub-modes and draw from flags or the most recent flashcard score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueFilter {
  Due,
  All,
  Favorites,
  FlaggedToday,
  LastScoreEasy,
  LastScoreMedium,
  LastScoreHard,
}

impl QueueFilter {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Due => "due",
      Self::All => "all",
      Self::Favorites => "favorites",
      Self::FlaggedToday => "flagged",
      Self::LastScoreEasy => "easy",
      Self::LastScoreMedium => "medium",
      Self::LastScoreHard => "hard",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "due" => Some(Self::Due),
      "all" => Some(Self::All),
      "favorites" => Some(Self::Favorites),
      "flagged" => Some(Self::FlaggedToday),
      "easy" => Some(Self::LastScoreEasy),
      "medium" => Some(Self::LastScoreMedium),
      "hard" => Some(Self::LastScoreHard),
      _ => None,
    }
  }
}

/// Select, shuffle and cap a study queue.
///
/// Due-ness goes through [`srs::is_due`], so items with no progress record
/// are due. The shuffle is a plain Fisher-Yates via `rand`.
pub fn build_queue(
  words: &[WordItem],
  progress: &HashMap<String, ItemProgress>,
  filter: QueueFilter,
  limit: usize,
  now: DateTime<Utc>,
) -> Vec<WordItem> {
  let mut picked: Vec<WordItem> = words
    .iter()
    .filter(|w| {
      let p = progress.get(&w.id);
      match filter {
        QueueFilter::Due => srs::is_due(p.map(|p| &p.review), now),
        QueueFilter::All => true,
        QueueFilter::Favorites => p.map(|p| p.favorite).unwrap_or(false),
        QueueFilter::FlaggedToday => p.map(|p| p.flagged_for_today).unwrap_or(false),
        QueueFilter::LastScoreEasy => has_last_score(p, 3.0),
        QueueFilter::LastScoreMedium => has_last_score(p, 2.0),
        QueueFilter::LastScoreHard => has_last_score(p, 1.0),
      }
    })
    .cloned()
    .collect();

  picked.shuffle(&mut rand::rng());
  picked.truncate(limit);
  picked
}

fn has_last_score(progress: Option<&ItemProgress>, score: f64) -> bool {
  progress
    .map(|p| (p.last_score - score).abs() < f64::EPSILON)
    .unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::domain::{Quality, ReviewState};

  fn word(id: &str) -> WordItem {
    WordItem {
      id: id.to_string(),
      word: id.to_string(),
      definition_en: format!("definition of {}", id),
      example_en: None,
      translation_es: None,
      category: "Noun".to_string(),
      seq: None,
    }
  }

  fn scheduled(id: &str, days_from_now: i64, now: DateTime<Utc>) -> ItemProgress {
    let mut p = ItemProgress::new(id);
    p.review = ReviewState {
      next_review: Some(now + Duration::days(days_from_now)),
      ..ReviewState::new()
    };
    p
  }

  #[test]
  fn test_due_queue_includes_unseen_items() {
    let words = vec![word("a"), word("b")];
    let progress = HashMap::new();

    let queue = build_queue(&words, &progress, QueueFilter::Due, 10, Utc::now());
    assert_eq!(queue.len(), 2);
  }

  #[test]
  fn test_due_queue_excludes_future_items() {
    let now = Utc::now();
    let words = vec![word("a"), word("b"), word("c")];
    let mut progress = HashMap::new();
    progress.insert("a".to_string(), scheduled("a", 3, now));
    progress.insert("b".to_string(), scheduled("b", -1, now));

    let queue = build_queue(&words, &progress, QueueFilter::Due, 10, now);
    let ids: Vec<&str> = queue.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(queue.len(), 2);
    assert!(ids.contains(&"b"));
    assert!(ids.contains(&"c"));
  }

  #[test]
  fn test_queue_respects_limit() {
    let words: Vec<WordItem> = (0..50).map(|i| word(&format!("w{}", i))).collect();
    let progress = HashMap::new();

    let queue = build_queue(&words, &progress, QueueFilter::Due, 10, Utc::now());
    assert_eq!(queue.len(), 10);
  }

  #[test]
  fn test_all_filter_takes_everything() {
    let now = Utc::now();
    let words = vec![word("a"), word("b")];
    let mut progress = HashMap::new();
    progress.insert("a".to_string(), scheduled("a", 30, now));

    let queue = build_queue(&words, &progress, QueueFilter::All, 10, now);
    assert_eq!(queue.len(), 2);
  }

  #[test]
  fn test_favorites_filter() {
    let words = vec![word("a"), word("b")];
    let mut progress = HashMap::new();
    let mut fav = ItemProgress::new("a");
    fav.favorite = true;
    progress.insert("a".to_string(), fav);

    let queue = build_queue(&words, &progress, QueueFilter::Favorites, 10, Utc::now());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, "a");
  }

  #[test]
  fn test_flagged_filter() {
    let words = vec![word("a"), word("b")];
    let mut progress = HashMap::new();
    let mut flagged = ItemProgress::new("b");
    flagged.flagged_for_today = true;
    progress.insert("b".to_string(), flagged);

    let queue = build_queue(&words, &progress, QueueFilter::FlaggedToday, 10, Utc::now());
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, "b");
  }

  #[test]
  fn test_last_score_filters() {
    let now = Utc::now();
    let words = vec![word("easy"), word("medium"), word("hard"), word("new")];
    let mut progress = HashMap::new();
    for (id, quality, score) in [
      ("easy", Quality::Easy, 3.0),
      ("medium", Quality::Medium, 2.0),
      ("hard", Quality::Hard, 1.0),
    ] {
      progress.insert(id.to_string(), srs::record_answer(None, id, quality, score, now));
    }

    let easy = build_queue(&words, &progress, QueueFilter::LastScoreEasy, 10, now);
    assert_eq!(easy.len(), 1);
    assert_eq!(easy[0].id, "easy");

    let medium = build_queue(&words, &progress, QueueFilter::LastScoreMedium, 10, now);
    assert_eq!(medium.len(), 1);
    assert_eq!(medium[0].id, "medium");

    let hard = build_queue(&words, &progress, QueueFilter::LastScoreHard, 10, now);
    assert_eq!(hard.len(), 1);
    assert_eq!(hard[0].id, "hard");
  }

  #[test]
  fn test_filter_str_roundtrip() {
    let filters = [
      QueueFilter::Due,
      QueueFilter::All,
      QueueFilter::Favorites,
      QueueFilter::FlaggedToday,
      QueueFilter::LastScoreEasy,
      QueueFilter::LastScoreMedium,
      QueueFilter::LastScoreHard,
    ];

    for f in filters {
      assert_eq!(QueueFilter::from_str(f.as_str()), Some(f));
    }
    assert_eq!(QueueFilter::from_str("bogus"), None);
  }
}
