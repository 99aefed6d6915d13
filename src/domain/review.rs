use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported or computed recall quality for one review event.
///
/// Hard is the lowest non-failing grade. A complete miss is not part of this
/// scale: it goes through the scheduler's failure path instead, which resets
/// the interval rather than shrinking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
  Hard,
  Medium,
  Easy,
}

impl Quality {
  /// Numeric value on the SM-2 quality scale.
  pub fn as_u8(&self) -> u8 {
    match self {
      Self::Hard => 3,
      Self::Medium => 4,
      Self::Easy => 5,
    }
  }

  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      3 => Some(Self::Hard),
      4 => Some(Self::Medium),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Hard => "hard",
      Self::Medium => "medium",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "hard" => Some(Self::Hard),
      "medium" => Some(Self::Medium),
      "easy" => Some(Self::Easy),
      _ => None,
    }
  }

  /// Whether this grade keeps the correct streak alive.
  pub fn is_good(&self) -> bool {
    matches!(self, Self::Medium | Self::Easy)
  }

  /// Points awarded for a flashcard self-rating.
  pub fn flashcard_points(&self) -> f64 {
    match self {
      Self::Hard => 1.0,
      Self::Medium => 2.0,
      Self::Easy => 3.0,
    }
  }
}

/// Which quiz mode produced a review event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyMode {
  #[serde(rename = "flashcards")]
  Flashcards,
  #[serde(rename = "typeit")]
  TypeIt,
  #[serde(rename = "cloze")]
  Cloze,
  #[serde(rename = "rapid")]
  RapidFire,
  #[serde(rename = "useit")]
  UseIt,
}

impl StudyMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Flashcards => "flashcards",
      Self::TypeIt => "typeit",
      Self::Cloze => "cloze",
      Self::RapidFire => "rapid",
      Self::UseIt => "useit",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "flashcards" => Some(Self::Flashcards),
      "typeit" => Some(Self::TypeIt),
      "cloze" => Some(Self::Cloze),
      "rapid" => Some(Self::RapidFire),
      "useit" => Some(Self::UseIt),
      _ => None,
    }
  }
}

/// Append-only record of one review event. `quality` is the numeric SM-2
/// grade, with 0 standing for the failure path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewLog {
  pub id: i64,
  pub item_id: String,
  pub quality: u8,
  pub score: f64,
  pub study_mode: Option<StudyMode>,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewLog {
  pub fn new(item_id: &str, quality: u8, score: f64, study_mode: StudyMode) -> Self {
    Self {
      id: 0,
      item_id: item_id.to_string(),
      quality,
      score,
      study_mode: Some(study_mode),
      reviewed_at: Utc::now(),
    }
  }
}
