//! Typed-answer grading: normalization, typo-tolerant spelling comparison,
//! bag-of-words definition comparison, and the verdict-to-quality mapping
//! quiz modes feed into the scheduler.

pub mod cloze;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::Quality;

/// Outcome of grading one typed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  Exact,
  Near,
  Fail,
}

impl Verdict {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Exact => "exact",
      Self::Near => "near",
      Self::Fail => "fail",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "exact" => Some(Self::Exact),
      "near" => Some(Self::Near),
      "fail" => Some(Self::Fail),
      _ => None,
    }
  }

  /// Points awarded for this verdict.
  pub fn score(&self) -> u8 {
    match self {
      Self::Exact => 3,
      Self::Near => 2,
      Self::Fail => 0,
    }
  }

  /// Quality grade this verdict maps to. `None` routes the answer through
  /// the scheduler's failure path instead of a graded update.
  pub fn quality(&self) -> Option<Quality> {
    match self {
      Self::Exact => Some(Quality::Easy),
      Self::Near => Some(Quality::Medium),
      Self::Fail => None,
    }
  }
}

/// Normalize text for comparison: lowercase, diacritics stripped, quotes
/// removed, dashes/underscores/slashes as spaces, whitespace collapsed.
pub fn normalize(s: &str) -> String {
  let stripped: String = s
    .to_lowercase()
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .collect();

  stripped
    .chars()
    .filter(|c| !matches!(c, '\'' | '\u{2019}' | '"'))
    .map(|c| if matches!(c, '-' | '_' | '/') { ' ' } else { c })
    .collect::<String>()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Iterative two-row Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
  if a == b {
    return 0;
  }
  let a_chars: Vec<char> = a.chars().collect();
  let b_chars: Vec<char> = b.chars().collect();
  if a_chars.is_empty() {
    return b_chars.len();
  }
  if b_chars.is_empty() {
    return a_chars.len();
  }

  let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
  let mut curr = vec![0usize; b_chars.len() + 1];

  for (i, &ca) in a_chars.iter().enumerate() {
    curr[0] = i + 1;
    for (j, &cb) in b_chars.iter().enumerate() {
      let cost = if ca == cb { 0 } else { 1 };
      curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
    }
    prev.copy_from_slice(&curr);
  }

  prev[b_chars.len()]
}

/// Typo budget scaled to the target's length.
pub fn allowed_typos(len: usize) -> usize {
  match len {
    0..=4 => 0,
    5..=7 => 1,
    8..=11 => 2,
    12..=15 => 3,
    _ => len / 4,
  }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SpellingGrade {
  pub verdict: Verdict,
  pub score: u8,
  pub distance: usize,
  pub threshold: usize,
}

/// Grade a typed word/expression against the expected spelling.
pub fn grade_spelling(given: &str, target: &str) -> SpellingGrade {
  let g = normalize(given);
  let t = normalize(target);

  if t.is_empty() {
    return SpellingGrade {
      verdict: Verdict::Fail,
      score: 0,
      distance: 0,
      threshold: 0,
    };
  }
  if g == t {
    return SpellingGrade {
      verdict: Verdict::Exact,
      score: 3,
      distance: 0,
      threshold: 0,
    };
  }

  let distance = levenshtein(&g, &t);
  let threshold = allowed_typos(t.chars().count());
  if distance <= threshold {
    SpellingGrade {
      verdict: Verdict::Near,
      score: 2,
      distance,
      threshold,
    }
  } else {
    SpellingGrade {
      verdict: Verdict::Fail,
      score: 0,
      distance,
      threshold,
    }
  }
}

const STOPWORDS: &[&str] = &[
  "the", "a", "an", "of", "to", "and", "in", "on", "for", "with", "at", "by", "from", "as", "is",
  "are", "was", "were", "be", "been", "being", "it", "that", "this", "these", "those", "or",
  "not", "but",
];

fn content_tokens(s: &str) -> HashSet<String> {
  normalize(s)
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
    .map(|w| w.to_string())
    .collect()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DefinitionGrade {
  pub verdict: Verdict,
  pub score: u8,
  pub ratio: f64,
}

/// Grade a free-form definition by stopword-filtered token overlap
/// (Jaccard ratio) with the reference definition.
pub fn grade_definition(given: &str, target: &str) -> DefinitionGrade {
  let g = content_tokens(given);
  let t = content_tokens(target);

  if t.is_empty() {
    return DefinitionGrade {
      verdict: Verdict::Fail,
      score: 0,
      ratio: 0.0,
    };
  }

  let inter = g.intersection(&t).count();
  let union = g.union(&t).count();
  let ratio = if union == 0 {
    0.0
  } else {
    inter as f64 / union as f64
  };

  if ratio >= 0.85 {
    DefinitionGrade {
      verdict: Verdict::Exact,
      score: 3,
      ratio,
    }
  } else if ratio >= 0.5 {
    DefinitionGrade {
      verdict: Verdict::Near,
      score: 2,
      ratio,
    }
  } else {
    DefinitionGrade {
      verdict: Verdict::Fail,
      score: 0,
      ratio,
    }
  }
}

/// Map a 0-5 sentence score from the AI grader onto a quality grade.
/// Values above 5 are treated as 5.
pub fn quality_from_ai_score(score: u8) -> Quality {
  if score >= 4 {
    Quality::Easy
  } else if score >= 2 {
    Quality::Medium
  } else {
    Quality::Hard
  }
}

/// Points awarded for a 0-5 AI sentence score.
pub fn points_from_ai_score(score: u8) -> f64 {
  if score >= 4 {
    3.0
  } else if score >= 2 {
    2.0
  } else {
    1.0
  }
}
