use serde::{Deserialize, Serialize};

/// One entry in the vocabulary catalog. `id` is the stable key the progress
/// store uses; it never changes once the word has been imported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordItem {
  #[serde(default)]
  pub id: String,
  pub word: String,
  pub definition_en: String,
  pub example_en: Option<String>,
  pub translation_es: Option<String>,
  #[serde(default)]
  pub category: String,
  pub seq: Option<i64>,
}

impl WordItem {
  pub fn new(word: String, definition_en: String, category: String) -> Self {
    Self {
      id: Self::stable_id(&word),
      word,
      definition_en,
      example_en: None,
      translation_es: None,
      category,
      seq: None,
    }
  }

  /// Derive the catalog key from the headword: normalized, spaces as dashes.
  pub fn stable_id(word: &str) -> String {
    crate::grading::normalize(word).replace(' ', "-")
  }
}
