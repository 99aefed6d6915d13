//! Cloze helpers: masking the target expression inside an example sentence
//! and re-bucketing scores after hint penalties.

/// Replace every occurrence of `word` (possibly multi-word) in `example`
/// with underscore runs, one run per masked token. If the expression does
/// not occur, the example is returned unchanged so the caller can fall back
/// to the definition.
pub fn mask_example(example: &str, word: &str) -> String {
  let target: Vec<String> = word
    .split_whitespace()
    .map(|w| comparable(w))
    .filter(|w| !w.is_empty())
    .collect();
  if target.is_empty() {
    return example.to_string();
  }

  let tokens: Vec<&str> = example.split_whitespace().collect();
  let mut out: Vec<String> = Vec::with_capacity(tokens.len());
  let mut masked_any = false;
  let mut i = 0;

  while i < tokens.len() {
    if matches_at(&tokens, i, &target) {
      for token in &tokens[i..i + target.len()] {
        out.push(mask_token(token));
      }
      i += target.len();
      masked_any = true;
    } else {
      out.push(tokens[i].to_string());
      i += 1;
    }
  }

  if masked_any {
    out.join(" ")
  } else {
    example.to_string()
  }
}

fn matches_at(tokens: &[&str], start: usize, target: &[String]) -> bool {
  if start + target.len() > tokens.len() {
    return false;
  }
  tokens[start..start + target.len()]
    .iter()
    .zip(target)
    .all(|(token, want)| comparable(token) == *want)
}

/// Case-folded token with punctuation stripped, for occurrence matching.
fn comparable(token: &str) -> String {
  token
    .chars()
    .filter(|c| c.is_alphanumeric() || *c == '\'')
    .collect::<String>()
    .to_lowercase()
}

/// Underscore run sized to the token's letter count, clamped to 8 with a
/// floor of 3 for tokens that carry no letters.
fn mask_token(token: &str) -> String {
  let letters = token.chars().filter(|c| c.is_alphabetic()).count();
  let width = if letters == 0 { 3 } else { letters.min(8) };
  "_".repeat(width)
}

/// One point off per hint used, then re-bucketed onto the 3/2/0 scale.
pub fn apply_hint_penalty(score: u8, hints_used: u8) -> u8 {
  let after = score.saturating_sub(hints_used);
  if after >= 3 {
    3
  } else if after >= 2 {
    2
  } else {
    0
  }
}
