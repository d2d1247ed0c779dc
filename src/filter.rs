//! Alphabetic filtering and case folding.
//!
//! After this stage every token consists of letters only and is lowercase.
//! `char::is_alphabetic` and `str::to_lowercase` follow the Unicode tables,
//! so Cyrillic (and any other cased script) is handled the same way as Latin.

use crate::types::Token;

/// Returns `true` if `word` is non-empty and made of alphabetic characters only.
pub fn is_alphabetic_word(word: &str) -> bool {
  !word.is_empty() && word.chars().all(char::is_alphabetic)
}

/// Keeps a single token if it is alphabetic, returning it lowercased.
pub fn fold_token(token: &str) -> Option<Token> {
  if !is_alphabetic_word(token) {
    return None;
  }
  let folded = token.to_lowercase();
  // Lowercasing may expand a letter into a base letter plus a combining mark.
  is_alphabetic_word(&folded).then_some(folded)
}

/// Retains alphabetic tokens and lowercases them, preserving order.
///
/// Applying this to its own output returns the same sequence.
pub fn fold_alphabetic<I, S>(tokens: I) -> Vec<Token>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  tokens
    .into_iter()
    .filter_map(|token| fold_token(token.as_ref()))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rejects_digits_and_symbols() {
    let tokens = vec!["Cat", "mp3", "don't", "42", "", "e-mail", "Dog"];
    assert_eq!(fold_alphabetic(tokens), vec!["cat", "dog"]);
  }

  #[test]
  fn test_folds_cyrillic() {
    let tokens = vec!["Москва", "ЁЛКА", "Привет1"];
    assert_eq!(fold_alphabetic(tokens), vec!["москва", "ёлка"]);
  }

  #[test]
  fn test_idempotent() {
    let once = fold_alphabetic(vec!["The", "CAT", "c4t", "Straße"]);
    let twice = fold_alphabetic(&once);
    assert_eq!(once, twice);
    assert_eq!(once, vec!["the", "cat", "straße"]);
  }
}
