//! Text tokenization.

use crate::types::Token;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Decides which characters make up a word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
  /// Unicode word boundaries (UAX #29). Words may contain digits and inner
  /// apostrophes, e.g. `don't` or `mp3`; those are dropped later by the
  /// alphabetic filter.
  #[default]
  Unicode,
  /// Maximal runs of alphabetic characters. `don't` becomes `don` and `t`.
  Alphabetic,
}

/// Splits raw text into word tokens.
///
/// Punctuation and whitespace only separate tokens and are never emitted.
/// Tokens keep their original case.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
  policy: TokenPolicy,
}

impl Tokenizer {
  /// Creates a tokenizer with the given policy.
  pub fn new(policy: TokenPolicy) -> Self {
    Self { policy }
  }

  /// The active policy.
  pub fn policy(&self) -> TokenPolicy {
    self.policy
  }

  /// Tokenize text into words.
  pub fn tokenize(&self, text: &str) -> Vec<Token> {
    match self.policy {
      TokenPolicy::Unicode => text.unicode_words().map(str::to_string).collect(),
      TokenPolicy::Alphabetic => text
        .split(|c: char| !c.is_alphabetic())
        .filter(|run| !run.is_empty())
        .map(str::to_string)
        .collect(),
    }
  }
}

/// Tokenize text into words using Unicode word boundaries.
pub fn tokenize(text: &str) -> Vec<Token> {
  Tokenizer::default().tokenize(text)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tokenize() {
    let text = "Hello, World! This is a test.";
    let tokens = tokenize(text);
    assert_eq!(tokens, vec!["Hello", "World", "This", "is", "a", "test"]);
  }

  #[test]
  fn test_tokenize_edge_cases() {
    assert!(tokenize("").is_empty());
    assert!(tokenize(" \t\n...!?").is_empty());
    assert_eq!(tokenize("undivided"), vec!["undivided"]);
  }

  #[test]
  fn test_tokenize_cyrillic() {
    let tokens = tokenize("Мама мыла раму, и мама устала.");
    assert_eq!(tokens, vec!["Мама", "мыла", "раму", "и", "мама", "устала"]);
  }

  #[test]
  fn test_policies_differ_on_apostrophes_and_digits() {
    let text = "Don't buy 3 mp3s";
    assert_eq!(
      Tokenizer::new(TokenPolicy::Unicode).tokenize(text),
      vec!["Don't", "buy", "3", "mp3s"]
    );
    assert_eq!(
      Tokenizer::new(TokenPolicy::Alphabetic).tokenize(text),
      vec!["Don", "t", "buy", "mp", "s"]
    );
  }

  #[test]
  fn test_arbitrary_symbols_are_separators() {
    let tokens = Tokenizer::new(TokenPolicy::Alphabetic).tokenize("a\u{FFFD}b\u{0}c");
    assert_eq!(tokens, vec!["a", "b", "c"]);
  }
}
