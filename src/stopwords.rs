//! Stop-word sets and filtering.
//!
//! A [`StopWordSet`] is built once per run, usually as the union of several
//! language lists, and is immutable afterwards. It is cheap to clone and safe
//! to share between threads and between independent runs.

use crate::types::{Language, Token};
use std::collections::HashSet;
use std::sync::Arc;

/// An immutable set of lowercase stop-words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWordSet {
  words: Arc<HashSet<String>>,
}

impl StopWordSet {
  /// Create an empty set (no filtering).
  pub fn empty() -> Self {
    Self::default()
  }

  /// Create a set from a list of words. Words are trimmed and lowercased;
  /// blank entries are ignored.
  pub fn from_words<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let words = words
      .into_iter()
      .map(|w| w.as_ref().trim().to_lowercase())
      .filter(|w| !w.is_empty())
      .collect();
    Self {
      words: Arc::new(words),
    }
  }

  /// Returns the union of `self` and `other`.
  pub fn union(&self, other: &StopWordSet) -> StopWordSet {
    if other.is_empty() {
      return self.clone();
    }
    if self.is_empty() {
      return other.clone();
    }
    let words = self.words.union(&other.words).cloned().collect();
    Self {
      words: Arc::new(words),
    }
  }

  /// Check if a word is a stop-word. The word must already be lowercase.
  pub fn contains(&self, word: &str) -> bool {
    self.words.contains(word)
  }

  /// Get the number of stop-words in the set.
  pub fn len(&self) -> usize {
    self.words.len()
  }

  /// Check if the set is empty.
  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  /// Iterate over the words in arbitrary order.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.words.iter().map(String::as_str)
  }

  /// Remove stop-words from a token sequence, preserving order.
  pub fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
    if self.is_empty() {
      return tokens;
    }
    tokens.into_iter().filter(|t| !self.contains(t)).collect()
  }
}

impl FromIterator<String> for StopWordSet {
  fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
    Self::from_words(iter)
  }
}

/// Load the NLTK stop-word list bundled with the `stop-words` crate.
///
/// These lists hold grammatical words only (179 for English), not common
/// content words.
#[cfg(feature = "builtin-stopwords")]
pub fn builtin(language: Language) -> Vec<String> {
  use stop_words::{get, LANGUAGE};

  let lang = match language {
    Language::English => LANGUAGE::English,
    Language::Russian => LANGUAGE::Russian,
  };
  get(lang).iter().map(|s| s.to_string()).collect()
}

/// Builds the union of several language lists with `load`.
pub fn union_of<F, E>(languages: &[Language], mut load: F) -> Result<StopWordSet, E>
where
  F: FnMut(Language) -> Result<Vec<String>, E>,
{
  languages.iter().try_fold(StopWordSet::empty(), |acc, &lang| {
    let words = load(lang)?;
    tracing::debug!(language = %lang, words = words.len(), "loaded stop-words");
    Ok(acc.union(&StopWordSet::from_words(words)))
  })
}
