//! Frequency aggregation.

use crate::types::Token;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A mapping from word to the number of times it occurred.
///
/// Only the counts are meaningful; iteration order is unspecified. Use
/// [`crate::rank::top_n`] for an ordered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
  counts: HashMap<Token, usize>,
  total: usize,
}

impl FrequencyTable {
  /// Creates an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Counts a token sequence in a single pass.
  pub fn from_tokens<I>(tokens: I) -> Self
  where
    I: IntoIterator<Item = Token>,
  {
    let mut table = Self::new();
    for token in tokens {
      table.add(token);
    }
    table
  }

  /// Counts a token sequence by splitting it across the rayon thread pool and
  /// merging the partial tables. The result equals [`FrequencyTable::from_tokens`].
  #[cfg(feature = "parallel")]
  pub fn from_tokens_parallel(tokens: Vec<Token>) -> Self {
    tokens
      .into_par_iter()
      .fold(FrequencyTable::new, |mut table, token| {
        table.add(token);
        table
      })
      .reduce(FrequencyTable::new, FrequencyTable::merge)
  }

  /// Records one occurrence of `token`.
  pub fn add(&mut self, token: Token) {
    *self.counts.entry(token).or_insert(0) += 1;
    self.total += 1;
  }

  /// Combines two tables by summing their counts. The operation is
  /// commutative and associative.
  pub fn merge(mut self, other: FrequencyTable) -> FrequencyTable {
    if self.counts.len() < other.counts.len() {
      return other.merge(self);
    }
    for (token, count) in other.counts {
      *self.counts.entry(token).or_insert(0) += count;
    }
    self.total += other.total;
    self
  }

  /// The count for `token`, or 0 if it never occurred.
  pub fn get(&self, token: &str) -> usize {
    self.counts.get(token).copied().unwrap_or(0)
  }

  /// Whether `token` occurred at least once.
  pub fn contains(&self, token: &str) -> bool {
    self.counts.contains_key(token)
  }

  /// Number of distinct tokens.
  pub fn len(&self) -> usize {
    self.counts.len()
  }

  /// Whether no token was counted.
  pub fn is_empty(&self) -> bool {
    self.counts.is_empty()
  }

  /// Sum of all counts.
  pub fn total(&self) -> usize {
    self.total
  }

  /// Iterate over `(token, count)` pairs in arbitrary order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
    self.counts.iter().map(|(t, &c)| (t.as_str(), c))
  }
}

impl FromIterator<Token> for FrequencyTable {
  fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
    Self::from_tokens(iter)
  }
}

impl Extend<Token> for FrequencyTable {
  fn extend<I: IntoIterator<Item = Token>>(&mut self, iter: I) {
    for token in iter {
      self.add(token);
    }
  }
}
