//! Top-N selection.

use crate::frequency::FrequencyTable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankedEntry {
  /// The counted word.
  pub token: String,
  /// Its number of occurrences.
  pub count: usize,
}

impl RankedEntry {
  /// Creates a new entry.
  pub fn new(token: impl Into<String>, count: usize) -> Self {
    Self {
      token: token.into(),
      count,
    }
  }
}

impl From<(&str, usize)> for RankedEntry {
  fn from((token, count): (&str, usize)) -> Self {
    Self::new(token, count)
  }
}

/// Ranking order: higher count first, ties broken by ascending token.
///
/// Because tokens are unique within a table this is a total order, so the
/// ranking never depends on hash iteration order.
pub fn ranking_order(a: &RankedEntry, b: &RankedEntry) -> Ordering {
  b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token))
}

/// Returns the `n` most frequent entries of `table`, highest count first.
///
/// Returns every entry when `n` exceeds the number of distinct tokens, and an
/// empty vector when `n` is 0 or the table is empty. For `n1 < n2` the result
/// for `n1` is a prefix of the result for `n2`.
pub fn top_n(table: &FrequencyTable, n: usize) -> Vec<RankedEntry> {
  if n == 0 || table.is_empty() {
    return Vec::new();
  }

  let mut entries: Vec<RankedEntry> = table.iter().map(RankedEntry::from).collect();

  // Partition around the n-th entry first so only the head needs sorting.
  if n < entries.len() {
    entries.select_nth_unstable_by(n - 1, ranking_order);
    entries.truncate(n);
  }
  entries.sort_unstable_by(ranking_order);
  entries
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table(text: &str) -> FrequencyTable {
    text.split_whitespace().map(str::to_string).collect()
  }

  fn pairs(entries: &[RankedEntry]) -> Vec<(&str, usize)> {
    entries.iter().map(|e| (e.token.as_str(), e.count)).collect()
  }

  #[test]
  fn test_orders_by_count_then_token() {
    let t = table("cat sat cat mat ran");
    assert_eq!(
      pairs(&top_n(&t, 3)),
      vec![("cat", 2), ("mat", 1), ("ran", 1)]
    );
  }

  #[test]
  fn test_n_larger_than_table() {
    let t = table("b a b");
    assert_eq!(pairs(&top_n(&t, 100)), vec![("b", 2), ("a", 1)]);
  }

  #[test]
  fn test_zero_and_empty() {
    assert!(top_n(&table("a b c"), 0).is_empty());
    assert!(top_n(&FrequencyTable::new(), 5).is_empty());
  }

  #[test]
  fn test_prefix_property() {
    let t = table("e d c b a a b c d a b a z y x w w");
    let full = top_n(&t, t.len());
    for n in 0..=t.len() {
      assert_eq!(top_n(&t, n), full[..n].to_vec());
    }
    for pair in full.windows(2) {
      assert!(pair[0].count >= pair[1].count);
    }
  }
}
