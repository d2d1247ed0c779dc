//! Morphological normalization (lemmatization).
//!
//! This module defines the [`MorphAnalyzer`] trait, a common interface for
//! anything that can map a word form to its dictionary form, and the
//! [`Normalizer`] that applies one to a token stream. When normalization is
//! disabled the normalizer is the identity transform.
//!
//! Analyzers may return several candidate lemmas. The normalizer always takes
//! the first one, so the result for a given word never changes between calls.
//! Words without a lemma may still be grouped by a stem; within one run each
//! stem group is shown under a real word (see [`LemmaCache::stem_labels`]).
//! A word with neither keeps its surface form.

use crate::filter::fold_token;
use crate::types::Token;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A trait for providers that can find the lemma of a word.
///
/// The `Send` and `Sync` bounds are required so that one analyzer can be
/// shared by several pipeline runs, possibly on different threads.
pub trait MorphAnalyzer: Send + Sync {
  /// A short name used in log messages.
  fn name(&self) -> &str;

  /// Candidate lemmas for a lowercase word, best guess first.
  ///
  /// An empty vector means the word is unknown to this analyzer.
  fn lemmas(&self, word: &str) -> Vec<String>;

  /// A key shared by the inflected forms of a word, consulted only when no
  /// analyzer has a lemma for it. Stems need not be words.
  fn stem(&self, _word: &str) -> Option<String> {
    None
  }
}

/// Tries several analyzers in order and returns the candidates of the first
/// one that knows the word. Stems are taken from the first analyzer that has one.
pub struct ChainAnalyzer {
  name: String,
  analyzers: Vec<Box<dyn MorphAnalyzer>>,
}

impl ChainAnalyzer {
  /// Creates a chain from the given analyzers.
  pub fn new(analyzers: Vec<Box<dyn MorphAnalyzer>>) -> Self {
    let name = analyzers
      .iter()
      .map(|a| a.name())
      .collect::<Vec<_>>()
      .join("+");
    Self { name, analyzers }
  }
}

impl MorphAnalyzer for ChainAnalyzer {
  fn name(&self) -> &str {
    &self.name
  }

  fn lemmas(&self, word: &str) -> Vec<String> {
    self
      .analyzers
      .iter()
      .map(|a| a.lemmas(word))
      .find(|candidates| !candidates.is_empty())
      .unwrap_or_default()
  }

  fn stem(&self, word: &str) -> Option<String> {
    self.analyzers.iter().find_map(|a| a.stem(word))
  }
}

/// A dictionary-backed analyzer.
///
/// The dictionary maps word forms to one or more lemmas. Lemmas listed first
/// rank higher.
#[derive(Debug, Clone, Default)]
pub struct DictionaryAnalyzer {
  name: String,
  entries: HashMap<String, Vec<String>>,
}

impl DictionaryAnalyzer {
  /// Creates an empty dictionary with the given name.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      entries: HashMap::new(),
    }
  }

  /// Adds a `form -> lemma` pair. Both sides are lowercased. A pair that is
  /// already present is ignored.
  pub fn insert(&mut self, form: &str, lemma: &str) {
    let lemma = lemma.trim().to_lowercase();
    let candidates = self.entries.entry(form.trim().to_lowercase()).or_default();
    if !candidates.contains(&lemma) {
      candidates.push(lemma);
    }
  }

  /// Adds a pair in a chained manner.
  pub fn with(mut self, form: &str, lemma: &str) -> Self {
    self.insert(form, lemma);
    self
  }

  /// Reads a tab-separated dictionary with one `form<TAB>lemma` pair per
  /// line. Blank lines and lines starting with `#` are skipped; malformed
  /// lines are skipped with a warning.
  pub fn from_tsv<R: BufRead>(name: impl Into<String>, reader: R) -> std::io::Result<Self> {
    let mut dict = Self::new(name);
    for (number, line) in reader.lines().enumerate() {
      let line = line?;
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      match line.split_once('\t') {
        Some((form, lemma)) if !form.trim().is_empty() && !lemma.trim().is_empty() => {
          dict.insert(form, lemma);
        }
        _ => {
          tracing::warn!(dictionary = %dict.name, line = number + 1, "skipping malformed lemma entry");
        }
      }
    }
    Ok(dict)
  }

  /// Number of distinct word forms.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the dictionary has no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl MorphAnalyzer for DictionaryAnalyzer {
  fn name(&self) -> &str {
    &self.name
  }

  fn lemmas(&self, word: &str) -> Vec<String> {
    self.entries.get(word).cloned().unwrap_or_default()
  }
}

/// Groups inflected forms by their Snowball stem.
///
/// A stemmer knows no lemmas, so it only ever answers [`MorphAnalyzer::stem`]
/// and is meant to be chained after a dictionary. It only answers for words
/// written in its language's alphabet, so that chaining an English and a
/// Russian analyzer routes each word to the right stemmer.
#[cfg(feature = "snowball")]
pub struct SnowballAnalyzer {
  language: crate::types::Language,
  name: String,
  stemmer: rust_stemmers::Stemmer,
}

#[cfg(feature = "snowball")]
impl SnowballAnalyzer {
  /// Creates a stemmer for `language`.
  pub fn new(language: crate::types::Language) -> Self {
    use crate::types::Language;
    use rust_stemmers::{Algorithm, Stemmer};

    let algorithm = match language {
      Language::English => Algorithm::English,
      Language::Russian => Algorithm::Russian,
    };
    Self {
      language,
      name: format!("snowball/{}", language.code()),
      stemmer: Stemmer::create(algorithm),
    }
  }
}

#[cfg(feature = "snowball")]
impl MorphAnalyzer for SnowballAnalyzer {
  fn name(&self) -> &str {
    &self.name
  }

  fn lemmas(&self, _word: &str) -> Vec<String> {
    Vec::new()
  }

  fn stem(&self, word: &str) -> Option<String> {
    if word.is_empty() || !word.chars().all(|c| self.language.is_native_letter(c)) {
      return None;
    }
    Some(self.stemmer.stem(word).into_owned())
  }
}

/// What the analyzer made of one distinct word.
#[derive(Debug, Clone)]
struct CacheEntry {
  /// Lemma, stem or the unchanged word.
  token: Token,
  /// `token` is a stem and still needs a label.
  stemmed: bool,
  /// Occurrences of the word so far.
  seen: usize,
}

/// Memoizes lemmas for the duration of one pipeline run.
///
/// Natural text repeats words heavily, so each distinct word is analyzed once.
/// The cache also counts how often each word occurred, which decides the
/// labels of stem groups.
#[cfg(not(feature = "parallel"))]
#[derive(Debug, Default)]
pub struct LemmaCache {
  entries: std::cell::RefCell<HashMap<String, CacheEntry>>,
  misses: AtomicUsize,
}

/// Memoizes lemmas for the duration of one pipeline run.
///
/// Natural text repeats words heavily, so each distinct word is analyzed once.
/// With the `parallel` feature the cache is shared between worker threads.
#[cfg(feature = "parallel")]
#[derive(Debug, Default)]
pub struct LemmaCache {
  entries: dashmap::DashMap<String, CacheEntry>,
  misses: AtomicUsize,
}

impl LemmaCache {
  /// Creates an empty cache.
  pub fn new() -> Self {
    Self::default()
  }

  #[cfg(not(feature = "parallel"))]
  fn resolve_with(&self, word: &str, analyze: impl FnOnce() -> (Token, bool)) -> Token {
    let mut entries = self.entries.borrow_mut();
    if let Some(entry) = entries.get_mut(word) {
      entry.seen += 1;
      return entry.token.clone();
    }
    let (token, stemmed) = analyze();
    entries.insert(
      word.to_string(),
      CacheEntry {
        token: token.clone(),
        stemmed,
        seen: 1,
      },
    );
    token
  }

  #[cfg(feature = "parallel")]
  fn resolve_with(&self, word: &str, analyze: impl FnOnce() -> (Token, bool)) -> Token {
    let mut entry = self.entries.entry(word.to_string()).or_insert_with(|| {
      let (token, stemmed) = analyze();
      CacheEntry {
        token,
        stemmed,
        seen: 0,
      }
    });
    entry.seen += 1;
    entry.token.clone()
  }

  #[cfg(not(feature = "parallel"))]
  fn snapshot(&self) -> Vec<(String, CacheEntry)> {
    self
      .entries
      .borrow()
      .iter()
      .map(|(word, entry)| (word.clone(), entry.clone()))
      .collect()
  }

  #[cfg(feature = "parallel")]
  fn snapshot(&self) -> Vec<(String, CacheEntry)> {
    self
      .entries
      .iter()
      .map(|e| (e.key().clone(), e.value().clone()))
      .collect()
  }

  #[cfg(not(feature = "parallel"))]
  fn entry(&self, word: &str) -> Option<CacheEntry> {
    self.entries.borrow().get(word).cloned()
  }

  #[cfg(feature = "parallel")]
  fn entry(&self, word: &str) -> Option<CacheEntry> {
    self.entries.get(word).map(|e| e.value().clone())
  }

  /// Number of distinct words analyzed so far.
  #[cfg(not(feature = "parallel"))]
  pub fn len(&self) -> usize {
    self.entries.borrow().len()
  }

  /// Number of distinct words analyzed so far.
  #[cfg(feature = "parallel")]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether nothing has been analyzed yet.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Number of distinct words that had neither a lemma nor a stem.
  pub fn misses(&self) -> usize {
    self.misses.load(Ordering::Relaxed)
  }

  /// Picks a readable label for every stem seen so far.
  ///
  /// A stem that is itself one of the run's words (a surface form, a lemma or
  /// a kept unknown word) labels its group. Otherwise the group is labelled
  /// with its most frequent surface form, ties going to the alphabetically
  /// first one.
  pub fn stem_labels(&self) -> HashMap<Token, Token> {
    let entries = self.snapshot();
    let words: HashSet<&str> = entries
      .iter()
      .filter(|(_, e)| !e.stemmed)
      .map(|(_, e)| e.token.as_str())
      .collect();

    let mut groups: HashMap<&str, Vec<(&str, usize)>> = HashMap::new();
    for (word, entry) in entries.iter().filter(|(_, e)| e.stemmed) {
      groups
        .entry(entry.token.as_str())
        .or_default()
        .push((word.as_str(), entry.seen));
    }

    groups
      .into_iter()
      .filter_map(|(stem, forms)| {
        let label = if words.contains(stem) || forms.iter().any(|(form, _)| *form == stem) {
          stem
        } else {
          forms
            .iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(form, _)| *form)?
        };
        Some((stem.to_string(), label.to_string()))
      })
      .collect()
  }

  /// The final form of a word resolved earlier in this run: its lemma, the
  /// label of its stem group, or the word itself.
  pub fn display_form(&self, word: Token, labels: &HashMap<Token, Token>) -> Token {
    match self.entry(&word) {
      Some(entry) if entry.stemmed => labels.get(&entry.token).cloned().unwrap_or(entry.token),
      Some(entry) => entry.token,
      None => word,
    }
  }
}

/// What an analyzer found for a word.
enum Found {
  Lemma(Token),
  Stem(Token),
}

/// Maps tokens to their canonical form.
#[derive(Clone, Default)]
pub enum Normalizer {
  /// Tokens pass through unchanged.
  #[default]
  Identity,
  /// Tokens are replaced by the first-ranked lemma of the analyzer.
  Morphological(Arc<dyn MorphAnalyzer>),
}

impl std::fmt::Debug for Normalizer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Normalizer::Identity => f.write_str("Identity"),
      Normalizer::Morphological(a) => f.debug_tuple("Morphological").field(&a.name()).finish(),
    }
  }
}

impl Normalizer {
  /// Creates a normalizer backed by `analyzer`.
  pub fn morphological(analyzer: impl MorphAnalyzer + 'static) -> Self {
    Normalizer::Morphological(Arc::new(analyzer))
  }

  /// Whether this normalizer changes anything.
  pub fn is_identity(&self) -> bool {
    matches!(self, Normalizer::Identity)
  }

  /// Returns the lemma of a single lowercase alphabetic token, or its stem
  /// when only a stemmer knows it.
  ///
  /// Unknown words, and candidates that are not alphabetic words themselves,
  /// yield the token unchanged. Stems are returned raw; use
  /// [`Normalizer::normalize_all`] to get labelled groups.
  pub fn normalize(&self, token: &str) -> Token {
    match self.analyze(token) {
      Some(Found::Lemma(lemma)) | Some(Found::Stem(lemma)) => lemma,
      None => token.to_string(),
    }
  }

  fn analyze(&self, token: &str) -> Option<Found> {
    match self {
      Normalizer::Identity => None,
      Normalizer::Morphological(analyzer) => {
        let lemma = analyzer
          .lemmas(token)
          .into_iter()
          .next()
          .and_then(|candidate| fold_token(&candidate));
        match lemma {
          Some(lemma) => Some(Found::Lemma(lemma)),
          None => analyzer
            .stem(token)
            .and_then(|stem| fold_token(&stem))
            .map(Found::Stem),
        }
      }
    }
  }

  /// Analyzes one token through `cache` and counts the occurrence. Returns
  /// the lemma, the raw stem or the token itself.
  pub fn resolve(&self, token: &str, cache: &LemmaCache) -> Token {
    if self.is_identity() {
      return token.to_string();
    }
    cache.resolve_with(token, || match self.analyze(token) {
      Some(Found::Lemma(lemma)) => (lemma, false),
      Some(Found::Stem(stem)) => (stem, true),
      None => {
        cache.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(word = %token, "no lemma found, keeping surface form");
        (token.to_string(), false)
      }
    })
  }

  /// Normalizes a token sequence, preserving order.
  ///
  /// Every token is resolved first, so stem groups are labelled with
  /// knowledge of the whole sequence.
  pub fn normalize_all(&self, tokens: Vec<Token>, cache: &LemmaCache) -> Vec<Token> {
    if self.is_identity() {
      return tokens;
    }
    for token in &tokens {
      self.resolve(token, cache);
    }
    let labels = cache.stem_labels();
    tokens
      .into_iter()
      .map(|t| cache.display_form(t, &labels))
      .collect()
  }
}
