//! Core data types for the lexfreq analysis pipeline.

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::rank::RankedEntry;
use crate::tokenizer::TokenPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Type alias for a word token.
///
/// Tokens are transient: they only live for the duration of one pipeline run
/// and carry no identity beyond their text.
pub type Token = String;

/// A language whose stop-word list and morphology can be loaded.
///
/// Selection is always explicit; the pipeline never guesses the language of
/// the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
  /// English (`en`).
  #[serde(rename = "en", alias = "english")]
  English,
  /// Russian (`ru`).
  #[serde(rename = "ru", alias = "russian")]
  Russian,
}

impl Language {
  /// All languages with built-in support.
  pub const ALL: [Language; 2] = [Language::English, Language::Russian];

  /// The short ISO 639-1 code.
  pub fn code(self) -> &'static str {
    match self {
      Language::English => "en",
      Language::Russian => "ru",
    }
  }

  /// The long name, which is also the file name NLTK uses for its
  /// stop-word lists.
  pub fn name(self) -> &'static str {
    match self {
      Language::English => "english",
      Language::Russian => "russian",
    }
  }

  /// Whether `c` belongs to the alphabet this language is written in.
  pub fn is_native_letter(self, c: char) -> bool {
    match self {
      Language::English => c.is_ascii_alphabetic(),
      Language::Russian => matches!(c, '\u{0400}'..='\u{04FF}'),
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for Language {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "en" | "english" => Ok(Language::English),
      "ru" | "russian" => Ok(Language::Russian),
      other => Err(Error::UnsupportedLanguage(other.to_string())),
    }
  }
}

/// Configuration for a single analysis run.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```json
/// { "top_n": 20, "languages": ["en", "ru"], "normalize": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
  /// How many of the most frequent words to report. Zero is allowed and
  /// yields an empty report.
  #[serde(default = "default_top_n")]
  pub top_n: usize,
  /// Languages whose stop-words are removed (their union) and whose
  /// morphology is used for normalization.
  #[serde(default = "default_languages")]
  pub languages: Vec<Language>,
  /// Whether tokens are reduced to their lemma before counting.
  #[serde(default)]
  pub normalize: bool,
  /// Which characters form a word during tokenization.
  #[serde(default)]
  pub token_policy: TokenPolicy,
}

/// Returns the default number of reported words.
fn default_top_n() -> usize {
  10
}

fn default_languages() -> Vec<Language> {
  vec![Language::English]
}

impl Default for AnalysisConfig {
  fn default() -> Self {
    Self {
      top_n: default_top_n(),
      languages: default_languages(),
      normalize: false,
      token_policy: TokenPolicy::default(),
    }
  }
}

impl AnalysisConfig {
  /// Creates a new `AnalysisConfigBuilder`.
  pub fn builder() -> AnalysisConfigBuilder {
    AnalysisConfigBuilder::default()
  }

  /// Reads a configuration from a JSON file.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
      .map_err(|e| Error::InvalidConfig(format!("cannot read {}: {}", path.display(), e)))?;
    let config: AnalysisConfig = serde_json::from_str(&raw)
      .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
    config.validate()?;
    Ok(config)
  }

  /// Checks the configuration for internal consistency.
  pub fn validate(&self) -> Result<()> {
    if self.languages.is_empty() {
      return Err(Error::InvalidConfig(
        "at least one language must be selected".to_string(),
      ));
    }
    Ok(())
  }

  /// The selected languages in a stable order, without duplicates.
  pub fn unique_languages(&self) -> Vec<Language> {
    let mut seen = Vec::with_capacity(self.languages.len());
    for lang in &self.languages {
      if !seen.contains(lang) {
        seen.push(*lang);
      }
    }
    seen
  }
}

/// A builder for creating `AnalysisConfig` instances.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
  top_n: Option<usize>,
  languages: Vec<Language>,
  normalize: bool,
  token_policy: TokenPolicy,
}

impl AnalysisConfigBuilder {
  /// Sets the number of words to report.
  pub fn top_n(mut self, top_n: usize) -> Self {
    self.top_n = Some(top_n);
    self
  }

  /// Adds a language. Calling this replaces the default of English only.
  pub fn language(mut self, language: Language) -> Self {
    self.languages.push(language);
    self
  }

  /// Enables or disables lemmatization.
  pub fn normalize(mut self, normalize: bool) -> Self {
    self.normalize = normalize;
    self
  }

  /// Sets the tokenization policy.
  pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
    self.token_policy = policy;
    self
  }

  /// Builds the final `AnalysisConfig`.
  pub fn build(self) -> AnalysisConfig {
    AnalysisConfig {
      top_n: self.top_n.unwrap_or_else(default_top_n),
      languages: if self.languages.is_empty() {
        default_languages()
      } else {
        self.languages
      },
      normalize: self.normalize,
      token_policy: self.token_policy,
    }
  }
}

/// The outcome of a complete pipeline run.
///
/// `ranked` is what gets handed to a reporter; the full table is kept so
/// callers can derive further statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analysis {
  /// Counts for every word that survived filtering.
  #[serde(skip)]
  pub table: FrequencyTable,
  /// The most frequent words, highest count first.
  pub ranked: Vec<RankedEntry>,
}

impl Analysis {
  /// Total number of counted words.
  pub fn total_words(&self) -> usize {
    self.table.total()
  }

  /// Number of distinct counted words.
  pub fn unique_words(&self) -> usize {
    self.table.len()
  }

  /// Ratio of distinct words to total words, or 0 for an empty text.
  pub fn lexical_diversity(&self) -> f64 {
    let total = self.total_words();
    if total == 0 {
      0.0
    } else {
      self.unique_words() as f64 / total as f64
    }
  }
}
