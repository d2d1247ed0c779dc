//! Language resources: stop-word lists and morphological analyzers.
//!
//! Resources are loaded through a [`ResourceProvider`] exactly once, before
//! any text is processed, and held by a [`Resources`] value for the lifetime
//! of one or more runs. A provider failure is fatal and reported as
//! [`Error::ResourceUnavailable`].

use crate::error::{Error, Result};
use crate::normalizer::{ChainAnalyzer, DictionaryAnalyzer, MorphAnalyzer, Normalizer};
use crate::stopwords::{self, StopWordSet};
use crate::types::{AnalysisConfig, Language};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A trait for sources of language resources.
///
/// The `Send` and `Sync` bounds allow a provider to be shared between
/// threads that set up independent pipelines.
pub trait ResourceProvider: Send + Sync {
  /// Loads the stop-word list for `language`.
  fn stop_words(&self, language: Language) -> Result<Vec<String>>;

  /// Loads the morphological analyzer for `language`.
  fn analyzer(&self, language: Language) -> Result<Box<dyn MorphAnalyzer>>;
}

/// Resources compiled into the binary: stop-word lists from the `stop-words`
/// crate and lemma dictionaries, backed by Snowball stemmers for the forms
/// the dictionaries lack.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinResources;

const BUILTIN_LEMMAS_EN: &str = include_str!("../data/lemmas/en.tsv");
const BUILTIN_LEMMAS_RU: &str = include_str!("../data/lemmas/ru.tsv");

impl BuiltinResources {
  /// The compiled-in `form<TAB>lemma` dictionary for `language`.
  pub fn dictionary(language: Language) -> Result<DictionaryAnalyzer> {
    let resource = format!("lemmas/{}", language.code());
    let data = match language {
      Language::English => BUILTIN_LEMMAS_EN,
      Language::Russian => BUILTIN_LEMMAS_RU,
    };
    DictionaryAnalyzer::from_tsv(resource.clone(), data.as_bytes())
      .map_err(|e| Error::resource(resource, e))
  }

  #[cfg(feature = "snowball")]
  fn with_stemmer(language: Language, dictionary: DictionaryAnalyzer) -> Box<dyn MorphAnalyzer> {
    Box::new(ChainAnalyzer::new(vec![
      Box::new(dictionary) as Box<dyn MorphAnalyzer>,
      Box::new(crate::normalizer::SnowballAnalyzer::new(language)),
    ]))
  }

  #[cfg(not(feature = "snowball"))]
  fn with_stemmer(_language: Language, dictionary: DictionaryAnalyzer) -> Box<dyn MorphAnalyzer> {
    Box::new(dictionary)
  }
}

impl ResourceProvider for BuiltinResources {
  #[cfg(feature = "builtin-stopwords")]
  fn stop_words(&self, language: Language) -> Result<Vec<String>> {
    Ok(stopwords::builtin(language))
  }

  #[cfg(not(feature = "builtin-stopwords"))]
  fn stop_words(&self, language: Language) -> Result<Vec<String>> {
    Err(Error::resource(
      format!("stopwords/{}", language.name()),
      "built-in stop-word lists are not compiled in (enable the `builtin-stopwords` feature)",
    ))
  }

  fn analyzer(&self, language: Language) -> Result<Box<dyn MorphAnalyzer>> {
    let dictionary = Self::dictionary(language)?;
    Ok(Self::with_stemmer(language, dictionary))
  }
}

/// Resources read from a directory laid out like an NLTK data folder:
///
/// ```text
/// <root>/stopwords/english     one stop-word per line
/// <root>/stopwords/russian
/// <root>/lemmas/en.tsv         form<TAB>lemma per line
/// <root>/lemmas/ru.tsv
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryResources {
  root: PathBuf,
}

impl DirectoryResources {
  /// Creates a provider rooted at `root`.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  /// The data directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn open(&self, resource: &str, path: &Path) -> Result<BufReader<File>> {
    File::open(path)
      .map(BufReader::new)
      .map_err(|e| Error::resource(resource, format!("{}: {}", path.display(), e)))
  }
}

impl ResourceProvider for DirectoryResources {
  fn stop_words(&self, language: Language) -> Result<Vec<String>> {
    let resource = format!("stopwords/{}", language.name());
    let path = self.root.join("stopwords").join(language.name());
    let reader = self.open(&resource, &path)?;

    let mut words = Vec::new();
    for line in reader.lines() {
      let line = line.map_err(|e| Error::resource(&resource, e))?;
      let word = line.trim();
      if !word.is_empty() {
        words.push(word.to_string());
      }
    }
    Ok(words)
  }

  fn analyzer(&self, language: Language) -> Result<Box<dyn MorphAnalyzer>> {
    let resource = format!("lemmas/{}", language.code());
    let path = self
      .root
      .join("lemmas")
      .join(format!("{}.tsv", language.code()));
    let reader = self.open(&resource, &path)?;
    let dict = DictionaryAnalyzer::from_tsv(resource.clone(), reader)
      .map_err(|e| Error::resource(&resource, e))?;
    tracing::debug!(dictionary = %resource, forms = dict.len(), "loaded lemma dictionary");
    Ok(Box::new(dict))
  }
}

/// In-memory resources, handy for tests and for embedding custom lists.
#[derive(Debug, Default, Clone)]
pub struct StaticResources {
  stop_words: HashMap<Language, Vec<String>>,
  lemmas: HashMap<Language, DictionaryAnalyzer>,
}

impl StaticResources {
  /// Creates a provider with no resources.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the stop-word list for `language`.
  pub fn stop_words<I, S>(mut self, language: Language, words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self
      .stop_words
      .insert(language, words.into_iter().map(Into::into).collect());
    self
  }

  /// Sets the lemma dictionary for `language`.
  pub fn lemmas(mut self, language: Language, dictionary: DictionaryAnalyzer) -> Self {
    self.lemmas.insert(language, dictionary);
    self
  }
}

impl ResourceProvider for StaticResources {
  fn stop_words(&self, language: Language) -> Result<Vec<String>> {
    self
      .stop_words
      .get(&language)
      .cloned()
      .ok_or_else(|| Error::resource(format!("stopwords/{}", language.name()), "not provided"))
  }

  fn analyzer(&self, language: Language) -> Result<Box<dyn MorphAnalyzer>> {
    self
      .lemmas
      .get(&language)
      .map(|dict| Box::new(dict.clone()) as Box<dyn MorphAnalyzer>)
      .ok_or_else(|| Error::resource(format!("lemmas/{}", language.code()), "not provided"))
  }
}

/// Everything a pipeline needs besides the text, loaded up front.
///
/// Acquisition either succeeds completely or fails before any text is
/// touched. The loaded resources are read-only and can be reused for many
/// runs; they are released when this value is dropped.
#[derive(Debug, Clone)]
pub struct Resources {
  languages: Vec<Language>,
  stop_words: StopWordSet,
  normalizer: Normalizer,
}

impl Resources {
  /// Creates resources from already-loaded parts.
  pub fn new(stop_words: StopWordSet, normalizer: Normalizer) -> Self {
    Self {
      languages: Vec::new(),
      stop_words,
      normalizer,
    }
  }

  /// Loads the stop-words and, if `config.normalize` is set, the analyzers
  /// for every configured language.
  pub fn acquire(provider: &dyn ResourceProvider, config: &AnalysisConfig) -> Result<Self> {
    config.validate()?;
    let languages = config.unique_languages();

    let stop_words = stopwords::union_of(&languages, |lang| provider.stop_words(lang))?;

    let normalizer = if config.normalize {
      let mut analyzers = languages
        .iter()
        .map(|&lang| provider.analyzer(lang))
        .collect::<Result<Vec<_>>>()?;
      let analyzer: Arc<dyn MorphAnalyzer> = if analyzers.len() == 1 {
        Arc::from(analyzers.remove(0))
      } else {
        Arc::new(ChainAnalyzer::new(analyzers))
      };
      Normalizer::Morphological(analyzer)
    } else {
      Normalizer::Identity
    };

    tracing::info!(
      languages = ?languages,
      stop_words = stop_words.len(),
      normalizer = ?normalizer,
      "acquired language resources"
    );

    Ok(Self {
      languages,
      stop_words,
      normalizer,
    })
  }

  /// The languages these resources were loaded for.
  pub fn languages(&self) -> &[Language] {
    &self.languages
  }

  /// The union of the loaded stop-word lists.
  pub fn stop_words(&self) -> &StopWordSet {
    &self.stop_words
  }

  /// The normalizer, identity if normalization was not requested.
  pub fn normalizer(&self) -> &Normalizer {
    &self.normalizer
  }
}

impl Drop for Resources {
  fn drop(&mut self) {
    tracing::info!(languages = ?self.languages, "released language resources");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn test_static_resources_union() {
    let provider = StaticResources::new()
      .stop_words(Language::English, ["the", "on"])
      .stop_words(Language::Russian, ["и"]);
    let config = AnalysisConfig::builder()
      .language(Language::English)
      .language(Language::Russian)
      .build();
    let resources = Resources::acquire(&provider, &config).unwrap();
    assert_eq!(resources.stop_words().len(), 3);
    assert!(resources.normalizer().is_identity());
    assert_eq!(resources.languages(), &[Language::English, Language::Russian]);
  }

  #[test]
  fn test_missing_stop_words_abort_acquisition() {
    let provider = StaticResources::new().stop_words(Language::English, ["the"]);
    let config = AnalysisConfig::builder().language(Language::Russian).build();
    let err = Resources::acquire(&provider, &config).unwrap_err();
    assert!(
      matches!(&err, Error::ResourceUnavailable { resource, .. } if resource == "stopwords/russian")
    );
  }

  #[test]
  fn test_missing_analyzer_only_matters_when_normalizing() {
    let provider = StaticResources::new().stop_words(Language::English, ["the"]);
    let plain = AnalysisConfig::default();
    assert!(Resources::acquire(&provider, &plain).is_ok());

    let normalizing = AnalysisConfig::builder().normalize(true).build();
    let err = Resources::acquire(&provider, &normalizing).unwrap_err();
    assert!(matches!(err, Error::ResourceUnavailable { .. }));
  }

  #[test]
  fn test_directory_resources() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("stopwords")).unwrap();
    fs::create_dir_all(dir.path().join("lemmas")).unwrap();
    fs::write(dir.path().join("stopwords/english"), "the\n\non\n  a  \n").unwrap();
    fs::write(dir.path().join("lemmas/en.tsv"), "mice\tmouse\n").unwrap();

    let provider = DirectoryResources::new(dir.path());
    assert_eq!(
      provider.stop_words(Language::English).unwrap(),
      vec!["the", "on", "a"]
    );
    assert_eq!(
      provider.analyzer(Language::English).unwrap().lemmas("mice"),
      vec!["mouse"]
    );

    let err = provider.stop_words(Language::Russian).unwrap_err();
    assert!(err.to_string().contains("stopwords/russian"));
    assert!(provider.analyzer(Language::Russian).is_err());
  }

  #[cfg(all(feature = "builtin-stopwords", feature = "snowball"))]
  #[test]
  fn test_builtin_resources() {
    let config = AnalysisConfig::builder()
      .language(Language::English)
      .language(Language::Russian)
      .normalize(true)
      .build();
    let resources = Resources::acquire(&BuiltinResources, &config).unwrap();
    assert!(resources.stop_words().contains("the"));
    assert!(resources.stop_words().contains("и"));
    let normalizer = resources.normalizer();
    assert_eq!(normalizer.normalize("running"), "run");
    assert_eq!(normalizer.normalize("was"), "be");
    assert_eq!(normalizer.normalize("studies"), "study");
    assert_eq!(normalizer.normalize("geese"), "goose");
    assert_eq!(normalizer.normalize("кошки"), "кошка");
    assert_eq!(normalizer.normalize("сидела"), "сидеть");
  }

  #[test]
  fn test_builtin_dictionaries_parse() {
    for language in Language::ALL {
      let dict = BuiltinResources::dictionary(language).unwrap();
      assert!(dict.len() > 100);
    }
    let en = BuiltinResources::dictionary(Language::English).unwrap();
    assert_eq!(en.lemmas("flies"), vec!["fly"]);
    assert_eq!(en.lemmas("mice"), vec!["mouse"]);
    let ru = BuiltinResources::dictionary(Language::Russian).unwrap();
    assert_eq!(ru.lemmas("окна"), vec!["окно"]);
  }
}
