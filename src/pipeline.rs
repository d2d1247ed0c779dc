//! The analysis pipeline that turns raw text into ranked word counts.

use crate::error::Result;
#[cfg(not(feature = "parallel"))]
use crate::filter::fold_alphabetic;
#[cfg(feature = "parallel")]
use crate::filter::fold_token;
use crate::frequency::FrequencyTable;
use crate::normalizer::{LemmaCache, Normalizer};
use crate::observer::PipelineObserver;
use crate::rank::{top_n, RankedEntry};
use crate::resources::{ResourceProvider, Resources};
use crate::stopwords::StopWordSet;
use crate::tokenizer::{TokenPolicy, Tokenizer};
use crate::types::{Analysis, AnalysisConfig, Token};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The states a pipeline run moves through, in order.
///
/// Every transition is a pure function of the previous state and the fixed
/// pipeline configuration. `Normalized` is a passthrough when normalization
/// is disabled; no other state is ever skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
  /// The text is in memory.
  Loaded,
  /// The text has been split into tokens.
  Tokenized,
  /// Non-alphabetic tokens and stop-words have been removed, the rest lowercased.
  Filtered,
  /// Tokens have been replaced by their lemmas.
  Normalized,
  /// Tokens have been counted.
  Aggregated,
  /// The top entries have been selected. This is the terminal state.
  Ranked,
}

/// Computes word-frequency profiles.
///
/// A `Pipeline` owns read-only resources only, so one instance can analyze
/// any number of texts, including concurrently from several threads.
///
/// Create a `Pipeline` with [`Pipeline::builder`] or, from loaded
/// [`Resources`], with [`Pipeline::from_resources`].
///
/// # Examples
///
/// ```rust
/// use lexfreq::prelude::*;
///
/// let pipeline = Pipeline::builder()
///     .stop_words(StopWordSet::from_words(["the", "on"]))
///     .top_n(3)
///     .build();
///
/// let ranked = pipeline.run("The cat sat on the mat. The cat ran.");
///
/// assert_eq!(ranked[0], RankedEntry::new("cat", 2));
/// assert_eq!(ranked[1], RankedEntry::new("mat", 1));
/// assert_eq!(ranked[2], RankedEntry::new("ran", 1));
/// ```
pub struct Pipeline {
  tokenizer: Tokenizer,
  stop_words: StopWordSet,
  normalizer: Normalizer,
  top_n: usize,
  observers: Vec<Box<dyn PipelineObserver>>,
}

impl Pipeline {
  /// Creates a new `PipelineBuilder`.
  pub fn builder() -> PipelineBuilder {
    PipelineBuilder::new()
  }

  /// Creates a pipeline from acquired resources and a configuration.
  pub fn from_resources(resources: &Resources, config: &AnalysisConfig) -> Self {
    Self::builder()
      .token_policy(config.token_policy)
      .stop_words(resources.stop_words().clone())
      .normalizer(resources.normalizer().clone())
      .top_n(config.top_n)
      .build()
  }

  /// The number of entries a run reports.
  pub fn top_n(&self) -> usize {
    self.top_n
  }

  /// Runs the pipeline and returns only the ranking.
  pub fn run(&self, text: &str) -> Vec<RankedEntry> {
    self.analyze(text).ranked
  }

  /// Runs every stage over `text`.
  ///
  /// ## Stages
  ///
  /// 1. **Tokenize**: split the text into words with the configured [`TokenPolicy`].
  /// 2. **Filter**: keep alphabetic tokens, lowercase them and drop stop-words.
  /// 3. **Normalize**: replace each token by its lemma, memoized per run.
  ///    Words only a stemmer knows are grouped under one of their forms.
  ///    Lemmas that are stop-words are dropped as well.
  /// 4. **Aggregate**: count every remaining token.
  /// 5. **Rank**: select the `top_n` most frequent tokens, ties broken alphabetically.
  ///
  /// With the `parallel` feature, stages 2 to 4 are spread over the rayon
  /// thread pool; the result is identical to a sequential run.
  pub fn analyze(&self, text: &str) -> Analysis {
    self.enter(Stage::Loaded);

    let tokens = self.tokenizer.tokenize(text);
    self.enter(Stage::Tokenized);
    self.notify(|o| o.after_tokenize(&tokens));

    let folded = Self::fold(tokens);
    self.notify(|o| o.after_fold(&folded));
    let filtered = self.stop_words.filter(folded);
    self.enter(Stage::Filtered);
    self.notify(|o| o.after_filter(&filtered));

    let cache = LemmaCache::new();
    let mut normalized = self.normalize(filtered, &cache);
    if !self.normalizer.is_identity() {
      // A lemma may itself be a stop-word ("was" -> "be").
      normalized = self.stop_words.filter(normalized);
    }
    self.enter(Stage::Normalized);
    self.notify(|o| o.after_normalize(&normalized));
    if !self.normalizer.is_identity() {
      tracing::debug!(
        distinct = cache.len(),
        unknown = cache.misses(),
        "normalized tokens"
      );
    }

    let table = Self::aggregate(normalized);
    self.enter(Stage::Aggregated);
    self.notify(|o| o.after_aggregate(&table));

    let ranked = top_n(&table, self.top_n);
    self.enter(Stage::Ranked);
    self.notify(|o| o.after_rank(&ranked));

    Analysis { table, ranked }
  }

  fn enter(&self, stage: Stage) {
    self.notify(|o| o.on_stage(stage));
  }

  fn notify(&self, hook: impl Fn(&dyn PipelineObserver)) {
    for observer in &self.observers {
      hook(observer.as_ref());
    }
  }

  #[cfg(not(feature = "parallel"))]
  fn fold(tokens: Vec<Token>) -> Vec<Token> {
    fold_alphabetic(tokens)
  }

  #[cfg(feature = "parallel")]
  fn fold(tokens: Vec<Token>) -> Vec<Token> {
    // Collecting an indexed parallel iterator keeps the token order.
    tokens
      .into_par_iter()
      .filter_map(|token| fold_token(&token))
      .collect()
  }

  #[cfg(not(feature = "parallel"))]
  fn normalize(&self, tokens: Vec<Token>, cache: &LemmaCache) -> Vec<Token> {
    self.normalizer.normalize_all(tokens, cache)
  }

  #[cfg(feature = "parallel")]
  fn normalize(&self, tokens: Vec<Token>, cache: &LemmaCache) -> Vec<Token> {
    if self.normalizer.is_identity() {
      return tokens;
    }
    tokens.par_iter().for_each(|token| {
      self.normalizer.resolve(token, cache);
    });
    let labels = cache.stem_labels();
    tokens
      .into_par_iter()
      .map(|token| cache.display_form(token, &labels))
      .collect()
  }

  #[cfg(not(feature = "parallel"))]
  fn aggregate(tokens: Vec<Token>) -> FrequencyTable {
    FrequencyTable::from_tokens(tokens)
  }

  #[cfg(feature = "parallel")]
  fn aggregate(tokens: Vec<Token>) -> FrequencyTable {
    FrequencyTable::from_tokens_parallel(tokens)
  }
}

/// A builder for creating `Pipeline` instances.
///
/// Every setting is optional: the default pipeline uses Unicode word
/// boundaries, removes no stop-words, does not normalize and reports the top
/// 10 words.
#[derive(Default)]
pub struct PipelineBuilder {
  token_policy: TokenPolicy,
  stop_words: Option<StopWordSet>,
  normalizer: Normalizer,
  top_n: Option<usize>,
  observers: Vec<Box<dyn PipelineObserver>>,
}

impl PipelineBuilder {
  /// Creates a new, empty `PipelineBuilder`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the tokenization policy.
  pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
    self.token_policy = policy;
    self
  }

  /// Sets the stop-words to remove.
  pub fn stop_words(mut self, stop_words: StopWordSet) -> Self {
    self.stop_words = Some(stop_words);
    self
  }

  /// Sets the normalizer. [`Normalizer::Identity`] disables normalization.
  pub fn normalizer(mut self, normalizer: Normalizer) -> Self {
    self.normalizer = normalizer;
    self
  }

  /// Sets how many entries to report.
  pub fn top_n(mut self, top_n: usize) -> Self {
    self.top_n = Some(top_n);
    self
  }

  /// Adds an observer that is notified after every stage.
  pub fn with_observer(mut self, observer: Box<dyn PipelineObserver>) -> Self {
    self.observers.push(observer);
    self
  }

  /// Builds the `Pipeline`.
  pub fn build(self) -> Pipeline {
    Pipeline {
      tokenizer: Tokenizer::new(self.token_policy),
      stop_words: self.stop_words.unwrap_or_default(),
      normalizer: self.normalizer,
      top_n: self.top_n.unwrap_or(AnalysisConfig::default().top_n),
      observers: self.observers,
    }
  }
}

/// Analyzes `text` from scratch: acquires resources from `provider`, runs
/// the pipeline and releases the resources again.
///
/// Any resource failure aborts the run before the text is looked at, so
/// either a complete ranking or an error is returned, never a partial result.
pub fn analyze(
  text: &str,
  config: &AnalysisConfig,
  provider: &dyn ResourceProvider,
) -> Result<Analysis> {
  let resources = Resources::acquire(provider, config)?;
  let pipeline = Pipeline::from_resources(&resources, config);
  Ok(pipeline.analyze(text))
}

/// Like [`analyze`], returning only the ranked entries.
pub fn run(
  text: &str,
  config: &AnalysisConfig,
  provider: &dyn ResourceProvider,
) -> Result<Vec<RankedEntry>> {
  analyze(text, config, provider).map(|analysis| analysis.ranked)
}
