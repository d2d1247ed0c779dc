//! Defines the observer hooks for the analysis pipeline.

use crate::frequency::FrequencyTable;
use crate::pipeline::Stage;
use crate::rank::RankedEntry;
use crate::types::Token;

/// A trait for observers that can watch a pipeline run stage by stage.
///
/// Observers only see borrowed, read-only views: each stage is a pure
/// function of the previous one and nothing an observer does can change the
/// outcome of a run. They are useful for tracing, statistics and tests.
///
/// # Examples
///
/// Counting how many words the stop-word filter removed:
///
/// ```rust
/// use lexfreq::prelude::*;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Default)]
/// struct Removed {
///     before: AtomicUsize,
///     after: AtomicUsize,
/// }
///
/// impl PipelineObserver for Removed {
///     fn after_fold(&self, tokens: &[Token]) {
///         self.before.store(tokens.len(), Ordering::Relaxed);
///     }
///
///     fn after_filter(&self, tokens: &[Token]) {
///         self.after.store(tokens.len(), Ordering::Relaxed);
///     }
/// }
/// ```
pub trait PipelineObserver: Send + Sync {
  /// Called every time the pipeline enters a new stage.
  fn on_stage(&self, _stage: Stage) {}

  /// Called with the raw tokens produced by the tokenizer.
  fn after_tokenize(&self, _tokens: &[Token]) {}

  /// Called with the alphabetic, lowercased tokens.
  fn after_fold(&self, _tokens: &[Token]) {}

  /// Called with the tokens that survived stop-word removal.
  fn after_filter(&self, _tokens: &[Token]) {}

  /// Called with the normalized tokens. With normalization disabled these
  /// are the same as the filtered tokens.
  fn after_normalize(&self, _tokens: &[Token]) {}

  /// Called with the completed frequency table.
  fn after_aggregate(&self, _table: &FrequencyTable) {}

  /// Called with the final ranking.
  fn after_rank(&self, _ranked: &[RankedEntry]) {}
}

/// An observer that reports every stage through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
  fn on_stage(&self, stage: Stage) {
    tracing::trace!(?stage, "entering stage");
  }

  fn after_tokenize(&self, tokens: &[Token]) {
    tracing::debug!(tokens = tokens.len(), "tokenized");
  }

  fn after_filter(&self, tokens: &[Token]) {
    tracing::debug!(tokens = tokens.len(), "stop-words removed");
  }

  fn after_aggregate(&self, table: &FrequencyTable) {
    tracing::debug!(total = table.total(), distinct = table.len(), "aggregated");
  }

  fn after_rank(&self, ranked: &[RankedEntry]) {
    tracing::debug!(entries = ranked.len(), "ranked");
  }
}
