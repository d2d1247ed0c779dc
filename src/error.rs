//! Error types shared by every stage of the analysis.
//!
//! Only fatal conditions are represented here. A token that the morphological
//! analyzer does not know is not an error: the normalizer keeps the surface
//! form and moves on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A fatal failure that aborts an analysis run before any output is produced.
#[derive(Debug, Error)]
pub enum Error {
  /// A stop-word list or morphological dictionary could not be loaded.
  #[error("resource `{resource}` is unavailable: {reason}")]
  ResourceUnavailable {
    /// Human readable name of the resource, e.g. `stopwords/english`.
    resource: String,
    /// Why loading failed.
    reason: String,
  },

  /// A language code that no resource provider knows about.
  #[error("unsupported language `{0}` (expected one of: en, ru)")]
  UnsupportedLanguage(String),

  /// The requested text source does not exist.
  #[error("text source `{source_name}` not found{}", suggestion_suffix(.suggestion))]
  SourceNotFound {
    /// The path or corpus file id that was requested.
    source_name: String,
    /// The closest known source, if any.
    suggestion: Option<String>,
  },

  /// The text source exists but could not be read as UTF-8 text.
  #[error("text source `{}` is unreadable", .path.display())]
  SourceUnreadable {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The analysis configuration is inconsistent.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
  match suggestion {
    Some(s) => format!(" (did you mean `{}`?)", s),
    None => String::new(),
  }
}

impl Error {
  /// Builds a `ResourceUnavailable` error.
  pub fn resource(resource: impl Into<String>, reason: impl ToString) -> Self {
    Self::ResourceUnavailable {
      resource: resource.into(),
      reason: reason.to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_name_the_failing_resource() {
    let err = Error::resource("stopwords/russian", "file is empty");
    assert_eq!(
      err.to_string(),
      "resource `stopwords/russian` is unavailable: file is empty"
    );

    let err = Error::SourceNotFound {
      source_name: "overheard".into(),
      suggestion: Some("overheard.txt".into()),
    };
    assert_eq!(
      err.to_string(),
      "text source `overheard` not found (did you mean `overheard.txt`?)"
    );
  }
}
