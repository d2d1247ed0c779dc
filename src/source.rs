//! Loading the text to analyze.
//!
//! Text is always read completely into memory before the pipeline starts.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strsim::jaro_winkler;

/// The minimum similarity for a file id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Reads a UTF-8 text file.
///
/// A missing file is reported as [`Error::SourceNotFound`], anything else
/// (permissions, invalid UTF-8, a directory) as [`Error::SourceUnreadable`].
pub fn read_text(path: impl AsRef<Path>) -> Result<String> {
  let path = path.as_ref();
  fs::read_to_string(path).map_err(|e| match e.kind() {
    ErrorKind::NotFound => Error::SourceNotFound {
      source_name: path.display().to_string(),
      suggestion: None,
    },
    _ => Error::SourceUnreadable {
      path: path.to_path_buf(),
      source: e,
    },
  })
}

/// A directory of plain-text documents addressed by file name.
#[derive(Debug, Clone)]
pub struct Corpus {
  root: PathBuf,
  fileids: Vec<String>,
}

impl Corpus {
  /// Opens the corpus in `root`, indexing the regular files it contains.
  pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    let entries = fs::read_dir(&root).map_err(|e| match e.kind() {
      ErrorKind::NotFound => Error::SourceNotFound {
        source_name: root.display().to_string(),
        suggestion: None,
      },
      _ => Error::SourceUnreadable {
        path: root.clone(),
        source: e,
      },
    })?;

    let mut fileids = Vec::new();
    for entry in entries {
      let entry = entry.map_err(|e| Error::SourceUnreadable {
        path: root.clone(),
        source: e,
      })?;
      let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
      if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
        if !name.starts_with('.') {
          fileids.push(name.to_string());
        }
      }
    }
    fileids.sort();

    tracing::debug!(root = %root.display(), documents = fileids.len(), "opened corpus");
    Ok(Self { root, fileids })
  }

  /// The corpus directory.
  pub fn root(&self) -> &Path {
    &self.root
  }

  /// The available document ids, sorted.
  pub fn fileids(&self) -> &[String] {
    &self.fileids
  }

  /// Reads the full text of document `fileid`.
  pub fn raw(&self, fileid: &str) -> Result<String> {
    if !self.fileids.iter().any(|id| id == fileid) {
      return Err(Error::SourceNotFound {
        source_name: fileid.to_string(),
        suggestion: self.suggest(fileid),
      });
    }
    read_text(self.root.join(fileid))
  }

  /// The known file id most similar to `fileid`, if any is close enough.
  pub fn suggest(&self, fileid: &str) -> Option<String> {
    self
      .fileids
      .iter()
      .map(|id| (id, jaro_winkler(fileid, id)))
      .filter(|(_, similarity)| *similarity >= SUGGESTION_THRESHOLD)
      .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
      .map(|(id, _)| id.clone())
  }
}

/// Where the text of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
  /// A single file on disk.
  File(PathBuf),
  /// A document inside a corpus directory.
  Corpus {
    /// The corpus directory.
    root: PathBuf,
    /// The document's file name.
    fileid: String,
  },
  /// Text already in memory.
  Inline(String),
}

impl TextSource {
  /// A short name for reports and log messages.
  pub fn name(&self) -> String {
    match self {
      TextSource::File(path) => path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string()),
      TextSource::Corpus { fileid, .. } => fileid.clone(),
      TextSource::Inline(_) => "<inline>".to_string(),
    }
  }

  /// Loads the complete text.
  pub fn load(&self) -> Result<String> {
    match self {
      TextSource::File(path) => read_text(path),
      TextSource::Corpus { root, fileid } => Corpus::open(root)?.raw(fileid),
      TextSource::Inline(text) => Ok(text.clone()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn corpus_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("overheard.txt"), "the cat").unwrap();
    fs::write(dir.path().join("grail.txt"), "the grail").unwrap();
    fs::write(dir.path().join(".hidden"), "nope").unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    dir
  }

  #[test]
  fn test_corpus_lists_regular_files() {
    let dir = corpus_dir();
    let corpus = Corpus::open(dir.path()).unwrap();
    assert_eq!(corpus.fileids(), &["grail.txt", "overheard.txt"]);
    assert_eq!(corpus.raw("overheard.txt").unwrap(), "the cat");
  }

  #[test]
  fn test_unknown_fileid_suggests_closest() {
    let dir = corpus_dir();
    let corpus = Corpus::open(dir.path()).unwrap();
    match corpus.raw("overheard") {
      Err(Error::SourceNotFound {
        source_name,
        suggestion,
      }) => {
        assert_eq!(source_name, "overheard");
        assert_eq!(suggestion.as_deref(), Some("overheard.txt"));
      }
      other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(corpus.suggest("zzzzzz"), None);
  }

  #[test]
  fn test_read_text_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
      read_text(dir.path().join("missing.txt")),
      Err(Error::SourceNotFound { .. })
    ));

    let binary = dir.path().join("binary.bin");
    fs::write(&binary, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
    assert!(matches!(
      read_text(&binary),
      Err(Error::SourceUnreadable { .. })
    ));
  }

  #[test]
  fn test_source_names() {
    let source = TextSource::File(PathBuf::from("/data/books/war.txt"));
    assert_eq!(source.name(), "war.txt");
    let inline = TextSource::Inline("abc".into());
    assert_eq!(inline.name(), "<inline>");
    assert_eq!(inline.load().unwrap(), "abc");
  }
}
