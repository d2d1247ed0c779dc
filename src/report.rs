//! Rendering rankings for people and machines.
//!
//! Reporters sit outside the analysis itself: they receive a finished
//! [`Report`] and only decide how it looks. Every reporter accepts an empty
//! ranking and renders it as an empty chart rather than failing.

use crate::rank::RankedEntry;
use crate::types::Analysis;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::str::FromStr;

/// Default width of the longest bar, in characters.
const DEFAULT_BAR_WIDTH: usize = 50;

/// Everything a reporter needs to render one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
  /// The chart title.
  pub title: String,
  /// Name of the analyzed source, if known.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source: Option<String>,
  /// Number of words counted after filtering.
  pub total_words: usize,
  /// Number of distinct words counted.
  pub unique_words: usize,
  /// `unique_words / total_words`, 0 for an empty text.
  pub lexical_diversity: f64,
  /// The ranked words, highest count first.
  pub entries: Vec<RankedEntry>,
}

impl Report {
  /// Builds a report for `analysis` with the default title.
  pub fn new(analysis: &Analysis, top_n: usize) -> Self {
    Self {
      title: default_title(top_n),
      source: None,
      total_words: analysis.total_words(),
      unique_words: analysis.unique_words(),
      lexical_diversity: analysis.lexical_diversity(),
      entries: analysis.ranked.clone(),
    }
  }

  /// Sets the source name shown under the title.
  pub fn with_source(mut self, source: impl Into<String>) -> Self {
    self.source = Some(source.into());
    self
  }

  /// Replaces the title.
  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }
}

/// The title used when none is given.
pub fn default_title(top_n: usize) -> String {
  format!("Top-{} most frequent words (without stop-words)", top_n)
}

/// A trait for anything that can present a [`Report`].
pub trait Reporter {
  /// Writes the rendered report to `out`.
  fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()>;

  /// Renders into a `String`.
  fn render_to_string(&self, report: &Report) -> io::Result<String> {
    let mut buf = Vec::new();
    self.render(report, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
  }
}

/// The available output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
  /// A horizontal bar chart.
  #[default]
  Bar,
  /// An aligned table.
  Table,
  /// Pretty-printed JSON.
  Json,
}

impl ReportFormat {
  /// Returns the reporter for this format.
  pub fn reporter(self) -> Box<dyn Reporter> {
    match self {
      ReportFormat::Bar => Box::new(BarChartReporter::default()),
      ReportFormat::Table => Box::new(TableReporter),
      ReportFormat::Json => Box::new(JsonReporter),
    }
  }
}

impl FromStr for ReportFormat {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "bar" | "chart" => Ok(ReportFormat::Bar),
      "table" => Ok(ReportFormat::Table),
      "json" => Ok(ReportFormat::Json),
      other => Err(format!("unknown report format `{}`", other)),
    }
  }
}

fn write_header(report: &Report, out: &mut dyn Write) -> io::Result<()> {
  writeln!(out, "{}", report.title)?;
  if let Some(source) = &report.source {
    writeln!(out, "Source: {}", source)?;
  }
  writeln!(
    out,
    "Words: {}  Unique: {}  Lexical diversity: {:.3}",
    report.total_words, report.unique_words, report.lexical_diversity
  )?;
  writeln!(out)
}

fn label_width(entries: &[RankedEntry]) -> usize {
  entries
    .iter()
    .map(|e| e.token.chars().count())
    .max()
    .unwrap_or(0)
}

/// Draws one bar per word, scaled so the most frequent word gets the full
/// width, with the count printed after each bar.
#[derive(Debug, Clone, Copy)]
pub struct BarChartReporter {
  width: usize,
}

impl Default for BarChartReporter {
  fn default() -> Self {
    Self {
      width: DEFAULT_BAR_WIDTH,
    }
  }
}

impl BarChartReporter {
  /// Creates a chart whose longest bar is `width` characters.
  pub fn new(width: usize) -> Self {
    Self {
      width: width.max(1),
    }
  }
}

impl Reporter for BarChartReporter {
  fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
    write_header(report, out)?;
    if report.entries.is_empty() {
      return writeln!(out, "(no words to display)");
    }

    let max = report.entries.iter().map(|e| e.count).max().unwrap_or(1).max(1);
    let label = label_width(&report.entries);
    for entry in &report.entries {
      // Every counted word gets at least one block.
      let len = ((entry.count * self.width + max / 2) / max).max(1);
      let pad = label - entry.token.chars().count();
      writeln!(
        out,
        "{}{} | {} {}",
        entry.token,
        " ".repeat(pad),
        "█".repeat(len),
        entry.count
      )?;
    }
    Ok(())
  }
}

/// A rank / word / count table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableReporter;

impl Reporter for TableReporter {
  fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
    write_header(report, out)?;
    if report.entries.is_empty() {
      return writeln!(out, "(no words to display)");
    }

    let label = label_width(&report.entries).max("word".len());
    writeln!(out, "{:>4}  {}  {}", "#", pad_right("word", label), "count")?;
    for (i, entry) in report.entries.iter().enumerate() {
      writeln!(
        out,
        "{:>4}  {}  {}",
        i + 1,
        pad_right(&entry.token, label),
        entry.count
      )?;
    }
    Ok(())
  }
}

fn pad_right(s: &str, width: usize) -> String {
  let len = s.chars().count();
  format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Serializes the report as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl Reporter for JsonReporter {
  fn render(&self, report: &Report, out: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::frequency::FrequencyTable;
  use crate::rank::top_n;

  fn analysis(text: &str, n: usize) -> Analysis {
    let table: FrequencyTable = text.split_whitespace().map(str::to_string).collect();
    let ranked = top_n(&table, n);
    Analysis { table, ranked }
  }

  #[test]
  fn test_bar_chart() {
    let report = Report::new(&analysis("cat cat cat cat mat", 2), 2).with_source("pets.txt");
    let text = BarChartReporter::new(4).render_to_string(&report).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Top-2 most frequent words (without stop-words)");
    assert_eq!(lines[1], "Source: pets.txt");
    assert_eq!(lines[2], "Words: 5  Unique: 2  Lexical diversity: 0.400");
    assert_eq!(lines[4], "cat | ████ 4");
    assert_eq!(lines[5], "mat | █ 1");
  }

  #[test]
  fn test_empty_report_renders() {
    let report = Report::new(&Analysis::default(), 10);
    for format in [ReportFormat::Bar, ReportFormat::Table] {
      let text = format.reporter().render_to_string(&report).unwrap();
      assert!(text.ends_with("(no words to display)\n"));
    }
    let json = JsonReporter.render_to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["entries"], serde_json::json!([]));
    assert_eq!(value["total_words"], 0);
  }

  #[test]
  fn test_table_aligns_cyrillic() {
    let report = Report::new(&analysis("мама мама рама", 5), 5);
    let text = TableReporter.render_to_string(&report).unwrap();
    assert!(text.contains("   1  мама  2\n"));
    assert!(text.contains("   2  рама  1\n"));
  }

  #[test]
  fn test_format_parsing() {
    assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
    assert_eq!("chart".parse::<ReportFormat>().unwrap(), ReportFormat::Bar);
    assert!("pie".parse::<ReportFormat>().is_err());
  }
}
