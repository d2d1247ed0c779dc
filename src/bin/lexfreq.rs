//! Command-line interface for lexfreq.
//!
//! Usage:
//! ```bash
//! lexfreq book.txt
//! lexfreq book.txt --lang en --lang ru --normalize --top-n 20
//! lexfreq --corpus ./webtext overheard.txt --format json
//! lexfreq --text "The cat sat on the mat." --format table
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use lexfreq::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lexfreq")]
#[command(version)]
#[command(about = "Profile the most frequent words of a text", long_about = None)]
struct Cli {
  /// Text file to analyze, or a file id when --corpus is given
  source: Option<String>,

  /// Analyze this text instead of reading a file
  #[arg(long, conflicts_with_all = ["source", "corpus"])]
  text: Option<String>,

  /// Directory of text files; SOURCE is then the name of one of them
  #[arg(long)]
  corpus: Option<PathBuf>,

  /// Number of words to report
  #[arg(short = 'n', long)]
  top_n: Option<usize>,

  /// Stop-word / morphology language (en, ru); repeat for several
  #[arg(short, long = "lang", value_parser = parse_language)]
  languages: Vec<Language>,

  /// Reduce words to their lemma before counting
  #[arg(long)]
  normalize: bool,

  /// Which characters form a word
  #[arg(long, value_enum)]
  policy: Option<TokenPolicy>,

  /// Output format
  #[arg(short, long, value_enum, default_value_t = ReportFormat::Bar)]
  format: ReportFormat,

  /// Width of the longest bar in the bar chart
  #[arg(long, default_value = "50")]
  width: usize,

  /// Chart title
  #[arg(long)]
  title: Option<String>,

  /// Directory with stopwords/<language> and lemmas/<code>.tsv files
  /// instead of the built-in resources
  #[arg(long)]
  resources: Option<PathBuf>,

  /// JSON file with default analysis settings
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Log level (error, warn, info, debug, trace)
  #[arg(long, default_value = "warn")]
  log_level: String,
}

fn parse_language(s: &str) -> std::result::Result<Language, String> {
  s.parse::<Language>().map_err(|e| e.to_string())
}

impl Cli {
  fn analysis_config(&self) -> Result<AnalysisConfig> {
    let mut config = match &self.config {
      Some(path) => AnalysisConfig::from_json_file(path)?,
      None => AnalysisConfig::default(),
    };
    if let Some(top_n) = self.top_n {
      config.top_n = top_n;
    }
    if !self.languages.is_empty() {
      config.languages = self.languages.clone();
    }
    if self.normalize {
      config.normalize = true;
    }
    if let Some(policy) = self.policy {
      config.token_policy = policy;
    }
    Ok(config)
  }

  fn text_source(&self) -> Result<TextSource> {
    match (&self.text, &self.source, &self.corpus) {
      (Some(text), _, _) => Ok(TextSource::Inline(text.clone())),
      (None, Some(source), Some(root)) => Ok(TextSource::Corpus {
        root: root.clone(),
        fileid: source.clone(),
      }),
      (None, Some(source), None) => Ok(TextSource::File(PathBuf::from(source))),
      (None, None, _) => bail!("nothing to analyze: pass a SOURCE file or --text"),
    }
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let config = cli.analysis_config()?;
  let source = cli.text_source()?;

  let provider: Box<dyn ResourceProvider> = match &cli.resources {
    Some(dir) => Box::new(DirectoryResources::new(dir)),
    None => Box::new(BuiltinResources),
  };
  let resources = Resources::acquire(provider.as_ref(), &config)
    .context("failed to load language resources")?;

  let text = source
    .load()
    .with_context(|| format!("failed to load text from {}", source.name()))?;
  info!(source = %source.name(), bytes = text.len(), "loaded text");

  let pipeline = Pipeline::builder()
    .token_policy(config.token_policy)
    .stop_words(resources.stop_words().clone())
    .normalizer(resources.normalizer().clone())
    .top_n(config.top_n)
    .with_observer(Box::new(TracingObserver))
    .build();
  let analysis = pipeline.analyze(&text);
  drop(resources);

  let mut report = Report::new(&analysis, config.top_n).with_source(source.name());
  if let Some(title) = &cli.title {
    report = report.with_title(title);
  }

  let reporter: Box<dyn Reporter> = match cli.format {
    ReportFormat::Bar => Box::new(BarChartReporter::new(cli.width)),
    format => format.reporter(),
  };

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  reporter
    .render(&report, &mut out)
    .context("failed to write report")?;
  out.flush()?;
  Ok(())
}
