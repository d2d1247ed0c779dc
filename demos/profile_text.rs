//! Profiles a short bilingual text with the built-in resources.
use lexfreq::prelude::*;

const TEXT: &str = "\
The cat sat on the mat. The cat ran after the other cats, \
and the cats were running everywhere.
Кошка сидела на окне, и кошки смотрели на улицу. Кошки любят окна.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("=== lexfreq profile example ===\n");

  for normalize in [false, true] {
    let config = AnalysisConfig::builder()
      .language(Language::English)
      .language(Language::Russian)
      .normalize(normalize)
      .top_n(5)
      .build();

    let resources = Resources::acquire(&BuiltinResources, &config)?;
    let pipeline = Pipeline::from_resources(&resources, &config);
    let analysis = pipeline.analyze(TEXT);

    let report = Report::new(&analysis, config.top_n)
      .with_title(format!("Top-{} words (normalize: {})", config.top_n, normalize));
    let chart = BarChartReporter::new(30).render_to_string(&report)?;
    println!("{}", chart);
  }

  Ok(())
}
