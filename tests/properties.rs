use lexfreq::prelude::*;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

fn stop_words() -> StopWordSet {
  StopWordSet::from_words(["the", "and", "a", "и", "на", "не"])
}

fn pipeline(top_n: usize) -> Pipeline {
  Pipeline::builder()
    .stop_words(stop_words())
    .top_n(top_n)
    .build()
}

/// Lemmas of every shape: stop-words, upper case, digits and apostrophes,
/// with a three-letter stem for everything else.
struct AwkwardAnalyzer;

impl MorphAnalyzer for AwkwardAnalyzer {
  fn name(&self) -> &str {
    "awkward"
  }

  fn lemmas(&self, word: &str) -> Vec<String> {
    match word.chars().count() % 5 {
      0 => vec!["the".to_string()],
      1 => vec![word.to_uppercase()],
      2 => vec![format!("{}2", word)],
      3 => vec![format!("{}'s", word)],
      _ => Vec::new(),
    }
  }

  fn stem(&self, word: &str) -> Option<String> {
    (word.chars().count() > 3).then(|| word.chars().take(3).collect())
  }
}

fn awkward_normalizer() -> Normalizer {
  let dictionary = DictionaryAnalyzer::new("dict")
    .with("was", "and")
    .with("cats", "cat's")
    .with("mice", "m1ce")
    .with("geese", "Goose")
    .with("мыла", "и");
  Normalizer::morphological(ChainAnalyzer::new(vec![
    Box::new(dictionary) as Box<dyn MorphAnalyzer>,
    Box::new(AwkwardAnalyzer),
  ]))
}

struct CollectNormalized(Arc<Mutex<Vec<Token>>>);

impl PipelineObserver for CollectNormalized {
  fn after_normalize(&self, tokens: &[Token]) {
    *self.0.lock().unwrap() = tokens.to_vec();
  }
}

/// Words mixed with digits, punctuation, Cyrillic and stop-words.
fn text_strategy() -> impl Strategy<Value = String> {
  let word = prop_oneof![
    "[a-zA-Z]{1,8}",
    "[а-яА-ЯёЁ]{1,8}",
    "[a-z0-9]{1,6}",
    Just("the".to_string()),
    Just("The".to_string()),
    Just("И".to_string()),
    Just("don't".to_string()),
    Just("was".to_string()),
    Just("Cats".to_string()),
    Just("mice".to_string()),
    Just("geese".to_string()),
    Just("мыла".to_string()),
  ];
  let sep = prop_oneof![
    Just(" "),
    Just(", "),
    Just(". "),
    Just("\n"),
    Just(" - "),
    Just("!? "),
  ];
  prop::collection::vec((word, sep), 0..60).prop_map(|parts| {
    parts
      .into_iter()
      .map(|(w, s)| format!("{}{}", w, s))
      .collect::<String>()
  })
}

proptest! {
  #[test]
  fn counted_words_are_lowercase_letters(text in text_strategy()) {
    let analysis = pipeline(10).analyze(&text);
    for (token, _) in analysis.table.iter() {
      prop_assert!(is_alphabetic_word(token));
      prop_assert_eq!(token.to_lowercase(), token);
    }
  }

  #[test]
  fn no_stop_word_is_counted(text in text_strategy()) {
    let analysis = pipeline(10).analyze(&text);
    let stop_words = stop_words();
    for (token, _) in analysis.table.iter() {
      prop_assert!(!stop_words.contains(token));
    }
  }

  #[test]
  fn fold_is_idempotent(text in text_strategy()) {
    let once = fold_alphabetic(tokenize(&text));
    let twice = fold_alphabetic(once.clone());
    prop_assert_eq!(once, twice);
  }

  #[test]
  fn counts_sum_to_surviving_tokens(text in text_strategy()) {
    let surviving = stop_words().filter(fold_alphabetic(tokenize(&text)));
    let analysis = pipeline(10).analyze(&text);
    let sum: usize = analysis.table.iter().map(|(_, c)| c).sum();
    prop_assert_eq!(sum, surviving.len());
    prop_assert_eq!(analysis.table.total(), surviving.len());
  }

  #[test]
  fn smaller_top_n_is_a_prefix(text in text_strategy(), n1 in 0usize..15, extra in 0usize..15) {
    let n2 = n1 + extra;
    let short = pipeline(n1).run(&text);
    let long = pipeline(n2).run(&text);
    prop_assert!(short.len() <= n1);
    prop_assert!(long.len() <= n2);
    prop_assert_eq!(&short[..], &long[..short.len()]);
    for pair in long.windows(2) {
      prop_assert!(pair[0].count >= pair[1].count);
    }
  }

  #[test]
  fn runs_are_deterministic(text in text_strategy()) {
    let first = serde_json::to_string(&pipeline(20).run(&text)).unwrap();
    let second = serde_json::to_string(&pipeline(20).run(&text)).unwrap();
    prop_assert_eq!(first, second);
  }

  #[test]
  fn normalized_counts_keep_invariants(text in text_strategy()) {
    let normalized = Arc::new(Mutex::new(Vec::new()));
    let pipeline = Pipeline::builder()
      .stop_words(stop_words())
      .normalizer(awkward_normalizer())
      .with_observer(Box::new(CollectNormalized(normalized.clone())))
      .build();
    let analysis = pipeline.analyze(&text);
    let normalized = normalized.lock().unwrap().clone();

    let stop_words = stop_words();
    for (token, _) in analysis.table.iter() {
      prop_assert!(is_alphabetic_word(token));
      prop_assert_eq!(token.to_lowercase(), token);
      prop_assert!(!stop_words.contains(token));
    }
    let sum: usize = analysis.table.iter().map(|(_, c)| c).sum();
    prop_assert_eq!(sum, normalized.len());
    prop_assert_eq!(analysis.table.total(), normalized.len());

    let surviving = stop_words.filter(fold_alphabetic(tokenize(&text)));
    prop_assert!(normalized.len() <= surviving.len());
  }
}
