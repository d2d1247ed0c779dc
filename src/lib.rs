//! lexfreq - word-frequency profiles for natural-language text.
//!
//! lexfreq tokenizes a text, keeps alphabetic words, removes stop-words for
//! one or more languages (English and Russian), optionally reduces words to
//! their lemma and reports the most frequent ones.

pub mod error;
pub mod types;
pub mod tokenizer;
pub mod filter;
pub mod stopwords;
pub mod normalizer;
pub mod frequency;
pub mod rank;
pub mod observer;
pub mod pipeline;
pub mod resources;
pub mod source;
pub mod report;

pub use pipeline::{analyze, run};

pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::error::Error;
    pub use crate::types::*;
    pub use crate::tokenizer::*;
    pub use crate::filter::*;
    pub use crate::stopwords::StopWordSet;
    pub use crate::normalizer::*;
    pub use crate::frequency::*;
    pub use crate::rank::*;
    pub use crate::observer::*;
    pub use crate::pipeline::*;
    pub use crate::resources::*;
    pub use crate::source::*;
    pub use crate::report::*;
}
