//! DhammaShell Metric Analyzer
//!
//! Maps the text of one interaction to a bounded [`MetricSample`](dhamma_core::MetricSample).
//! Scoring is purely lexical: weighted term/phrase tables per signal, summed and
//! divided by a saturation constant, then clamped to [0, 1].

pub mod analyzer;
pub mod error;
pub mod lexicon;
pub mod text;

pub use analyzer::MetricAnalyzer;
pub use error::AnalyzerError;
pub use lexicon::{Lexicon, PolarityLexicon};
