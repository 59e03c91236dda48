//! Metric Analyzer - pure lexical scoring of interaction text

use crate::error::AnalyzerError;
use crate::lexicon::{Lexicon, PolarityLexicon, COMPASSION, EMOTION, MINDFULNESS};
use crate::text::NormalizedText;
use dhamma_core::MetricSample;

/// Stateless analyzer mapping text to a [`MetricSample`].
///
/// Deterministic: the same input always yields the same sample.
#[derive(Debug, Clone, Copy)]
pub struct MetricAnalyzer {
    emotion: PolarityLexicon,
    compassion: Lexicon,
    mindfulness: Lexicon,
}

impl Default for MetricAnalyzer {
    fn default() -> Self {
        Self::new(EMOTION, COMPASSION, MINDFULNESS)
    }
}

impl MetricAnalyzer {
    pub fn new(emotion: PolarityLexicon, compassion: Lexicon, mindfulness: Lexicon) -> Self {
        Self {
            emotion,
            compassion,
            mindfulness,
        }
    }

    /// Score all three signals on a single text
    pub fn analyze(&self, text: &str) -> MetricSample {
        let text = NormalizedText::new(text);
        self.sample(
            self.emotion.score(&text),
            self.compassion.score(&text),
            self.mindfulness.score(&text),
        )
    }

    /// Score raw bytes, rejecting input that is not valid UTF-8 text
    pub fn analyze_bytes(&self, bytes: &[u8]) -> Result<MetricSample, AnalyzerError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            AnalyzerError::InvalidInput(format!("not valid UTF-8 text: {}", e))
        })?;
        Ok(self.analyze(text))
    }

    /// Score one interaction: emotion on the user input, compassion and mindfulness on
    /// the system response.
    pub fn analyze_interaction(&self, user_input: &str, system_response: &str) -> MetricSample {
        let input = NormalizedText::new(user_input);
        let response = NormalizedText::new(system_response);
        self.sample(
            self.emotion.score(&input),
            self.compassion.score(&response),
            self.mindfulness.score(&response),
        )
    }

    fn sample(&self, emotional: f64, compassion: f64, mindfulness: f64) -> MetricSample {
        // Lexicon scores are clamped, so construction cannot fail
        MetricSample::new(emotional, compassion, mindfulness).unwrap_or(MetricSample::ZERO)
    }
}
