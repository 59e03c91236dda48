//! MetricSample - Bounded empathy scores for one interaction
//!
//! Every score lives in the closed interval [0.0, 1.0].
//! This is enforced by the constructor and on deserialization.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The three empathy metrics derived from an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Emotional content detected in the user input
    EmotionalRecognition,
    /// Compassionate engagement in the system response
    CompassionScore,
    /// Mindful communication in the system response
    MindfulnessLevel,
}

/// Interpretation band for a metric value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Band {
    High,
    Moderate,
    Low,
}

impl MetricKind {
    /// All metrics in report order
    pub const ALL: [MetricKind; 3] = [
        MetricKind::EmotionalRecognition,
        MetricKind::CompassionScore,
        MetricKind::MindfulnessLevel,
    ];

    /// Field name used in the persisted session format
    pub fn field_name(&self) -> &'static str {
        match self {
            MetricKind::EmotionalRecognition => "emotional_recognition",
            MetricKind::CompassionScore => "compassion_score",
            MetricKind::MindfulnessLevel => "mindfulness_level",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::EmotionalRecognition => "Emotional Recognition",
            MetricKind::CompassionScore => "Compassion Score",
            MetricKind::MindfulnessLevel => "Mindfulness Level",
        }
    }

    /// Classify a value into its band.
    ///
    /// - Emotional recognition: `> 0.5` high, `< 0.3` low, otherwise moderate
    /// - Compassion / mindfulness: `> 0.7` high, `< 0.4` low, otherwise moderate
    pub fn band(&self, value: f64) -> Band {
        let (high_above, low_below) = match self {
            MetricKind::EmotionalRecognition => (0.5, 0.3),
            MetricKind::CompassionScore | MetricKind::MindfulnessLevel => (0.7, 0.4),
        };

        if value > high_above {
            Band::High
        } else if value < low_below {
            Band::Low
        } else {
            Band::Moderate
        }
    }

    /// Label shown in reports for a band of this metric
    pub fn band_label(&self, band: Band) -> &'static str {
        match (self, band) {
            (MetricKind::EmotionalRecognition, Band::High) => "strong emotional content",
            (MetricKind::EmotionalRecognition, Band::Moderate) => "moderate emotional content",
            (MetricKind::EmotionalRecognition, Band::Low) => "neutral",
            (_, Band::High) => "high",
            (_, Band::Moderate) => "moderate",
            (_, Band::Low) => "low",
        }
    }

    /// Convenience: band label for a raw value
    pub fn describe(&self, value: f64) -> &'static str {
        self.band_label(self.band(value))
    }
}

/// Unvalidated wire form of a [`MetricSample`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawMetricSample {
    emotional_recognition: f64,
    compassion_score: f64,
    mindfulness_level: f64,
}

/// Bounded empathy scores for one interaction.
///
/// # Invariant
/// All three fields are in `[0.0, 1.0]` (NaN is rejected).
///
/// # Example
/// ```
/// use dhamma_core::MetricSample;
///
/// let sample = MetricSample::new(0.8, 0.5, 0.1).unwrap();
/// assert_eq!(sample.compassion_score(), 0.5);
///
/// assert!(MetricSample::new(1.5, 0.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetricSample", into = "RawMetricSample")]
pub struct MetricSample {
    emotional_recognition: f64,
    compassion_score: f64,
    mindfulness_level: f64,
}

impl MetricSample {
    /// All-zero (neutral) sample
    pub const ZERO: Self = Self {
        emotional_recognition: 0.0,
        compassion_score: 0.0,
        mindfulness_level: 0.0,
    };

    /// Create a sample, rejecting any value outside `[0.0, 1.0]`
    pub fn new(
        emotional_recognition: f64,
        compassion_score: f64,
        mindfulness_level: f64,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            emotional_recognition: check_range(MetricKind::EmotionalRecognition, emotional_recognition)?,
            compassion_score: check_range(MetricKind::CompassionScore, compassion_score)?,
            mindfulness_level: check_range(MetricKind::MindfulnessLevel, mindfulness_level)?,
        })
    }

    #[inline]
    pub fn emotional_recognition(&self) -> f64 {
        self.emotional_recognition
    }

    #[inline]
    pub fn compassion_score(&self) -> f64 {
        self.compassion_score
    }

    #[inline]
    pub fn mindfulness_level(&self) -> f64 {
        self.mindfulness_level
    }

    /// Get a metric by kind
    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::EmotionalRecognition => self.emotional_recognition,
            MetricKind::CompassionScore => self.compassion_score,
            MetricKind::MindfulnessLevel => self.mindfulness_level,
        }
    }
}

fn check_range(kind: MetricKind, value: f64) -> Result<f64, CoreError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CoreError::MetricOutOfRange {
            metric: kind.field_name(),
            value,
        })
    }
}

impl TryFrom<RawMetricSample> for MetricSample {
    type Error = CoreError;

    fn try_from(raw: RawMetricSample) -> Result<Self, Self::Error> {
        MetricSample::new(raw.emotional_recognition, raw.compassion_score, raw.mindfulness_level)
    }
}

impl From<MetricSample> for RawMetricSample {
    fn from(sample: MetricSample) -> Self {
        RawMetricSample {
            emotional_recognition: sample.emotional_recognition,
            compassion_score: sample.compassion_score,
            mindfulness_level: sample.mindfulness_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_accepts_bounds() {
        assert!(MetricSample::new(0.0, 1.0, 0.5).is_ok());
    }

    #[test]
    fn test_sample_rejects_out_of_range() {
        let err = MetricSample::new(1.5, 0.0, 0.0).unwrap_err();
        assert_eq!(
            err,
            CoreError::MetricOutOfRange {
                metric: "emotional_recognition",
                value: 1.5
            }
        );
        assert!(MetricSample::new(0.0, -0.1, 0.0).is_err());
        assert!(MetricSample::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let json = r#"{"emotional_recognition": 1.5, "compassion_score": 0.2, "mindfulness_level": 0.3}"#;
        let result: Result<MetricSample, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_missing_field() {
        let json = r#"{"emotional_recognition": 0.5, "compassion_score": 0.2}"#;
        let result: Result<MetricSample, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_field_names() {
        let sample = MetricSample::new(0.25, 0.5, 0.75).unwrap();
        let json = serde_json::to_string(&sample).unwrap();

        assert!(json.contains("\"emotional_recognition\":0.25"));
        assert!(json.contains("\"compassion_score\":0.5"));
        assert!(json.contains("\"mindfulness_level\":0.75"));
    }

    #[test]
    fn test_emotional_bands() {
        let kind = MetricKind::EmotionalRecognition;
        assert_eq!(kind.describe(0.51), "strong emotional content");
        assert_eq!(kind.describe(0.5), "moderate emotional content");
        assert_eq!(kind.describe(0.3), "moderate emotional content");
        assert_eq!(kind.describe(0.29), "neutral");
    }

    #[test]
    fn test_compassion_mindfulness_bands() {
        for kind in [MetricKind::CompassionScore, MetricKind::MindfulnessLevel] {
            assert_eq!(kind.band(0.71), Band::High);
            assert_eq!(kind.band(0.7), Band::Moderate);
            assert_eq!(kind.band(0.4), Band::Moderate);
            assert_eq!(kind.band(0.39), Band::Low);
            assert_eq!(kind.describe(0.9), "high");
            assert_eq!(kind.describe(0.1), "low");
        }
    }

    #[test]
    fn test_metric_kind_names() {
        assert_eq!(MetricKind::CompassionScore.to_string(), "compassion_score");
        assert_eq!(
            "mindfulness_level".parse::<MetricKind>().unwrap(),
            MetricKind::MindfulnessLevel
        );
    }
}
