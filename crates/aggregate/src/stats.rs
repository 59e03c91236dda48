//! Metric statistics over a set of sessions

use crate::error::AggregateError;
use chrono::{DateTime, Utc};
use dhamma_core::{MetricKind, Session, SessionId};
use dhamma_recorder::SessionRecorder;
use serde::Serialize;
use std::collections::BTreeSet;

/// Statistics for one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (0.0 below two points)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Cut points Q1, Q2, Q3; `None` below four points
    pub quartiles: Option<[f64; 3]>,
    /// Least-squares slope of `trend` against interaction index (0.0 below two points)
    pub slope: f64,
    /// Per-interaction values in chronological order
    pub trend: Vec<f64>,
}

impl Default for MetricStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            quartiles: None,
            slope: 0.0,
            trend: Vec::new(),
        }
    }
}

impl MetricStats {
    fn from_trend(trend: Vec<f64>) -> Self {
        if trend.is_empty() {
            return Self::default();
        }

        let count = trend.len();
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &value in &trend {
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        let mean = sum / count as f64;
        let std_dev = if count < 2 {
            0.0
        } else {
            let squares: f64 = trend.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        };

        let mut sorted = trend.clone();
        sorted.sort_by(f64::total_cmp);

        Self {
            count,
            mean,
            median: median(&sorted),
            std_dev,
            min,
            max,
            quartiles: quartiles(&sorted),
            slope: slope(&trend),
            trend,
        }
    }
}

/// Middle value of sorted, non-empty data
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Quartile cut points of sorted data, interpolated over `n + 1` positions
fn quartiles(sorted: &[f64]) -> Option<[f64; 3]> {
    let n = sorted.len();
    if n < 4 {
        return None;
    }

    let m = n + 1;
    let mut cuts = [0.0; 3];
    for (i, cut) in (1..=3).zip(cuts.iter_mut()) {
        let j = i * m / 4;
        let delta = (i * m - j * 4) as f64;
        *cut = (sorted[j - 1] * (4.0 - delta) + sorted[j] * delta) / 4.0;
    }
    Some(cuts)
}

/// Pearson correlation; `None` below two points or when either side is constant
fn correlation(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x * var_y).sqrt())
}

/// Simple linear regression slope of values against their index
fn slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n_f * sum_xy - sum_x * sum_y) / denominator
}

/// Aggregated statistics across sessions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub sessions: Vec<SessionId>,
    pub total_interactions: usize,
    pub first_interaction: Option<DateTime<Utc>>,
    pub last_interaction: Option<DateTime<Utc>>,
    pub emotional_recognition: MetricStats,
    pub compassion_score: MetricStats,
    pub mindfulness_level: MetricStats,
}

impl AggregateStats {
    /// Aggregate already-loaded sessions; they are visited in id order.
    pub fn from_sessions<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut ordered: Vec<&Session> = sessions.into_iter().collect();
        ordered.sort_by(|a, b| a.id().cmp(b.id()));

        let mut trends: [Vec<f64>; 3] = Default::default();
        let mut first_interaction = None;
        let mut last_interaction = None;

        for session in &ordered {
            for interaction in session.interactions() {
                first_interaction.get_or_insert(interaction.timestamp());
                last_interaction = Some(interaction.timestamp());
                for (trend, kind) in trends.iter_mut().zip(MetricKind::ALL) {
                    trend.push(interaction.metrics().get(kind));
                }
            }
        }

        let [emotional, compassion, mindfulness] = trends;
        let total_interactions = emotional.len();

        Self {
            sessions: ordered.iter().map(|s| s.id().clone()).collect(),
            total_interactions,
            first_interaction,
            last_interaction,
            emotional_recognition: MetricStats::from_trend(emotional),
            compassion_score: MetricStats::from_trend(compassion),
            mindfulness_level: MetricStats::from_trend(mindfulness),
        }
    }

    pub fn total_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn get(&self, kind: MetricKind) -> &MetricStats {
        match kind {
            MetricKind::EmotionalRecognition => &self.emotional_recognition,
            MetricKind::CompassionScore => &self.compassion_score,
            MetricKind::MindfulnessLevel => &self.mindfulness_level,
        }
    }

    /// Correlation of two metrics across all interactions
    pub fn correlation(&self, a: MetricKind, b: MetricKind) -> Option<f64> {
        correlation(&self.get(a).trend, &self.get(b).trend)
    }

    /// Band label of the mean, or `None` when there is no data
    pub fn assessment(&self, kind: MetricKind) -> Option<&'static str> {
        let stats = self.get(kind);
        (stats.count > 0).then(|| kind.describe(stats.mean))
    }

    pub fn to_json(&self) -> Result<String, AggregateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Read-only view over a recorder's persisted sessions
pub struct Aggregator<'a> {
    recorder: &'a SessionRecorder,
}

impl<'a> Aggregator<'a> {
    pub fn new(recorder: &'a SessionRecorder) -> Self {
        Self { recorder }
    }

    /// Summarize the given sessions from their persisted state.
    ///
    /// An empty set yields zeroed statistics.
    pub fn summarize(&self, session_ids: &BTreeSet<SessionId>) -> Result<AggregateStats, AggregateError> {
        let sessions = session_ids
            .iter()
            .map(|id| self.recorder.load(id))
            .collect::<Result<Vec<_>, _>>()?;

        let stats = AggregateStats::from_sessions(&sessions);
        tracing::info!(
            sessions = stats.total_sessions(),
            interactions = stats.total_interactions,
            "Sessions summarized"
        );
        Ok(stats)
    }

    /// Summarize every persisted session
    pub fn summarize_all(&self) -> Result<AggregateStats, AggregateError> {
        let ids: BTreeSet<SessionId> = self.recorder.list_sessions()?.into_iter().collect();
        self.summarize(&ids)
    }
}
