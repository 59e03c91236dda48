//! Empathy research report rendering

use crate::error::AggregateError;
use crate::stats::AggregateStats;
use chrono::{DateTime, Utc};
use dhamma_core::MetricKind;
use serde::Serialize;

/// Static description of one metric
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub scale: &'static str,
    pub interpretation: [(&'static str, &'static str); 3],
    pub methodology: &'static str,
}

pub fn describe_metric(kind: MetricKind) -> MetricDescription {
    match kind {
        MetricKind::EmotionalRecognition => MetricDescription {
            name: kind.title(),
            description: "Measures the ability to detect and recognize emotional content in user input.",
            scale: "0.0 to 1.0",
            interpretation: [
                ("High", "> 0.5: Strong emotional content detected"),
                ("Moderate", "0.3 - 0.5: Moderate emotional content"),
                ("Low", "< 0.3: Neutral"),
            ],
            methodology: "Net polarity of emotion-bearing terms, amplified by self-report cues and intensifiers.",
        },
        MetricKind::CompassionScore => MetricDescription {
            name: kind.title(),
            description: "Evaluates the response quality in terms of compassionate engagement.",
            scale: "0.0 to 1.0",
            interpretation: [
                ("High", "> 0.7: Highly compassionate response"),
                ("Moderate", "0.4 - 0.7: Moderately compassionate"),
                ("Low", "< 0.4: Limited compassion demonstrated"),
            ],
            methodology: "Weighted detection of compassionate language, acknowledgment of feelings and supportive phrases.",
        },
        MetricKind::MindfulnessLevel => MetricDescription {
            name: kind.title(),
            description: "Assesses the presence of mindful communication elements in responses.",
            scale: "0.0 to 1.0",
            interpretation: [
                ("High", "> 0.7: Strong mindful communication"),
                ("Moderate", "0.4 - 0.7: Moderate mindfulness"),
                ("Low", "< 0.4: Limited mindful elements"),
            ],
            methodology: "Weighted detection of present-moment language and invitations to pause or reflect.",
        },
    }
}

/// Research report over a set of sessions
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub generated_at: DateTime<Utc>,
    pub stats: AggregateStats,
}

impl ResearchReport {
    pub fn new(stats: AggregateStats) -> Self {
        Self::at(stats, Utc::now())
    }

    pub fn at(stats: AggregateStats, generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            stats,
        }
    }

    pub fn to_json(&self) -> Result<String, AggregateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self) -> String {
        let stats = &self.stats;
        let mut lines: Vec<String> = vec![
            "DhammaShell Empathy Research Report".to_string(),
            "=".repeat(50),
            format!("Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S")),
            String::new(),
        ];

        push_section(&mut lines, "Session Information");
        let ids: Vec<&str> = stats.sessions.iter().map(|id| id.as_str()).collect();
        let ids = if ids.is_empty() { "none".to_string() } else { ids.join(", ") };
        lines.push(format!("sessions: {}", ids));
        lines.push(format!("total_sessions: {}", stats.total_sessions()));
        lines.push(format!("total_interactions: {}", stats.total_interactions));
        lines.push(String::new());

        push_section(&mut lines, "Metrics Description");
        lines.push("This report analyzes three key metrics of empathetic interaction:".to_string());
        lines.push(String::new());
        for kind in MetricKind::ALL {
            let info = describe_metric(kind);
            lines.push(format!("{}:", info.name));
            lines.push(format!("  Description: {}", info.description));
            lines.push(format!("  Scale: {}", info.scale));
            lines.push("  Interpretation:".to_string());
            for (level, text) in info.interpretation {
                lines.push(format!("    • {}: {}", level, text));
            }
            lines.push(format!("  Methodology: {}", info.methodology));
            lines.push(String::new());
        }

        push_section(&mut lines, "Metrics Summary");
        if stats.total_interactions == 0 {
            lines.push("No interactions recorded.".to_string());
        }
        for kind in MetricKind::ALL {
            let Some(assessment) = stats.assessment(kind) else {
                continue;
            };
            let metric = stats.get(kind);
            lines.push(format!("{}:", kind.title()));
            lines.push(format!("  count: {}", metric.count));
            lines.push(format!("  mean: {:.2}", metric.mean));
            lines.push(format!("  min: {:.2}", metric.min));
            lines.push(format!("  max: {:.2}", metric.max));
            lines.push(format!("  median: {:.2}", metric.median));
            lines.push(format!("  std_dev: {:.2}", metric.std_dev));
            if let Some([q1, q2, q3]) = metric.quartiles {
                lines.push(format!("  quartiles: {:.2} / {:.2} / {:.2}", q1, q2, q3));
            }
            lines.push(format!("  trend slope: {:+.4}", metric.slope));
            lines.push(format!("  Overall Assessment: {}", assessment));
        }
        lines.push(String::new());

        let pairs = [
            (MetricKind::EmotionalRecognition, MetricKind::CompassionScore),
            (MetricKind::EmotionalRecognition, MetricKind::MindfulnessLevel),
            (MetricKind::CompassionScore, MetricKind::MindfulnessLevel),
        ];
        if stats.total_interactions >= 2 {
            push_section(&mut lines, "Metric Correlations");
            for (a, b) in pairs {
                let value = match stats.correlation(a, b) {
                    Some(r) => format!("{:+.2}", r),
                    None => "n/a".to_string(),
                };
                lines.push(format!("{} / {}: {}", a.title(), b.title(), value));
            }
            lines.push(String::new());
        }

        push_section(&mut lines, "Interaction Analysis");
        lines.push(format!("total_interactions: {}", stats.total_interactions));
        if let (Some(first), Some(last)) = (stats.first_interaction, stats.last_interaction) {
            lines.push(format!("first_interaction: {}", first.to_rfc3339()));
            lines.push(format!("last_interaction: {}", last.to_rfc3339()));
        }

        lines.join("\n")
    }
}

fn push_section(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_string());
    lines.push("-".repeat(20));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dhamma_core::{Interaction, MetricSample, Session, SessionId};

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
    }

    fn stats_with(values: &[(f64, f64, f64)]) -> AggregateStats {
        let start = Utc.with_ymd_and_hms(2025, 3, 4, 5, 0, 0).unwrap();
        let mut session = Session::new(SessionId::from_time(start), start);
        for &(e, c, m) in values {
            session.append(Interaction::new(start, "in", "out", MetricSample::new(e, c, m).unwrap()));
        }
        AggregateStats::from_sessions(&[session])
    }

    #[test]
    fn test_render_with_data() {
        let report = ResearchReport::at(stats_with(&[(0.9, 0.8, 0.2), (0.7, 0.9, 0.3)]), generated());
        let text = report.render();

        assert!(text.starts_with("DhammaShell Empathy Research Report\n"));
        assert!(text.contains("Generated: 2025-03-04 05:06:07"));
        assert!(text.contains("sessions: 20250304_050000"));
        assert!(text.contains("  mean: 0.80\n  min: 0.70\n  max: 0.90"));
        assert!(text.contains("  median: 0.80\n  std_dev: 0.14\n  trend slope: -0.2000"));
        assert!(!text.contains("quartiles:"));
        assert!(text.contains("Metric Correlations\n--------------------\n"));
        assert!(text.contains(": -1.00"));
        assert!(text.contains("  Overall Assessment: strong emotional content"));
        assert!(text.contains("  Overall Assessment: high"));
        assert!(text.contains("  Overall Assessment: low"));
        assert!(text.contains("first_interaction: 2025-03-04T05:00:00+00:00"));
    }

    #[test]
    fn test_render_empty() {
        let report = ResearchReport::at(AggregateStats::from_sessions(&[]), generated());
        let text = report.render();

        assert!(text.contains("sessions: none"));
        assert!(text.contains("No interactions recorded."));
        assert!(!text.contains("Overall Assessment"));
        assert!(!text.contains("first_interaction"));
        assert!(!text.contains("Metric Correlations"));
    }

    #[test]
    fn test_descriptions_cover_every_metric() {
        for kind in MetricKind::ALL {
            let info = describe_metric(kind);
            assert_eq!(info.name, kind.title());
            assert_eq!(info.scale, "0.0 to 1.0");
        }
    }

    #[test]
    fn test_json_contains_stats() {
        let report = ResearchReport::at(stats_with(&[(0.5, 0.5, 0.5)]), generated());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["generated_at"], "2025-03-04T05:06:07Z");
        assert_eq!(value["stats"]["total_interactions"], 1);
    }
}
