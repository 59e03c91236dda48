//! Pre/post empathy assessment
//!
//! A participant answers the same questionnaire before and after a research session.
//! Scale answers (1-5) are scored; open-ended answers and their follow-ups are kept as
//! insights.

use crate::error::CoreError;
use crate::session::SESSION_ID_FORMAT;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// When the questionnaire is taken relative to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssessmentKind {
    Pre,
    Post,
}

/// How a question is answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionFormat {
    Scale { min: u8, max: u8, description: String },
    OpenEnded { follow_up_prompt: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(flatten)]
    pub format: QuestionFormat,
}

const SCALE_QUESTIONS: [(&str, &str, &str); 3] = [
    (
        "empathy_1",
        "How well do you understand others' emotions?",
        "1 = Not at all, 5 = Very well",
    ),
    (
        "empathy_2",
        "How often do you feel moved by others' experiences?",
        "1 = Rarely, 5 = Very often",
    ),
    (
        "empathy_3",
        "How comfortable are you discussing emotional topics?",
        "1 = Very uncomfortable, 5 = Very comfortable",
    ),
];

const OPEN_QUESTIONS: [(&str, &str, &str); 3] = [
    (
        "empathy_4",
        "Can you describe a time when you felt deeply connected to someone else's emotional experience?",
        "Tell me more about how this experience affected your understanding of empathy.",
    ),
    (
        "empathy_5",
        "How do you typically respond when someone shares their emotional struggles with you?",
        "What do you think makes your response effective or ineffective in these situations?",
    ),
    (
        "empathy_6",
        "What does empathy mean to you in your daily life?",
        "How has your understanding of empathy evolved over time?",
    ),
];

/// The standard questionnaire: three 1-5 scale questions, then three open-ended ones
pub fn standard_questions() -> Vec<Question> {
    let scale = SCALE_QUESTIONS.iter().map(|&(id, question, description)| Question {
        id: id.to_string(),
        question: question.to_string(),
        format: QuestionFormat::Scale {
            min: 1,
            max: 5,
            description: description.to_string(),
        },
    });
    let open = OPEN_QUESTIONS.iter().map(|&(id, question, prompt)| Question {
        id: id.to_string(),
        question: question.to_string(),
        format: QuestionFormat::OpenEnded {
            follow_up_prompt: prompt.to_string(),
        },
    });
    scale.chain(open).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub question_id: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub question_id: String,
    pub follow_up: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// One questionnaire run, persisted as `<kind>_<YYYYMMDD_HHMMSS>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    test_id: String,
    user_id: Option<String>,
    test_type: AssessmentKind,
    start_time: DateTime<Utc>,
    questions: Vec<Question>,
    responses: Vec<AssessmentResponse>,
    follow_ups: Vec<FollowUp>,
}

impl Assessment {
    pub fn start(kind: AssessmentKind, user_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            test_id: format!("{}_{}", kind, now.format(SESSION_ID_FORMAT)),
            user_id,
            test_type: kind,
            start_time: now,
            questions: standard_questions(),
            responses: Vec::new(),
            follow_ups: Vec::new(),
        }
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn kind(&self) -> AssessmentKind {
        self.test_type
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &[AssessmentResponse] {
        &self.responses
    }

    pub fn follow_ups(&self) -> &[FollowUp] {
        &self.follow_ups
    }

    pub fn question(&self, question_id: &str) -> Result<&Question, CoreError> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| CoreError::UnknownQuestion(question_id.to_string()))
    }

    /// Record an answer. Scale answers must be an integer within the question's range.
    pub fn record_response(
        &mut self,
        question_id: &str,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let response = response.trim();
        if let QuestionFormat::Scale { min, max, .. } = self.question(question_id)?.format {
            match response.parse::<u8>() {
                Ok(value) if (min..=max).contains(&value) => {}
                _ => {
                    return Err(CoreError::InvalidAnswer {
                        question_id: question_id.to_string(),
                        answer: response.to_string(),
                    })
                }
            }
        }

        self.responses.push(AssessmentResponse {
            question_id: question_id.to_string(),
            response: response.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Record a follow-up exchange on an open-ended question
    pub fn record_follow_up(
        &mut self,
        question_id: &str,
        follow_up: &str,
        response: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        if !matches!(self.question(question_id)?.format, QuestionFormat::OpenEnded { .. }) {
            return Err(CoreError::NotOpenEnded(question_id.to_string()));
        }

        self.follow_ups.push(FollowUp {
            question_id: question_id.to_string(),
            follow_up: follow_up.to_string(),
            response: response.to_string(),
            timestamp: now,
        });
        Ok(())
    }

    /// Score the scale answers and collect open-ended insights
    pub fn analyze(&self, now: DateTime<Utc>) -> Result<AssessmentAnalysis, CoreError> {
        if self.responses.is_empty() {
            return Err(CoreError::NoResponses(self.test_id.clone()));
        }

        let mut scale_values = Vec::new();
        let mut insights = Vec::new();
        for response in &self.responses {
            match self.question(&response.question_id)?.format {
                QuestionFormat::Scale { .. } => {
                    if let Ok(value) = response.response.parse::<u8>() {
                        scale_values.push(value);
                    }
                }
                QuestionFormat::OpenEnded { .. } => insights.push(Insight {
                    question_id: response.question_id.clone(),
                    response: response.response.clone(),
                    follow_ups: self
                        .follow_ups
                        .iter()
                        .filter(|f| f.question_id == response.question_id)
                        .cloned()
                        .collect(),
                }),
            }
        }

        Ok(AssessmentAnalysis {
            test_id: self.test_id.clone(),
            test_type: self.test_type,
            timestamp: now,
            scores: ScoreSummary::from_values(&scale_values),
            insights,
        })
    }
}

/// Average, min and max over scale answers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub average: f64,
    pub min: u8,
    pub max: u8,
}

impl ScoreSummary {
    fn from_values(values: &[u8]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
        Some(Self {
            average: f64::from(sum) / values.len() as f64,
            min,
            max,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub question_id: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<FollowUp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentAnalysis {
    pub test_id: String,
    pub test_type: AssessmentKind,
    pub timestamp: DateTime<Utc>,
    /// `None` when no scale question was answered
    pub scores: Option<ScoreSummary>,
    pub insights: Vec<Insight>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 5, 6, 7, 8).unwrap()
    }

    #[test]
    fn test_start_assessment() {
        let assessment = Assessment::start(AssessmentKind::Pre, Some("p-01".to_string()), now());
        assert_eq!(assessment.test_id(), "pre_20250405_060708");
        assert_eq!(assessment.user_id(), Some("p-01"));
        assert_eq!(assessment.questions().len(), 6);
        assert!(assessment.responses().is_empty());

        let post = Assessment::start(AssessmentKind::Post, None, now());
        assert_eq!(post.test_id(), "post_20250405_060708");
    }

    #[test]
    fn test_scale_answers_validated() {
        let mut assessment = Assessment::start(AssessmentKind::Pre, None, now());
        assessment.record_response("empathy_1", " 4 ", now()).unwrap();
        assert_eq!(assessment.responses()[0].response, "4");

        for bad in ["0", "6", "three", ""] {
            assert!(matches!(
                assessment.record_response("empathy_2", bad, now()),
                Err(CoreError::InvalidAnswer { .. })
            ));
        }
        assert!(matches!(
            assessment.record_response("empathy_9", "3", now()),
            Err(CoreError::UnknownQuestion(_))
        ));
        assert_eq!(assessment.responses().len(), 1);
    }

    #[test]
    fn test_follow_up_only_on_open_questions() {
        let mut assessment = Assessment::start(AssessmentKind::Post, None, now());
        assessment
            .record_follow_up("empathy_4", "Tell me more", "It changed how I listen", now())
            .unwrap();
        assert!(matches!(
            assessment.record_follow_up("empathy_1", "Why?", "Because", now()),
            Err(CoreError::NotOpenEnded(_))
        ));
        assert_eq!(assessment.follow_ups().len(), 1);
    }

    #[test]
    fn test_analyze() {
        let mut assessment = Assessment::start(AssessmentKind::Pre, None, now());
        assessment.record_response("empathy_1", "4", now()).unwrap();
        assessment.record_response("empathy_2", "2", now()).unwrap();
        assessment.record_response("empathy_3", "3", now()).unwrap();
        assessment
            .record_response("empathy_4", "When a friend lost their job", now())
            .unwrap();
        assessment
            .record_follow_up("empathy_4", "Tell me more", "I stayed with them", now())
            .unwrap();
        assessment.record_response("empathy_6", "Listening first", now()).unwrap();

        let analysis = assessment.analyze(now()).unwrap();
        let scores = analysis.scores.unwrap();
        assert_eq!(scores.average, 3.0);
        assert_eq!((scores.min, scores.max), (2, 4));
        assert_eq!(analysis.insights.len(), 2);
        assert_eq!(analysis.insights[0].follow_ups.len(), 1);
        assert!(analysis.insights[1].follow_ups.is_empty());
    }

    #[test]
    fn test_analyze_requires_responses() {
        let assessment = Assessment::start(AssessmentKind::Pre, None, now());
        assert!(matches!(assessment.analyze(now()), Err(CoreError::NoResponses(_))));

        let mut open_only = Assessment::start(AssessmentKind::Post, None, now());
        open_only.record_response("empathy_5", "I listen", now()).unwrap();
        assert_eq!(open_only.analyze(now()).unwrap().scores, None);
    }

    #[test]
    fn test_serialized_layout() {
        let assessment = Assessment::start(AssessmentKind::Pre, None, now());
        let value = serde_json::to_value(&assessment).unwrap();
        assert_eq!(value["test_type"], "pre");
        assert_eq!(value["questions"][0]["type"], "scale");
        assert_eq!(value["questions"][0]["max"], 5);
        assert_eq!(value["questions"][3]["type"], "open_ended");

        let back: Assessment = serde_json::from_value(value).unwrap();
        assert_eq!(back, assessment);
    }
}
