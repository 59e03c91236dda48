//! Session and Interaction - the persisted conversation log
//!
//! A `Session` is append-only: interactions can be added but never edited or removed.

use crate::error::CoreError;
use crate::metrics::MetricSample;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of a session identifier
pub const SESSION_ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp-derived session identifier (`YYYYMMDD_HHMMSS`).
///
/// Lexicographic order equals chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Derive the identifier for a point in time (second precision)
    pub fn from_time(time: DateTime<Utc>) -> Self {
        Self(time.format(SESSION_ID_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SessionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Length check guards against chrono accepting unpadded fields
        if s.len() != 15 || NaiveDateTime::parse_from_str(s, SESSION_ID_FORMAT).is_err() {
            return Err(CoreError::InvalidSessionId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for SessionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Analysis block embedded in each interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionAnalysis {
    pub metrics: MetricSample,
}

/// One user-input / system-response pair with its computed metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    timestamp: DateTime<Utc>,
    user_input: String,
    system_response: String,
    analysis: InteractionAnalysis,
}

impl Interaction {
    pub fn new(
        timestamp: DateTime<Utc>,
        user_input: impl Into<String>,
        system_response: impl Into<String>,
        metrics: MetricSample,
    ) -> Self {
        Self {
            timestamp,
            user_input: user_input.into(),
            system_response: system_response.into(),
            analysis: InteractionAnalysis { metrics },
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn system_response(&self) -> &str {
        &self.system_response
    }

    pub fn metrics(&self) -> &MetricSample {
        &self.analysis.metrics
    }
}

/// One continuous conversational unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    session_id: SessionId,
    start_time: DateTime<Utc>,
    interactions: Vec<Interaction>,
}

impl Session {
    /// Create an empty session
    pub fn new(session_id: SessionId, start_time: DateTime<Utc>) -> Self {
        Self {
            session_id,
            start_time,
            interactions: Vec::new(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Timestamp of the most recent interaction
    pub fn last_interaction(&self) -> Option<DateTime<Utc>> {
        self.interactions.last().map(|i| i.timestamp)
    }

    /// Append an interaction (the only mutation a session supports)
    pub fn append(&mut self, interaction: Interaction) {
        self.interactions.push(interaction);
    }
}
