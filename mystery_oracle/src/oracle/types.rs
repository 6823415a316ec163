//! Requests and results exchanged with the orchestration layer.
//!
//! Nothing in here can carry a guilt flag or a secret verbatim.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_NERVOUSNESS, DEFAULT_TRUST};
use crate::disclosure::{ConversationEntry, DisclosureSnapshot};

/// One interrogation turn as the orchestrator sends it.
///
/// The numeric levels are the caller's running counters and overwrite the
/// oracle's own for this turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectResponseRequest {
    pub suspect_name: String,
    pub question: String,
    /// Earlier exchanges. When empty, the oracle's own log is used.
    #[serde(default)]
    pub history: Vec<ConversationEntry>,
    pub trust: u8,
    pub nervousness: u8,
    #[serde(default)]
    pub contradictions_caught: u32,
}

impl SuspectResponseRequest {
    pub fn new(suspect_name: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            suspect_name: suspect_name.into(),
            question: question.into(),
            history: Vec::new(),
            trust: DEFAULT_TRUST,
            nervousness: DEFAULT_NERVOUSNESS,
            contradictions_caught: 0,
        }
    }

    /// Carry the numbers from the last published snapshot.
    pub fn from_snapshot(
        suspect_name: impl Into<String>,
        question: impl Into<String>,
        snapshot: &DisclosureSnapshot,
    ) -> Self {
        Self::new(suspect_name, question).with_levels(
            snapshot.trust,
            snapshot.nervousness,
            snapshot.contradictions_caught,
        )
    }

    pub fn with_history(mut self, history: Vec<ConversationEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_levels(mut self, trust: u8, nervousness: u8, contradictions_caught: u32) -> Self {
        self.trust = trust;
        self.nervousness = nervousness;
        self.contradictions_caught = contradictions_caught;
        self
    }
}

/// A suspect's answer and what it changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectResponse {
    /// First-person, in-character line.
    pub response_text: String,
    /// Effective change after clamping.
    pub trust_delta: i32,
    pub nervousness_delta: i32,
    /// Where the suspect pointed the player, if they did this turn.
    pub revealed_location_hint: Option<String>,
    pub revealed_secret: bool,
}

impl SuspectResponse {
    pub(crate) fn unknown_suspect(name: &str) -> Self {
        let name = name.trim();
        let who = if name.is_empty() { "Who" } else { name };
        Self {
            response_text: format!("{who}? I don't know who that is."),
            trust_delta: 0,
            nervousness_delta: 0,
            revealed_location_hint: None,
            revealed_secret: false,
        }
    }
}

/// The only suspect view safe for UI and prompt templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicSuspectInfo {
    pub name: String,
    pub role: String,
    pub personality: String,
    pub alibi: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlibiCheckStatus {
    Checked,
    UnknownSuspect,
    /// The graph holds nothing for that suspect at that time.
    NoRecord,
}

/// How a claimed alibi holds up against the encounter graph.
///
/// Observers are given by suspect name where the role belongs to a suspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlibiCheck {
    pub status: AlibiCheckStatus,
    /// `None` unless `status` is `Checked`.
    pub is_truthful: Option<bool>,
    pub corroborators: Vec<String>,
    pub contradictors: Vec<String>,
    /// Whether the claimed location is the one the suspect has on record.
    pub matches_recorded_claim: Option<bool>,
}

impl AlibiCheck {
    pub(crate) fn unresolved(status: AlibiCheckStatus) -> Self {
        Self {
            status,
            is_truthful: None,
            corroborators: Vec::new(),
            contradictors: Vec::new(),
            matches_recorded_claim: None,
        }
    }
}
