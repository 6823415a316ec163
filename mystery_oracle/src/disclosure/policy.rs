//! Disclosure policy - emotional deltas and the two reveal gates.
//!
//! Everything here is a pure function of the suspect's guilt flag, the
//! current disclosure state and the player's question.

use serde::{Deserialize, Serialize};

use super::SuspectDisclosureState;

/// Thresholds for the location-hint and secret gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureThresholds {
    /// Trust the murderer needs before offering a location hint.
    pub guilty_hint_trust: u8,
    /// Trust an innocent suspect needs before offering a location hint.
    pub innocent_hint_trust: u8,
    /// Nervousness at which the murderer cracks...
    pub guilty_crack_nervousness: u8,
    /// ...provided they have been caught out at least this often.
    pub guilty_crack_contradictions: u32,
    /// Trust an innocent suspect needs before a probing question opens them up.
    pub innocent_secret_trust: u8,
}

impl Default for DisclosureThresholds {
    fn default() -> Self {
        Self {
            guilty_hint_trust: 85,
            innocent_hint_trust: 70,
            guilty_crack_nervousness: 90,
            guilty_crack_contradictions: 2,
            innocent_secret_trust: 60,
        }
    }
}

/// How much each kind of question moves trust and nervousness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalDeltas {
    pub aggressive_trust: i32,
    pub aggressive_nervousness_guilty: i32,
    pub aggressive_nervousness_innocent: i32,
    pub friendly_trust: i32,
    pub friendly_nervousness: i32,
    pub confrontation_nervousness_guilty: i32,
    pub confrontation_nervousness_innocent: i32,
}

impl Default for EmotionalDeltas {
    fn default() -> Self {
        Self {
            aggressive_trust: -5,
            aggressive_nervousness_guilty: 10,
            aggressive_nervousness_innocent: 5,
            friendly_trust: 5,
            friendly_nervousness: -5,
            confrontation_nervousness_guilty: 15,
            confrontation_nervousness_innocent: 5,
        }
    }
}

/// Lexical cues looked for in the player's question.
///
/// Matching is case-insensitive substring matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueLexicon {
    pub aggressive: Vec<String>,
    pub friendly: Vec<String>,
    pub confrontation: Vec<String>,
    pub probing: Vec<String>,
}

impl Default for CueLexicon {
    fn default() -> Self {
        fn words(list: &[&str]) -> Vec<String> {
            list.iter().map(|w| w.to_string()).collect()
        }

        Self {
            aggressive: words(&[
                "liar", "lying", "killed", "murder", "guilty", "confess", "admit", "truth",
                "suspicious", "caught", "you did it",
            ]),
            friendly: words(&["help", "understand", "sorry", "difficult", "appreciate", "thank"]),
            confrontation: words(&[
                "but you said", "you told me", "earlier you", "contradict", "doesn't match",
                "someone saw you", "witness",
            ]),
            probing: words(&[
                "why", "motive", "reason", "relationship", "hate", "secret", "hiding", "truth",
                "really", "feel about",
            ]),
        }
    }
}

impl CueLexicon {
    fn hits(list: &[String], question: &str) -> bool {
        list.iter().any(|cue| question.contains(cue.to_lowercase().as_str()))
    }
}

/// Change in trust and nervousness caused by one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmotionalImpact {
    pub trust_delta: i32,
    pub nervousness_delta: i32,
}

/// Outcome of a gate check, with the reason for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub open: bool,
    pub reason: GateReason,
}

impl GateDecision {
    fn open(reason: GateReason) -> Self {
        Self { open: true, reason }
    }

    fn closed(reason: GateReason) -> Self {
        Self {
            open: false,
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateReason {
    NoHint,
    AlreadyRevealed,
    TrustReached { trust: u8, threshold: u8 },
    TrustShort { trust: u8, threshold: u8 },
    NotProbing,
    Cracked { nervousness: u8, contradictions: u32 },
    Holding { nervousness: u8, contradictions: u32 },
}

/// The complete disclosure rule set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosurePolicy {
    pub thresholds: DisclosureThresholds,
    pub deltas: EmotionalDeltas,
    pub cues: CueLexicon,
}

impl DisclosurePolicy {
    /// How a question moves the suspect's emotions.
    ///
    /// Aggression, friendliness and confrontation are scored independently
    /// and summed, so one question can hit several categories.
    pub fn emotional_impact(&self, guilty: bool, question: &str) -> EmotionalImpact {
        let question = question.to_lowercase();
        let d = &self.deltas;
        let mut impact = EmotionalImpact::default();

        if CueLexicon::hits(&self.cues.aggressive, &question) {
            impact.trust_delta += d.aggressive_trust;
            impact.nervousness_delta += if guilty {
                d.aggressive_nervousness_guilty
            } else {
                d.aggressive_nervousness_innocent
            };
        }

        if CueLexicon::hits(&self.cues.friendly, &question) {
            impact.trust_delta += d.friendly_trust;
            impact.nervousness_delta += d.friendly_nervousness;
        }

        if CueLexicon::hits(&self.cues.confrontation, &question) {
            impact.nervousness_delta += if guilty {
                d.confrontation_nervousness_guilty
            } else {
                d.confrontation_nervousness_innocent
            };
        }

        impact
    }

    pub fn is_probing(&self, question: &str) -> bool {
        CueLexicon::hits(&self.cues.probing, &question.to_lowercase())
    }

    /// Should the suspect point the player at their location hint?
    ///
    /// Re-checked every turn with no hysteresis.
    pub fn location_gate(
        &self,
        guilty: bool,
        has_hint: bool,
        state: &SuspectDisclosureState,
    ) -> GateDecision {
        if !has_hint {
            return GateDecision::closed(GateReason::NoHint);
        }

        let threshold = if guilty {
            self.thresholds.guilty_hint_trust
        } else {
            self.thresholds.innocent_hint_trust
        };
        let trust = state.trust();

        if trust >= threshold {
            GateDecision::open(GateReason::TrustReached { trust, threshold })
        } else {
            GateDecision::closed(GateReason::TrustShort { trust, threshold })
        }
    }

    /// Should the suspect give up their secret this turn?
    ///
    /// Terminal: once the secret is out, the gate stays shut.
    pub fn secret_gate(
        &self,
        guilty: bool,
        state: &SuspectDisclosureState,
        question: &str,
    ) -> GateDecision {
        if state.secret_revealed() {
            return GateDecision::closed(GateReason::AlreadyRevealed);
        }

        let t = &self.thresholds;
        if guilty {
            let nervousness = state.nervousness();
            let contradictions = state.contradictions_caught();
            if nervousness >= t.guilty_crack_nervousness
                && contradictions >= t.guilty_crack_contradictions
            {
                GateDecision::open(GateReason::Cracked {
                    nervousness,
                    contradictions,
                })
            } else {
                GateDecision::closed(GateReason::Holding {
                    nervousness,
                    contradictions,
                })
            }
        } else {
            let trust = state.trust();
            let threshold = t.innocent_secret_trust;
            if trust < threshold {
                GateDecision::closed(GateReason::TrustShort { trust, threshold })
            } else if !self.is_probing(question) {
                GateDecision::closed(GateReason::NotProbing)
            } else {
                GateDecision::open(GateReason::TrustReached { trust, threshold })
            }
        }
    }
}
