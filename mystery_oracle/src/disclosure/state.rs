//! Mutable state the oracle keeps about each interrogated suspect.

use serde::{Deserialize, Serialize};

use super::EmotionalImpact;

/// Upper bound of the trust and nervousness meters.
pub const METER_MAX: u8 = 100;

/// One question and answer in a suspect's conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub answer: String,
    /// 1-based turn number within this suspect's log.
    pub turn: u32,
}

/// Trust, nervousness and what a suspect has already given away.
///
/// Only the oracle writes this; everything else sees a
/// [`DisclosureSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspectDisclosureState {
    trust: u8,
    nervousness: u8,
    contradictions_caught: u32,
    secret_revealed: bool,
    location_hint_revealed: bool,
    log: Vec<ConversationEntry>,
}

impl SuspectDisclosureState {
    pub fn new(trust: u8, nervousness: u8) -> Self {
        Self {
            trust: trust.min(METER_MAX),
            nervousness: nervousness.min(METER_MAX),
            contradictions_caught: 0,
            secret_revealed: false,
            location_hint_revealed: false,
            log: Vec::new(),
        }
    }

    pub fn trust(&self) -> u8 {
        self.trust
    }

    pub fn nervousness(&self) -> u8 {
        self.nervousness
    }

    pub fn contradictions_caught(&self) -> u32 {
        self.contradictions_caught
    }

    pub fn secret_revealed(&self) -> bool {
        self.secret_revealed
    }

    pub fn location_hint_revealed(&self) -> bool {
        self.location_hint_revealed
    }

    pub fn log(&self) -> &[ConversationEntry] {
        &self.log
    }

    /// The last `window` exchanges, oldest first.
    pub fn recent(&self, window: usize) -> &[ConversationEntry] {
        let start = self.log.len().saturating_sub(window);
        &self.log[start..]
    }

    pub fn snapshot(&self) -> DisclosureSnapshot {
        DisclosureSnapshot {
            trust: self.trust,
            nervousness: self.nervousness,
            contradictions_caught: self.contradictions_caught,
            secret_revealed: self.secret_revealed,
            conversation_turns: self.log.len(),
        }
    }

    /// Replace the numeric levels with the caller's view of them.
    pub(crate) fn overwrite_levels(&mut self, trust: u8, nervousness: u8, contradictions: u32) {
        self.trust = trust.min(METER_MAX);
        self.nervousness = nervousness.min(METER_MAX);
        self.contradictions_caught = contradictions;
    }

    /// Apply an emotional impact, clamping both meters into `0..=100`.
    ///
    /// Returns the change that actually happened after clamping.
    pub(crate) fn apply(&mut self, impact: EmotionalImpact) -> EmotionalImpact {
        let before = (self.trust, self.nervousness);
        self.trust = clamp_meter(self.trust, impact.trust_delta);
        self.nervousness = clamp_meter(self.nervousness, impact.nervousness_delta);
        EmotionalImpact {
            trust_delta: i32::from(self.trust) - i32::from(before.0),
            nervousness_delta: i32::from(self.nervousness) - i32::from(before.1),
        }
    }

    pub(crate) fn record_contradiction(&mut self) {
        self.contradictions_caught = self.contradictions_caught.saturating_add(1);
    }

    pub(crate) fn mark_secret_revealed(&mut self) {
        self.secret_revealed = true;
    }

    pub(crate) fn mark_location_hint_revealed(&mut self) {
        self.location_hint_revealed = true;
    }

    pub(crate) fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let turn = u32::try_from(self.log.len()).map_or(u32::MAX, |n| n.saturating_add(1));
        self.log.push(ConversationEntry {
            question: question.into(),
            answer: answer.into(),
            turn,
        });
    }
}

fn clamp_meter(value: u8, delta: i32) -> u8 {
    let clamped = (i32::from(value) + delta).clamp(0, i32::from(METER_MAX));
    // In range after the clamp above.
    clamped as u8
}

/// Read-only numbers for UI meters, taken between turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureSnapshot {
    pub trust: u8,
    pub nervousness: u8,
    pub contradictions_caught: u32,
    pub secret_revealed: bool,
    pub conversation_turns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_levels() {
        let state = SuspectDisclosureState::new(250, 30);
        assert_eq!(state.trust(), 100);
        assert_eq!(state.nervousness(), 30);
        assert!(!state.secret_revealed());
        assert!(state.log().is_empty());
    }

    #[test]
    fn test_apply_clamps_and_reports_effective_delta() {
        let mut state = SuspectDisclosureState::new(98, 3);
        let applied = state.apply(EmotionalImpact {
            trust_delta: 5,
            nervousness_delta: -5,
        });

        assert_eq!(state.trust(), 100);
        assert_eq!(state.nervousness(), 0);
        assert_eq!(applied.trust_delta, 2);
        assert_eq!(applied.nervousness_delta, -3);
    }

    #[test]
    fn test_meters_stay_in_range_over_many_turns() {
        let mut state = SuspectDisclosureState::new(50, 30);
        for i in 0..200 {
            let sign = if i % 7 < 4 { 1 } else { -1 };
            state.apply(EmotionalImpact {
                trust_delta: 15 * sign,
                nervousness_delta: -25 * sign,
            });
            assert!(state.trust() <= METER_MAX);
            assert!(state.nervousness() <= METER_MAX);
        }
    }

    #[test]
    fn test_log_keeps_turn_order() {
        let mut state = SuspectDisclosureState::new(50, 30);
        state.record_exchange("Where were you?", "In the kitchen.");
        state.record_exchange("Alone?", "Yes.");
        state.record_exchange("Why?", "Dessert.");

        let turns: Vec<u32> = state.log().iter().map(|e| e.turn).collect();
        assert_eq!(turns, vec![1, 2, 3]);
        assert_eq!(state.recent(2)[0].question, "Alone?");
        assert_eq!(state.recent(10).len(), 3);
    }

    #[test]
    fn test_snapshot_mirrors_numbers() {
        let mut state = SuspectDisclosureState::new(50, 30);
        state.record_contradiction();
        state.record_exchange("q", "a");
        state.mark_secret_revealed();

        let snap = state.snapshot();
        assert_eq!(snap.contradictions_caught, 1);
        assert_eq!(snap.conversation_turns, 1);
        assert!(snap.secret_revealed);
    }
}
