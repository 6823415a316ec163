//! Session-scoped oracle state.
//!
//! One [`OracleSession`] per game in progress. The case and graph are shared
//! between sessions; everything that changes lives here.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use case_model::SuspectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionDefaults;
use crate::disclosure::{DisclosureSnapshot, SuspectDisclosureState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one accusation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AccusationOutcome {
    Correct,
    Wrong { remaining: u32 },
    /// Wrong accusations are used up, or the game had already ended.
    GameOver,
}

/// Wrong guesses so far and whether the case is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccusationLedger {
    wrong: Vec<String>,
    solved: bool,
}

impl AccusationLedger {
    pub fn wrong_accusations(&self) -> &[String] {
        &self.wrong
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_over(&self, max_wrong: u32) -> bool {
        self.solved || self.wrong_count() >= max_wrong
    }

    fn wrong_count(&self) -> u32 {
        u32::try_from(self.wrong.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn record(&mut self, accused: &str, correct: bool, max_wrong: u32) -> AccusationOutcome {
        if self.is_over(max_wrong) {
            return AccusationOutcome::GameOver;
        }

        if correct {
            self.solved = true;
            return AccusationOutcome::Correct;
        }

        self.wrong.push(accused.trim().to_string());
        match max_wrong.saturating_sub(self.wrong_count()) {
            0 => AccusationOutcome::GameOver,
            remaining => AccusationOutcome::Wrong { remaining },
        }
    }
}

type StateCell = Arc<tokio::sync::Mutex<SuspectDisclosureState>>;

/// Everything one game session has accumulated.
///
/// Each suspect's state sits behind its own async mutex: two turns with the
/// same suspect run one after the other, turns with different suspects run
/// side by side.
#[derive(Debug)]
pub struct OracleSession {
    id: SessionId,
    defaults: SessionDefaults,
    states: Mutex<HashMap<SuspectId, StateCell>>,
    published: RwLock<HashMap<SuspectId, DisclosureSnapshot>>,
    ledger: Mutex<AccusationLedger>,
}

impl OracleSession {
    pub fn new(defaults: SessionDefaults) -> Self {
        Self {
            id: SessionId::new(),
            defaults,
            states: Mutex::new(HashMap::new()),
            published: RwLock::new(HashMap::new()),
            ledger: Mutex::new(AccusationLedger::default()),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn defaults(&self) -> &SessionDefaults {
        &self.defaults
    }

    /// The numbers from the suspect's last completed turn.
    ///
    /// `None` until the suspect has been spoken to.
    pub fn snapshot(&self, suspect: SuspectId) -> Option<DisclosureSnapshot> {
        self.published
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&suspect)
            .copied()
    }

    /// The orchestrator caught this suspect in a contradiction.
    ///
    /// Waits for any turn in flight with the same suspect.
    pub async fn record_contradiction(&self, suspect: SuspectId) -> DisclosureSnapshot {
        let cell = self.state_cell(suspect);
        let mut state = cell.lock().await;
        state.record_contradiction();
        let snapshot = state.snapshot();
        self.publish(suspect, snapshot);
        snapshot
    }

    pub fn ledger(&self) -> AccusationLedger {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_game_over(&self) -> bool {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_over(self.defaults.max_wrong_accusations)
    }

    /// Start a new game in this session: all suspects back to defaults,
    /// accusations cleared.
    pub fn reset(&mut self) {
        self.id = SessionId::new();
        self.states.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        self.published.get_mut().unwrap_or_else(PoisonError::into_inner).clear();
        *self.ledger.get_mut().unwrap_or_else(PoisonError::into_inner) = AccusationLedger::default();
    }

    /// The suspect's state cell, created with the session defaults on first use.
    pub(crate) fn state_cell(&self, suspect: SuspectId) -> StateCell {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        states
            .entry(suspect)
            .or_insert_with(|| {
                Arc::new(tokio::sync::Mutex::new(SuspectDisclosureState::new(
                    self.defaults.trust,
                    self.defaults.nervousness,
                )))
            })
            .clone()
    }

    pub(crate) fn publish(&self, suspect: SuspectId, snapshot: DisclosureSnapshot) {
        self.published
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(suspect, snapshot);
    }

    pub(crate) fn record_accusation(&self, accused: &str, correct: bool) -> AccusationOutcome {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(accused, correct, self.defaults.max_wrong_accusations)
    }
}

impl Default for OracleSession {
    fn default() -> Self {
        Self::new(SessionDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_three_strikes() {
        let mut ledger = AccusationLedger::default();
        assert_eq!(ledger.record("Bram", false, 3), AccusationOutcome::Wrong { remaining: 2 });
        assert_eq!(ledger.record("Clara", false, 3), AccusationOutcome::Wrong { remaining: 1 });
        assert_eq!(ledger.record("Dorian", false, 3), AccusationOutcome::GameOver);
        assert!(ledger.is_over(3));
        assert!(!ledger.is_solved());

        // Nothing more is evaluated once the game is over.
        assert_eq!(ledger.record("Ada", true, 3), AccusationOutcome::GameOver);
        assert_eq!(ledger.wrong_accusations().len(), 3);
    }

    #[test]
    fn test_ledger_correct_closes_case() {
        let mut ledger = AccusationLedger::default();
        ledger.record("Bram", false, 3);
        assert_eq!(ledger.record("Ada", true, 3), AccusationOutcome::Correct);
        assert!(ledger.is_solved());
        assert!(ledger.is_over(3));
    }

    #[test]
    fn test_snapshot_absent_until_published() {
        let session = OracleSession::default();
        let id = SuspectId::new();
        assert!(session.snapshot(id).is_none());

        let snap = SuspectDisclosureState::new(50, 30).snapshot();
        session.publish(id, snap);
        assert_eq!(session.snapshot(id), Some(snap));
    }

    #[tokio::test]
    async fn test_record_contradiction_publishes() {
        let session = OracleSession::default();
        let id = SuspectId::new();

        session.record_contradiction(id).await;
        let snap = session.record_contradiction(id).await;

        assert_eq!(snap.contradictions_caught, 2);
        assert_eq!(session.snapshot(id).map(|s| s.contradictions_caught), Some(2));
    }

    #[test]
    fn test_state_cell_uses_session_defaults() {
        let session = OracleSession::new(SessionDefaults {
            trust: 70,
            nervousness: 10,
            max_wrong_accusations: 3,
        });
        let cell = session.state_cell(SuspectId::new());
        let state = cell.try_lock().unwrap();
        assert_eq!(state.trust(), 70);
        assert_eq!(state.nervousness(), 10);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut session = OracleSession::default();
        let before = session.id();
        let id = SuspectId::new();
        session.record_contradiction(id).await;
        session.record_accusation("Bram", false);

        session.reset();

        assert_ne!(session.id(), before);
        assert!(session.snapshot(id).is_none());
        assert!(session.ledger().wrong_accusations().is_empty());
        let cell = session.state_cell(id);
        assert_eq!(cell.lock().await.contradictions_caught(), 0);
    }
}
