//! The Mystery Oracle.
//!
//! The oracle is the only reader of guilt and secrets. The narrator talks to
//! it through a handful of operations whose results never carry either.

mod session;
mod types;

pub use session::*;
pub use types::*;

use std::sync::Arc;

use case_model::{CaseFile, CaseModel, EncounterGraph, LocationId, Role, Suspect, TimeSlot};
use tracing::{debug, info, warn};

use crate::config::OracleConfig;
use crate::disclosure::SuspectDisclosureState;
use crate::error::{OracleError, OracleResult};
use crate::synthesis::{
    fallback_utterance, normalize_utterance, CharacterProfile, DialogueSynthesizer,
    EmotionalSnapshot, GuiltBrief, RoleplayPrompt, SynthesisError,
};

/// Holds the case truth and serves narrator-safe answers about it.
pub struct MysteryOracle<S> {
    case: Arc<CaseModel>,
    graph: Arc<EncounterGraph>,
    config: OracleConfig,
    synthesizer: S,
}

impl<S: DialogueSynthesizer> MysteryOracle<S> {
    pub fn new(
        case: CaseModel,
        graph: EncounterGraph,
        config: OracleConfig,
        synthesizer: S,
    ) -> OracleResult<Self> {
        Self::from_shared(Arc::new(case), Arc::new(graph), config, synthesizer)
    }

    /// Build an oracle over a case and graph shared with other oracles.
    pub fn from_shared(
        case: Arc<CaseModel>,
        graph: Arc<EncounterGraph>,
        config: OracleConfig,
        synthesizer: S,
    ) -> OracleResult<Self> {
        case.check_graph(&graph)?;
        info!(
            suspects = case.suspects().len(),
            locations = graph.locations().len(),
            difficulty = ?config.difficulty,
            "mystery oracle initialised"
        );
        Ok(Self {
            case,
            graph,
            config,
            synthesizer,
        })
    }

    pub fn from_case_file(file: CaseFile, config: OracleConfig, synthesizer: S) -> OracleResult<Self> {
        Self::new(file.case, file.graph, config, synthesizer)
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// A fresh session with this oracle's starting values.
    pub fn new_session(&self) -> OracleSession {
        OracleSession::new(self.config.session.clone())
    }

    /// Suspect names in case order, for menus and the input parser.
    pub fn suspect_names(&self) -> Vec<String> {
        self.case.suspect_names().map(str::to_string).collect()
    }

    /// Resolve a player-facing name to the suspect's stable id.
    pub fn suspect_id(&self, name: &str) -> Option<case_model::SuspectId> {
        self.case.suspect_by_name(name).map(|s| s.id)
    }

    /// Run one interrogation turn.
    ///
    /// Deltas and gates are worked out on a copy of the suspect's state; the
    /// copy replaces the stored state only once the dialogue backend has
    /// produced a usable line. A failed, timed-out or dropped turn leaves the
    /// session as it was.
    pub async fn generate_suspect_response(
        &self,
        session: &OracleSession,
        request: SuspectResponseRequest,
    ) -> OracleResult<SuspectResponse> {
        let Some(suspect) = self.case.suspect_by_name(&request.suspect_name) else {
            warn!(
                session = %session.id(),
                suspect = %request.suspect_name,
                "interrogation of unknown suspect"
            );
            return Ok(SuspectResponse::unknown_suspect(&request.suspect_name));
        };

        let cell = session.state_cell(suspect.id);
        let mut stored = cell.lock().await;

        let mut next = stored.clone();
        next.overwrite_levels(
            request.trust,
            request.nervousness,
            request.contradictions_caught,
        );

        let policy = &self.config.policy;
        let impact = policy.emotional_impact(suspect.guilty, &request.question);
        let applied = next.apply(impact);

        let location_gate =
            policy.location_gate(suspect.guilty, suspect.location_hint.is_some(), &next);
        let secret_gate = policy.secret_gate(suspect.guilty, &next, &request.question);
        debug!(
            session = %session.id(),
            suspect = %suspect.name,
            trust = next.trust(),
            nervousness = next.nervousness(),
            location_gate = location_gate.open,
            secret_gate = secret_gate.open,
            "disclosure gates evaluated"
        );

        let revealed_location_hint = if location_gate.open {
            suspect.location_hint.clone()
        } else {
            None
        };

        let prompt = self.build_prompt(
            suspect,
            &next,
            &request,
            revealed_location_hint.as_deref(),
            secret_gate.open,
        );

        let text = match self.synthesize(&prompt, &suspect.name).await {
            Ok(text) => text,
            Err(source) => {
                warn!(
                    session = %session.id(),
                    suspect = %suspect.name,
                    error = %source,
                    "dialogue synthesis failed, turn not committed"
                );
                return Err(OracleError::Synthesis {
                    suspect: suspect.name.clone(),
                    fallback: fallback_utterance(&prompt.emotion),
                    source,
                });
            }
        };

        if secret_gate.open {
            next.mark_secret_revealed();
        }
        if revealed_location_hint.is_some() {
            next.mark_location_hint_revealed();
        }
        next.record_exchange(request.question.as_str(), text.as_str());
        *stored = next;
        session.publish(suspect.id, stored.snapshot());

        Ok(SuspectResponse {
            response_text: text,
            trust_delta: applied.trust_delta,
            nervousness_delta: applied.nervousness_delta,
            revealed_location_hint,
            revealed_secret: secret_gate.open,
        })
    }

    async fn synthesize(&self, prompt: &RoleplayPrompt, speaker: &str) -> Result<String, SynthesisError> {
        let timeout = self.config.synthesis.timeout();
        let raw = tokio::time::timeout(timeout, self.synthesizer.synthesize(prompt))
            .await
            .map_err(|_| SynthesisError::Timeout)??;
        normalize_utterance(&raw, speaker)
    }

    fn build_prompt(
        &self,
        suspect: &Suspect,
        state: &SuspectDisclosureState,
        request: &SuspectResponseRequest,
        location_hint: Option<&str>,
        reveal_secret: bool,
    ) -> RoleplayPrompt {
        let profile = CharacterProfile {
            name: suspect.name.clone(),
            role: suspect.role.to_string(),
            personality: suspect.personality.clone(),
            alibi: self.alibi_for(suspect),
            clue_they_know: suspect.clue_they_know.clone(),
        };
        let emotion = EmotionalSnapshot {
            trust: state.trust(),
            nervousness: state.nervousness(),
            contradictions: state.contradictions_caught(),
        };
        let history = if request.history.is_empty() {
            state.log()
        } else {
            request.history.as_slice()
        };

        let mut prompt = RoleplayPrompt::new(profile, emotion, request.question.as_str())
            .with_history(history, &self.config.synthesis);

        if suspect.guilty {
            prompt = prompt.with_guilt(GuiltBrief {
                weapon: self.case.weapon().to_string(),
                motive: self.case.motive().to_string(),
                method: suspect.murder_method.clone(),
            });
        }
        if let Some(hint) = location_hint {
            prompt = prompt.with_location_hint(hint);
        }
        if reveal_secret && !suspect.secret.is_empty() {
            prompt = prompt.with_secret(suspect.secret.as_str());
        }
        prompt
    }

    /// The alibi a suspect tells, read off the graph. Construction
    /// guarantees every suspect has a critical-window record.
    fn alibi_for(&self, suspect: &Suspect) -> String {
        self.graph
            .derive_alibi_claim(&suspect.role)
            .narrate_naming(|role| self.name_for(role))
    }

    /// Check a claimed whereabouts against the encounter graph.
    pub fn validate_alibi_with_graph(
        &self,
        suspect_name: &str,
        claimed_location: &LocationId,
        claimed_time: TimeSlot,
    ) -> AlibiCheck {
        let Some(suspect) = self.case.suspect_by_name(suspect_name) else {
            warn!(suspect = suspect_name, "alibi check for unknown suspect");
            return AlibiCheck::unresolved(AlibiCheckStatus::UnknownSuspect);
        };

        let Some(verification) = self.graph.alibi_verification_at(&suspect.role, claimed_time)
        else {
            return AlibiCheck::unresolved(AlibiCheckStatus::NoRecord);
        };

        AlibiCheck {
            status: AlibiCheckStatus::Checked,
            is_truthful: Some(verification.is_truthful),
            corroborators: self.names_for(&verification.corroborators),
            contradictors: self.names_for(&verification.contradictors),
            matches_recorded_claim: Some(&verification.claimed_location == claimed_location),
        }
    }

    fn names_for(&self, roles: &[Role]) -> Vec<String> {
        roles.iter().map(|role| self.name_for(role)).collect()
    }

    /// The suspect name behind a role, or the role itself for bystanders.
    fn name_for(&self, role: &Role) -> String {
        self.case
            .suspects()
            .iter()
            .find(|s| &s.role == role)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| role.to_string())
    }

    /// Name, role, personality and alibi. Nothing else about a suspect
    /// leaves the oracle.
    pub fn get_public_suspect_info(&self, name: &str) -> Option<PublicSuspectInfo> {
        let suspect = self.case.suspect_by_name(name)?;
        Some(PublicSuspectInfo {
            name: suspect.name.clone(),
            role: suspect.role.to_string(),
            personality: suspect.personality.clone(),
            alibi: self.alibi_for(suspect),
        })
    }

    /// Is the named suspect the murderer? Unknown names are simply wrong.
    pub fn check_accusation(&self, suspect_name: &str) -> bool {
        match self.case.suspect_by_name(suspect_name) {
            Some(suspect) => suspect.guilty,
            None => {
                warn!(suspect = suspect_name, "accusation of unknown suspect");
                false
            }
        }
    }

    /// Accuse a suspect within a session, counting wrong guesses.
    pub fn accuse(&self, session: &OracleSession, suspect_name: &str) -> AccusationOutcome {
        if session.is_game_over() {
            return AccusationOutcome::GameOver;
        }
        let correct = self.check_accusation(suspect_name);
        let outcome = session.record_accusation(suspect_name, correct);
        info!(session = %session.id(), outcome = ?outcome, "accusation resolved");
        outcome
    }

    /// The murderer's name, once the session's game is over.
    pub fn reveal_murderer(&self, session: &OracleSession) -> Option<&str> {
        if !session.is_game_over() {
            return None;
        }
        self.case
            .suspects()
            .iter()
            .find(|s| s.guilty)
            .map(|s| s.name.as_str())
    }
}
