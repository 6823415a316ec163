//! End-to-end interrogation and accusation flows against the sample case.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use case_model::fixtures::{sample_case, sample_graph};
use mystery_oracle::{
    AccusationOutcome, DialogueSynthesizer, MysteryOracle, OracleConfig, OracleError,
    RoleplayPrompt, ScriptedSynthesizer, SuspectResponseRequest, SynthesisConfig,
    SynthesisError,
};

fn oracle() -> MysteryOracle<ScriptedSynthesizer> {
    oracle_with(ScriptedSynthesizer::new())
}

fn oracle_with<S: DialogueSynthesizer>(synth: S) -> MysteryOracle<S> {
    MysteryOracle::new(sample_case(), sample_graph(), OracleConfig::default(), synth).unwrap()
}

/// Records every prompt, then answers like the scripted synthesizer.
#[derive(Default)]
struct RecordingSynthesizer {
    prompts: Mutex<Vec<RoleplayPrompt>>,
}

#[async_trait]
impl DialogueSynthesizer for RecordingSynthesizer {
    async fn synthesize(&self, prompt: &RoleplayPrompt) -> Result<String, SynthesisError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        ScriptedSynthesizer::new().synthesize(prompt).await
    }
}

/// Fails the first `failures` calls, then speaks normally.
struct FlakySynthesizer {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl DialogueSynthesizer for FlakySynthesizer {
    async fn synthesize(&self, prompt: &RoleplayPrompt) -> Result<String, SynthesisError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(SynthesisError::Backend("connection reset".to_string()));
        }
        ScriptedSynthesizer::new().synthesize(prompt).await
    }
}

struct SlowSynthesizer;

#[async_trait]
impl DialogueSynthesizer for SlowSynthesizer {
    async fn synthesize(&self, _prompt: &RoleplayPrompt) -> Result<String, SynthesisError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok("Too late.".to_string())
    }
}

struct OutOfCharacterSynthesizer;

#[async_trait]
impl DialogueSynthesizer for OutOfCharacterSynthesizer {
    async fn synthesize(&self, _prompt: &RoleplayPrompt) -> Result<String, SynthesisError> {
        Ok("As an AI language model, I cannot pretend to be a suspect.".to_string())
    }
}

#[tokio::test]
async fn guilty_location_hint_needs_trust_85() {
    let oracle = oracle();
    let session = oracle.new_session();
    let question = "Where were you at nine?";

    let below = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Ada Syntax", question).with_levels(84, 30, 0),
        )
        .await
        .unwrap();
    assert_eq!(below.revealed_location_hint, None);

    let at = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Ada Syntax", question).with_levels(85, 30, 0),
        )
        .await
        .unwrap();
    assert_eq!(at.revealed_location_hint.as_deref(), Some("the wine cellar"));
    assert!(!at.revealed_secret);
}

#[tokio::test]
async fn innocent_secret_needs_trust_and_probing() {
    let oracle = oracle();
    let session = oracle.new_session();
    let question = "Why did you argue with him?";

    let guarded = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Clara Voss", question).with_levels(59, 30, 0),
        )
        .await
        .unwrap();
    assert!(!guarded.revealed_secret);
    assert!(!guarded.response_text.contains("illegitimate"));

    let open = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Clara Voss", question).with_levels(61, 30, 0),
        )
        .await
        .unwrap();
    assert!(open.revealed_secret);
    assert!(open.response_text.contains("I am the victim's illegitimate daughter."));
}

#[tokio::test]
async fn secret_reveal_is_terminal() {
    let oracle = oracle();
    let session = oracle.new_session();
    let id = oracle.suspect_id("Clara Voss").unwrap();
    let question = "Why did you argue with him?";

    let first = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Clara Voss", question).with_levels(80, 30, 0),
        )
        .await
        .unwrap();
    assert!(first.revealed_secret);

    for trust in [80, 10, 100] {
        let again = oracle
            .generate_suspect_response(
                &session,
                SuspectResponseRequest::new("Clara Voss", question).with_levels(trust, 30, 0),
            )
            .await
            .unwrap();
        assert!(!again.revealed_secret);
        assert!(session.snapshot(id).unwrap().secret_revealed);
    }
}

#[tokio::test]
async fn murderer_cracks_under_pressure() {
    let oracle = oracle();
    let session = oracle.new_session();
    let question = "Earlier you said the garden, but someone saw you in the hall.";

    let holding = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Ada Syntax", question).with_levels(50, 85, 1),
        )
        .await
        .unwrap();
    assert_eq!(holding.nervousness_delta, 15);
    assert!(!holding.revealed_secret);

    let cracked = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Ada Syntax", question).with_levels(50, 85, 2),
        )
        .await
        .unwrap();
    assert!(cracked.revealed_secret);
    assert!(cracked.response_text.contains("forged"));
    assert_eq!(cracked.revealed_location_hint, None);
}

#[tokio::test]
async fn meters_stay_clamped_over_many_turns() {
    let oracle = oracle();
    let session = oracle.new_session();
    let id = oracle.suspect_id("Ada Syntax").unwrap();

    let mut request = SuspectResponseRequest::new("Ada Syntax", "You're a liar and you killed him!");
    for _ in 0..30 {
        let response = oracle
            .generate_suspect_response(&session, request.clone())
            .await
            .unwrap();
        let snap = session.snapshot(id).unwrap();
        assert!(snap.trust <= 100 && snap.nervousness <= 100);
        assert!(response.trust_delta <= 0 && response.nervousness_delta >= 0);
        request = SuspectResponseRequest::from_snapshot("Ada Syntax", request.question, &snap);
    }

    let snap = session.snapshot(id).unwrap();
    assert_eq!((snap.trust, snap.nervousness), (0, 100));
    assert_eq!(snap.conversation_turns, 30);

    let last = oracle
        .generate_suspect_response(&session, request)
        .await
        .unwrap();
    assert_eq!((last.trust_delta, last.nervousness_delta), (0, 0));
}

#[tokio::test]
async fn unknown_suspect_gets_in_character_confusion() {
    let oracle = oracle();
    let session = oracle.new_session();

    let response = oracle
        .generate_suspect_response(
            &session,
            SuspectResponseRequest::new("Nobody Real", "Where were you?"),
        )
        .await
        .unwrap();

    assert_eq!(response.response_text, "Nobody Real? I don't know who that is.");
    assert_eq!((response.trust_delta, response.nervousness_delta), (0, 0));
    assert_eq!(response.revealed_location_hint, None);
}

#[test]
fn accusing_unknown_name_is_a_plain_wrong_answer() {
    let oracle = oracle();
    let session = oracle.new_session();

    assert!(!oracle.check_accusation("Nobody Real"));
    assert_eq!(
        oracle.accuse(&session, "Nobody Real"),
        AccusationOutcome::Wrong { remaining: 2 }
    );
}

#[test]
fn public_info_never_leaks_secrets_or_guilt() {
    let oracle = oracle();
    let case = sample_case();

    for suspect in case.suspects() {
        let info = oracle.get_public_suspect_info(&suspect.name).unwrap();
        let json = serde_json::to_string(&info).unwrap();

        assert!(!json.contains(&suspect.secret), "{json}");
        assert!(!json.contains(&suspect.clue_they_know), "{json}");
        assert!(!json.contains("true"), "{json}");
        assert!(!json.contains("false"), "{json}");
    }
}

#[test]
fn three_wrong_accusations_end_the_game() {
    let oracle = oracle();
    let session = oracle.new_session();

    assert_eq!(oracle.reveal_murderer(&session), None);
    assert_eq!(
        oracle.accuse(&session, "Bram Holloway"),
        AccusationOutcome::Wrong { remaining: 2 }
    );
    assert_eq!(
        oracle.accuse(&session, "Clara Voss"),
        AccusationOutcome::Wrong { remaining: 1 }
    );
    assert_eq!(oracle.reveal_murderer(&session), None);
    assert_eq!(oracle.accuse(&session, "Dorian Pike"), AccusationOutcome::GameOver);

    assert!(session.is_game_over());
    assert_eq!(oracle.reveal_murderer(&session), Some("Ada Syntax"));
    assert_eq!(oracle.accuse(&session, "Ada Syntax"), AccusationOutcome::GameOver);
}

#[test]
fn correct_accusation_closes_the_case() {
    let oracle = oracle();
    let mut session = oracle.new_session();

    assert_eq!(
        oracle.accuse(&session, "Bram Holloway"),
        AccusationOutcome::Wrong { remaining: 2 }
    );
    assert_eq!(oracle.accuse(&session, "ada syntax"), AccusationOutcome::Correct);
    assert!(session.ledger().is_solved());
    assert_eq!(oracle.reveal_murderer(&session), Some("Ada Syntax"));

    session.reset();
    assert!(!session.is_game_over());
    assert_eq!(oracle.reveal_murderer(&session), None);
}

#[tokio::test]
async fn failed_synthesis_commits_nothing() {
    let oracle = oracle_with(FlakySynthesizer {
        failures: 1,
        calls: AtomicUsize::new(0),
    });
    let session = oracle.new_session();
    let id = oracle.suspect_id("Clara Voss").unwrap();
    let request =
        SuspectResponseRequest::new("Clara Voss", "Why did you argue with him?").with_levels(70, 30, 0);

    let err = oracle
        .generate_suspect_response(&session, request.clone())
        .await
        .unwrap_err();
    match &err {
        OracleError::Synthesis { source, .. } => {
            assert_eq!(source, &SynthesisError::Backend("connection reset".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    let fallback = err.fallback_text().unwrap();
    assert!(!fallback.is_empty());
    assert!(!fallback.contains("connection reset"));
    assert!(session.snapshot(id).is_none());

    // The retried turn still finds the secret unrevealed.
    let retry = oracle.generate_suspect_response(&session, request).await.unwrap();
    assert!(retry.revealed_secret);
    assert_eq!(session.snapshot(id).unwrap().conversation_turns, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_synthesis_times_out_without_commit() {
    let config = OracleConfig::default().with_synthesis(SynthesisConfig {
        timeout_ms: 50,
        ..SynthesisConfig::default()
    });
    let oracle = MysteryOracle::new(sample_case(), sample_graph(), config, SlowSynthesizer).unwrap();
    let session = oracle.new_session();

    let err = oracle
        .generate_suspect_response(&session, SuspectResponseRequest::new("Bram Holloway", "Hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OracleError::Synthesis {
            source: SynthesisError::Timeout,
            ..
        }
    ));
    let id = oracle.suspect_id("Bram Holloway").unwrap();
    assert!(session.snapshot(id).is_none());
}

#[tokio::test]
async fn out_of_character_output_is_rejected() {
    let oracle = oracle_with(OutOfCharacterSynthesizer);
    let session = oracle.new_session();

    let err = oracle
        .generate_suspect_response(&session, SuspectResponseRequest::new("Bram Holloway", "Hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OracleError::Synthesis {
            source: SynthesisError::MetaUtterance,
            ..
        }
    ));
}

#[tokio::test]
async fn secrets_reach_the_prompt_only_through_the_gates() {
    let oracle = oracle_with(RecordingSynthesizer::default());
    let session = oracle.new_session();

    oracle
        .generate_suspect_response(&session, SuspectResponseRequest::new("Ada Syntax", "Hello there."))
        .await
        .unwrap();
    oracle
        .generate_suspect_response(&session, SuspectResponseRequest::new("Clara Voss", "Hello there."))
        .await
        .unwrap();

    let prompts = oracle_prompts(&oracle);
    assert_eq!(prompts.len(), 2);

    let ada = &prompts[0];
    assert!(ada.guilt.is_some());
    assert!(ada.secret.is_none());
    assert!(ada.location_hint.is_none());
    assert!(!ada.to_prompt_string().contains("forged"));

    let clara = &prompts[1];
    assert!(clara.guilt.is_none());
    assert!(clara.secret.is_none());
}

fn oracle_prompts(oracle: &MysteryOracle<RecordingSynthesizer>) -> Vec<RoleplayPrompt> {
    oracle.synthesizer().prompts.lock().unwrap().clone()
}

#[tokio::test]
async fn prompt_history_comes_from_the_session_log() {
    let oracle = oracle_with(RecordingSynthesizer::default());
    let session = oracle.new_session();

    for question in ["First question?", "Second question?", "Third question?"] {
        oracle
            .generate_suspect_response(&session, SuspectResponseRequest::new("Dorian Pike", question))
            .await
            .unwrap();
    }

    let prompts = oracle_prompts(&oracle);
    assert!(prompts[0].history.is_empty());
    let last = &prompts[2];
    assert_eq!(last.history.len(), 2);
    assert_eq!(last.history[0].question, "First question?");
    assert_eq!(last.history[1].question, "Second question?");
}

#[tokio::test]
async fn same_suspect_turns_are_serialized() {
    let oracle = Arc::new(oracle());
    let session = Arc::new(oracle.new_session());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let oracle = Arc::clone(&oracle);
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                oracle
                    .generate_suspect_response(
                        &session,
                        SuspectResponseRequest::new("Bram Holloway", format!("Question {i}?")),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let id = oracle.suspect_id("Bram Holloway").unwrap();
    assert_eq!(session.snapshot(id).unwrap().conversation_turns, 8);
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let oracle = oracle();
    let first = oracle.new_session();
    let second = oracle.new_session();
    let id = oracle.suspect_id("Clara Voss").unwrap();

    oracle
        .generate_suspect_response(&first, SuspectResponseRequest::new("Clara Voss", "Thank you."))
        .await
        .unwrap();
    oracle.accuse(&first, "Clara Voss");

    assert!(first.snapshot(id).is_some());
    assert!(second.snapshot(id).is_none());
    assert!(second.ledger().wrong_accusations().is_empty());
}

#[tokio::test]
async fn contradictions_feed_the_next_turn() {
    let oracle = oracle();
    let session = oracle.new_session();
    let id = oracle.suspect_id("Ada Syntax").unwrap();

    session.record_contradiction(id).await;
    let snap = session.record_contradiction(id).await;
    assert_eq!(snap.contradictions_caught, 2);

    let request = SuspectResponseRequest::from_snapshot(
        "Ada Syntax",
        "You told me the garden. A witness says otherwise.",
        &snap,
    )
    .with_levels(50, 80, snap.contradictions_caught);
    let response = oracle.generate_suspect_response(&session, request).await.unwrap();

    assert_eq!(response.nervousness_delta, 15);
    assert!(response.revealed_secret);
}
