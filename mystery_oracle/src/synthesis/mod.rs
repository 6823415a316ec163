//! The boundary to whatever voices the suspects.
//!
//! The oracle never generates dialogue itself. It hands a
//! [`RoleplayPrompt`] to a [`DialogueSynthesizer`] and gets a line back, or
//! an explicit [`SynthesisError`].

mod prompt;

pub use prompt::*;

use async_trait::async_trait;

/// A dialogue backend: a language model, a script, a human in a test.
#[async_trait]
pub trait DialogueSynthesizer: Send + Sync {
    /// Produce the suspect's reply to the prompt's question.
    async fn synthesize(&self, prompt: &RoleplayPrompt) -> Result<String, SynthesisError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("dialogue backend timed out")]
    Timeout,

    #[error("dialogue backend failed: {0}")]
    Backend(String),

    #[error("dialogue backend returned nothing")]
    EmptyUtterance,

    #[error("dialogue backend stepped out of character")]
    MetaUtterance,
}

/// Openings that mean the backend is talking about the roleplay instead of
/// within it.
const META_OPENINGS: &[&str] = &[
    "as an ai",
    "as a language model",
    "i'm sorry, but i can't",
    "i cannot roleplay",
    "i can't roleplay",
    "system:",
    "[system",
    "note:",
    "(note",
    "(out of character",
    "ooc:",
];

/// Clean a raw backend reply into a spoken line.
///
/// Trims whitespace, drops a leading `Name:` speaker tag and wrapping
/// quotes, then rejects empty or out-of-character output.
pub fn normalize_utterance(raw: &str, speaker: &str) -> Result<String, SynthesisError> {
    let mut text = raw.trim();

    if let Some(rest) = strip_speaker_tag(text, speaker) {
        text = rest.trim_start();
    }
    text = strip_quotes(text).trim();

    if text.is_empty() {
        return Err(SynthesisError::EmptyUtterance);
    }

    let lowered = text.to_lowercase();
    if META_OPENINGS.iter().any(|m| lowered.starts_with(m))
        || lowered.contains("as an ai language model")
    {
        return Err(SynthesisError::MetaUtterance);
    }

    Ok(text.to_string())
}

fn strip_speaker_tag<'a>(text: &'a str, speaker: &str) -> Option<&'a str> {
    let head = text.get(..speaker.len())?;
    if !head.eq_ignore_ascii_case(speaker) {
        return None;
    }
    text[speaker.len()..].trim_start().strip_prefix(':')
}

fn strip_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}')] {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            return inner;
        }
    }
    text
}

/// An in-character non-answer for when no dialogue could be produced.
pub fn fallback_utterance(emotion: &EmotionalSnapshot) -> String {
    if emotion.is_rattled() {
        "I... I need a moment. Ask me again, please.".to_string()
    } else if emotion.is_guarded() {
        "I have nothing more to say right now.".to_string()
    } else {
        "Forgive me, I lost my train of thought. What were you asking?".to_string()
    }
}

/// Deterministic synthesizer that speaks straight from the prompt.
///
/// Used by tests and for playing without a model.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSynthesizer;

impl ScriptedSynthesizer {
    pub fn new() -> Self {
        Self
    }

    fn compose(prompt: &RoleplayPrompt) -> String {
        let mut parts: Vec<String> = Vec::new();
        let emotion = &prompt.emotion;

        if let Some(secret) = &prompt.secret {
            parts.push(format!("Fine. I'll tell you. {secret}"));
        } else if emotion.is_rattled() {
            parts.push("I... I don't see why that matters.".to_string());
        } else if emotion.is_guarded() {
            parts.push("I've already told you what I know.".to_string());
        } else if prompt.profile.alibi.is_empty() {
            parts.push("I'm not sure what you want me to say.".to_string());
        } else {
            parts.push(prompt.profile.alibi.clone());
        }

        if let Some(hint) = &prompt.location_hint {
            parts.push(format!("You might want to take a look at {hint}."));
        }

        parts.join(" ")
    }
}

#[async_trait]
impl DialogueSynthesizer for ScriptedSynthesizer {
    async fn synthesize(&self, prompt: &RoleplayPrompt) -> Result<String, SynthesisError> {
        Ok(Self::compose(prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(trust: u8, nervousness: u8) -> RoleplayPrompt {
        RoleplayPrompt::new(
            CharacterProfile {
                name: "Bram Holloway".to_string(),
                role: "the butler".to_string(),
                personality: "formal".to_string(),
                alibi: "I was polishing the silver.".to_string(),
                clue_they_know: String::new(),
            },
            EmotionalSnapshot {
                trust,
                nervousness,
                contradictions: 0,
            },
            "Where were you?",
        )
    }

    #[test]
    fn test_normalize_strips_tag_and_quotes() {
        let line = normalize_utterance("  Bram Holloway: \"I was in the library.\"  ", "Bram Holloway");
        assert_eq!(line.unwrap(), "I was in the library.");

        let line = normalize_utterance("bram holloway : \u{201c}Indeed.\u{201d}", "Bram Holloway");
        assert_eq!(line.unwrap(), "Indeed.");
    }

    #[test]
    fn test_normalize_keeps_plain_lines() {
        let line = normalize_utterance("Brambles grow by the gate.", "Bram");
        assert_eq!(line.unwrap(), "Brambles grow by the gate.");
    }

    #[test]
    fn test_normalize_rejects_empty_and_meta() {
        assert_eq!(normalize_utterance("   ", "X"), Err(SynthesisError::EmptyUtterance));
        assert_eq!(normalize_utterance("\"\"", "X"), Err(SynthesisError::EmptyUtterance));
        assert_eq!(
            normalize_utterance("As an AI, I cannot pretend to be a butler.", "X"),
            Err(SynthesisError::MetaUtterance)
        );
        assert_eq!(
            normalize_utterance("System: character limit reached", "X"),
            Err(SynthesisError::MetaUtterance)
        );
    }

    #[test]
    fn test_fallback_is_in_character() {
        let calm = EmotionalSnapshot {
            trust: 50,
            nervousness: 30,
            contradictions: 0,
        };
        let line = fallback_utterance(&calm);
        assert!(normalize_utterance(&line, "X").is_ok());
        assert!(line.starts_with("Forgive me"));
    }

    #[tokio::test]
    async fn test_scripted_synthesizer() {
        let synth = ScriptedSynthesizer::new();

        let plain = synth.synthesize(&prompt(50, 30)).await.unwrap();
        assert_eq!(plain, "I was polishing the silver.");

        let hinted = synth
            .synthesize(&prompt(75, 30).with_location_hint("the library desk"))
            .await
            .unwrap();
        assert!(hinted.ends_with("You might want to take a look at the library desk."));

        let confession = synth
            .synthesize(&prompt(75, 30).with_secret("I sold the silver."))
            .await
            .unwrap();
        assert!(confession.contains("I sold the silver."));

        let rattled = synth.synthesize(&prompt(50, 95)).await.unwrap();
        assert!(rattled.starts_with("I... I don't"));
    }
}
