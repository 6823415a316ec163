//! Error types for the oracle.

use case_model::CaseError;

use crate::synthesis::SynthesisError;

/// Errors surfaced by the oracle.
///
/// Gameplay lookups (unknown suspects, missing presences) never error; they
/// come back as benign values. Only a failed dialogue turn and setup
/// problems reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The dialogue backend failed or timed out. Nothing was committed;
    /// `fallback` is an in-character non-answer safe to show the player.
    #[error("dialogue synthesis failed for {suspect}: {source}")]
    Synthesis {
        suspect: String,
        fallback: String,
        #[source]
        source: SynthesisError,
    },

    /// The case or its graph failed validation.
    #[error("invalid case: {0}")]
    Case(#[from] CaseError),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OracleError {
    /// The line to show the player when this error ends a turn.
    pub fn fallback_text(&self) -> Option<&str> {
        match self {
            OracleError::Synthesis { fallback, .. } => Some(fallback),
            _ => None,
        }
    }
}

pub type OracleResult<T> = Result<T, OracleError>;
