//! People and evidence in the case.

mod clue;
mod suspect;

pub use clue::*;
pub use suspect::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a suspect, minted when the case is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuspectId(pub Uuid);

impl SuspectId {
    /// Create a new random suspect ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SuspectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SuspectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person's role in the story, e.g. "the butler".
///
/// Roles are how the encounter graph names people. Comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
