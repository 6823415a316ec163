//! Suspect and victim definitions.

use serde::{Deserialize, Serialize};

use super::{Role, SuspectId};

/// The person who was murdered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victim {
    pub name: String,
    /// Who they were and why someone might want them dead.
    pub background: String,
}

impl Victim {
    pub fn new(name: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: background.into(),
        }
    }
}

/// A full suspect profile, secrets included.
///
/// Only the oracle reads `secret`, `guilty` and `clue_they_know`; everything
/// else in the game sees the public projection the oracle hands out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suspect {
    #[serde(default)]
    pub id: SuspectId,
    pub name: String,
    /// Relationship to the victim, and the key into the encounter graph.
    pub role: Role,
    pub personality: String,
    /// The public alibi as the suspect tells it.
    pub alibi: String,
    pub secret: String,
    pub guilty: bool,
    /// Something useful the suspect will share if asked the right way.
    pub clue_they_know: String,
    /// Where a clue can be found, offered once trust is high enough.
    #[serde(default)]
    pub location_hint: Option<String>,
    /// How the murder was done. Only meaningful for the guilty suspect.
    #[serde(default)]
    pub murder_method: Option<String>,

    // Media references, filled in after generation.
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub portrait: Option<String>,
}

impl Suspect {
    /// Create an innocent suspect with the given name and role.
    pub fn new(name: impl Into<String>, role: impl Into<Role>) -> Self {
        Self {
            id: SuspectId::new(),
            name: name.into(),
            role: role.into(),
            personality: String::new(),
            alibi: String::new(),
            secret: String::new(),
            guilty: false,
            clue_they_know: String::new(),
            location_hint: None,
            murder_method: None,
            voice_id: None,
            portrait: None,
        }
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    pub fn with_alibi(mut self, alibi: impl Into<String>) -> Self {
        self.alibi = alibi.into();
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn with_clue(mut self, clue: impl Into<String>) -> Self {
        self.clue_they_know = clue.into();
        self
    }

    pub fn with_location_hint(mut self, hint: impl Into<String>) -> Self {
        self.location_hint = Some(hint.into());
        self
    }

    /// Mark this suspect as the murderer.
    pub fn guilty(mut self, murder_method: Option<String>) -> Self {
        self.guilty = true;
        self.murder_method = murder_method;
        self
    }

    /// Case-insensitive exact name match, ignoring surrounding whitespace.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}
