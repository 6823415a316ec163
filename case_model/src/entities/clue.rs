//! Clue definitions.

use serde::{Deserialize, Serialize};

/// Identifier for a clue, e.g. "clue_1".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClueId(pub String);

impl std::fmt::Display for ClueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a clue points at the truth or away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClueKind {
    #[default]
    Genuine,
    /// The mandated misleading clue.
    RedHerring,
}

/// A piece of physical evidence somewhere in the setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clue {
    pub id: ClueId,
    pub description: String,
    /// Where it can be found (free text, matched by the search layer).
    pub location: String,
    pub significance: String,
    #[serde(default)]
    pub kind: ClueKind,
}

impl Clue {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: ClueId(id.into()),
            description: description.into(),
            location: location.into(),
            significance: String::new(),
            kind: ClueKind::Genuine,
        }
    }

    pub fn with_significance(mut self, significance: impl Into<String>) -> Self {
        self.significance = significance.into();
        self
    }

    pub fn red_herring(mut self) -> Self {
        self.kind = ClueKind::RedHerring;
        self
    }

    pub fn is_red_herring(&self) -> bool {
        self.kind == ClueKind::RedHerring
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clue_defaults_to_genuine() {
        let clue = Clue::new("clue_1", "A torn glove", "garden");
        assert_eq!(clue.kind, ClueKind::Genuine);
        assert!(!clue.is_red_herring());
    }

    #[test]
    fn test_kind_deserializes_with_default() {
        let json = r#"{"id":"c2","description":"Muddy boots","location":"hall","significance":"none"}"#;
        let clue: Clue = serde_json::from_str(json).unwrap();
        assert_eq!(clue.kind, ClueKind::Genuine);

        let json = r#"{"id":"c3","description":"A ledger","location":"study","significance":"","kind":"red_herring"}"#;
        let clue: Clue = serde_json::from_str(json).unwrap();
        assert!(clue.is_red_herring());
    }
}
