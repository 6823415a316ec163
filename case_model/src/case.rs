//! The case itself: victim, suspects, clues and the facts of the murder.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::encounter::{EncounterGraph, TimeSlot};
use crate::entities::{Clue, Role, Suspect, SuspectId, Victim};
use crate::error::{CaseError, CaseResult};

/// The complete ground truth of one murder mystery.
///
/// Immutable once built; validation runs on construction and again on
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CaseParts")]
pub struct CaseModel {
    setting: String,
    victim: Victim,
    murderer_role: Role,
    weapon: String,
    motive: String,
    suspects: Vec<Suspect>,
    clues: Vec<Clue>,
}

#[derive(Deserialize)]
struct CaseParts {
    setting: String,
    victim: Victim,
    murderer_role: Role,
    weapon: String,
    motive: String,
    suspects: Vec<Suspect>,
    clues: Vec<Clue>,
}

impl TryFrom<CaseParts> for CaseModel {
    type Error = CaseError;

    fn try_from(parts: CaseParts) -> Result<Self, Self::Error> {
        CaseModel::new(
            parts.setting,
            parts.victim,
            parts.murderer_role,
            parts.weapon,
            parts.motive,
            parts.suspects,
            parts.clues,
        )
    }
}

impl CaseModel {
    /// Build and validate a case.
    pub fn new(
        setting: impl Into<String>,
        victim: Victim,
        murderer_role: impl Into<Role>,
        weapon: impl Into<String>,
        motive: impl Into<String>,
        suspects: Vec<Suspect>,
        clues: Vec<Clue>,
    ) -> CaseResult<Self> {
        let case = Self {
            setting: setting.into(),
            victim,
            murderer_role: murderer_role.into(),
            weapon: weapon.into(),
            motive: motive.into(),
            suspects,
            clues,
        };
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> CaseResult<()> {
        let guilty: Vec<_> = self.suspects.iter().filter(|s| s.guilty).collect();
        let [murderer] = guilty.as_slice() else {
            return Err(CaseError::GuiltCount(guilty.len()));
        };
        if murderer.role != self.murderer_role {
            return Err(CaseError::MurdererRoleMismatch {
                murderer_role: self.murderer_role.clone(),
                suspect_role: murderer.role.clone(),
            });
        }

        let mut names = HashSet::new();
        for suspect in &self.suspects {
            if !names.insert(suspect.name.trim().to_lowercase()) {
                return Err(CaseError::DuplicateSuspect(suspect.name.clone()));
            }
        }

        if !self.clues.iter().any(Clue::is_red_herring) {
            return Err(CaseError::MissingRedHerring);
        }

        Ok(())
    }

    /// Check that a graph tells the same story as the case: the same
    /// murderer, and a critical-window presence for every suspect so that
    /// each alibi is read from the graph.
    pub fn check_graph(&self, graph: &EncounterGraph) -> CaseResult<()> {
        if graph.murderer_role() != &self.murderer_role {
            return Err(CaseError::GraphMismatch {
                case: self.murderer_role.clone(),
                graph: graph.murderer_role().clone(),
            });
        }

        let slot = TimeSlot::CRITICAL;
        if let Some(missing) = self
            .suspects
            .iter()
            .find(|s| graph.presence(&s.role, slot).is_none())
        {
            return Err(CaseError::MissingAlibi {
                role: missing.role.clone(),
                slot,
            });
        }
        Ok(())
    }

    pub fn setting(&self) -> &str {
        &self.setting
    }

    pub fn victim(&self) -> &Victim {
        &self.victim
    }

    pub fn murderer_role(&self) -> &Role {
        &self.murderer_role
    }

    pub fn weapon(&self) -> &str {
        &self.weapon
    }

    pub fn motive(&self) -> &str {
        &self.motive
    }

    pub fn suspects(&self) -> &[Suspect] {
        &self.suspects
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn suspect(&self, id: SuspectId) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.id == id)
    }

    /// Exact, case-insensitive name lookup. Fuzzy matching belongs to the
    /// input parser, not here.
    pub fn suspect_by_name(&self, name: &str) -> Option<&Suspect> {
        self.suspects.iter().find(|s| s.answers_to(name))
    }

    /// Suspect names in case order.
    pub fn suspect_names(&self) -> impl Iterator<Item = &str> {
        self.suspects.iter().map(|s| s.name.as_str())
    }

    /// Distinct clue locations, in first-seen order.
    pub fn clue_locations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.clues
            .iter()
            .map(|c| c.location.as_str())
            .filter(|l| seen.insert(*l))
            .collect()
    }
}

/// A case and its graph, serialized together by the session layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    pub case: CaseModel,
    pub graph: EncounterGraph,
}

impl CaseFile {
    pub fn new(case: CaseModel, graph: EncounterGraph) -> CaseResult<Self> {
        case.check_graph(&graph)?;
        Ok(Self { case, graph })
    }

    pub fn to_json(&self) -> CaseResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a case file. Both halves are revalidated.
    pub fn from_json(json: &str) -> CaseResult<Self> {
        let file: CaseFile = serde_json::from_str(json)?;
        file.case.check_graph(&file.graph)?;
        Ok(file)
    }
}
