//! The encounter graph - who was where, when, and who saw whom.
//!
//! The graph consists of:
//! - **Locations**: rooms of the setting with their adjacency
//! - **Presences**: a person at a location during a time slot (true or fabricated)
//! - **Sightings**: claims that one person saw another
//!
//! Alibis and clue opportunities are derived from the graph rather than
//! stored next to it, so the story can never disagree with itself.

mod alibi;
mod draft;
mod graph;
mod time_slot;
mod verdict;

pub use alibi::*;
pub use draft::*;
pub use graph::*;
pub use time_slot::*;
pub use verdict::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::entities::Role;

/// Identifier for a location, e.g. "library".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A physical location in the setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Whether several people can be here at once.
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub is_murder_scene: bool,
    /// Locations close enough to see into.
    #[serde(default)]
    pub adjacent: BTreeSet<LocationId>,
}

impl Location {
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            is_public: true,
            is_murder_scene: false,
            adjacent: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn murder_scene(mut self) -> Self {
        self.is_murder_scene = true;
        self
    }

    pub fn adjacent_to<I, L>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LocationId>,
    {
        self.adjacent.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Name suitable for "I was in ..." phrasing.
    pub fn spoken_name(&self) -> String {
        if self.name.to_lowercase().starts_with("the ") {
            self.name.clone()
        } else {
            format!("the {}", self.name)
        }
    }
}

/// A person's position during one time slot.
///
/// A fabricated presence (`is_truthful == false`) is the murderer's false
/// alibi: `location_id` is where they claim to have been and
/// `actual_location_id` is where they really were.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub role: Role,
    pub location_id: LocationId,
    pub time_slot: TimeSlot,
    pub activity: String,
    #[serde(default = "default_true")]
    pub is_truthful: bool,
    #[serde(default)]
    pub actual_location_id: Option<LocationId>,
}

impl Presence {
    /// Someone really was where they say.
    pub fn truthful(
        role: impl Into<Role>,
        location: impl Into<LocationId>,
        slot: TimeSlot,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            location_id: location.into(),
            time_slot: slot,
            activity: activity.into(),
            is_truthful: true,
            actual_location_id: None,
        }
    }

    /// Someone claims `claimed` but was really at `actual`.
    pub fn fabricated(
        role: impl Into<Role>,
        claimed: impl Into<LocationId>,
        actual: impl Into<LocationId>,
        slot: TimeSlot,
        activity: impl Into<String>,
    ) -> Self {
        Self {
            role: role.into(),
            location_id: claimed.into(),
            time_slot: slot,
            activity: activity.into(),
            is_truthful: false,
            actual_location_id: Some(actual.into()),
        }
    }

    /// Where this person really was, resolving fabrication.
    pub fn actual_location(&self) -> &LocationId {
        match (&self.actual_location_id, self.is_truthful) {
            (Some(actual), false) => actual,
            _ => &self.location_id,
        }
    }
}

/// A claim that `observer` saw `subject` at a place and time.
///
/// Whether the claim is physically valid is never stored; it is derived from
/// both parties' actual presences (see [`EncounterGraph::validate_sighting`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingEdge {
    pub observer: Role,
    pub subject: Role,
    pub location_id: LocationId,
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub is_mutual: bool,
    /// False when the observer is lying about what they saw.
    #[serde(default = "default_true")]
    pub is_truthful: bool,
    /// "I saw the butler in the library around nine."
    #[serde(default)]
    pub claim_text: String,
}

impl SightingEdge {
    pub fn new(
        observer: impl Into<Role>,
        subject: impl Into<Role>,
        location: impl Into<LocationId>,
        slot: TimeSlot,
    ) -> Self {
        Self {
            observer: observer.into(),
            subject: subject.into(),
            location_id: location.into(),
            time_slot: slot,
            is_mutual: false,
            is_truthful: true,
            claim_text: String::new(),
        }
    }

    pub fn mutual(mut self) -> Self {
        self.is_mutual = true;
        self
    }

    /// Mark the sighting as a lie told by the observer.
    pub fn false_claim(mut self) -> Self {
        self.is_truthful = false;
        self
    }

    pub fn with_claim_text(mut self, text: impl Into<String>) -> Self {
        self.claim_text = text.into();
        self
    }
}

fn default_true() -> bool {
    true
}
