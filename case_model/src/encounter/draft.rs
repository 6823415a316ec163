//! Drafts emitted by the upstream case generator, and their conversion into
//! a validated graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{EncounterGraph, Location, LocationId, Presence, SightingEdge, TimeSlot};
use crate::entities::Role;
use crate::error::CaseResult;

/// A location as the generator describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDraft {
    /// Falls back to a slug of `name` when missing.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub is_murder_scene: bool,
    #[serde(default)]
    pub adjacent_to: Vec<String>,
}

/// Where one role was during one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotDraft {
    pub location: String,
    #[serde(default = "default_activity")]
    pub activity: String,
}

/// One role's whole evening.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineDraft {
    pub role: Role,
    #[serde(default)]
    pub slots: BTreeMap<TimeSlot, SlotDraft>,
}

/// "I saw X in Y" as the generator describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SightingDraft {
    pub observer_role: Role,
    pub subject_role: Role,
    pub location: String,
    #[serde(default = "default_slot")]
    pub time_slot: TimeSlot,
    #[serde(default)]
    pub is_mutual: bool,
    #[serde(default)]
    pub claim_text: String,
}

/// Raw generator output for an encounter graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterGraphDraft {
    pub locations: Vec<LocationDraft>,
    pub timeline: Vec<TimelineDraft>,
    #[serde(default)]
    pub sightings: Vec<SightingDraft>,
    pub murderer_role: Role,
    pub murder_location: String,
}

impl EncounterGraphDraft {
    /// Turn the draft into a validated graph.
    ///
    /// Truthfulness is not taken from the draft: the murderer's critical
    /// window presence becomes a fabrication pointing at the murder scene,
    /// and every sighting the murderer reports is marked untruthful.
    pub fn into_graph(self) -> CaseResult<EncounterGraph> {
        let locations: Vec<Location> = self
            .locations
            .into_iter()
            .map(|draft| {
                let id = draft.id.unwrap_or_else(|| slugify(&draft.name));
                Location {
                    id: LocationId::new(id),
                    name: draft.name,
                    description: draft.description,
                    is_public: draft.is_public,
                    is_murder_scene: draft.is_murder_scene,
                    adjacent: draft.adjacent_to.into_iter().map(LocationId::new).collect(),
                }
            })
            .collect();

        let murder_location = locations
            .iter()
            .find(|l| l.is_murder_scene)
            .map(|l| l.id.clone())
            .unwrap_or_else(|| LocationId::new(self.murder_location));

        let murderer = self.murderer_role;

        let presences = self
            .timeline
            .into_iter()
            .flat_map(|entry| {
                let role = entry.role;
                entry
                    .slots
                    .into_iter()
                    .map(move |(slot, draft)| (role.clone(), slot, draft))
            })
            .map(|(role, slot, draft)| {
                if role == murderer && slot.is_critical() {
                    Presence::fabricated(
                        role,
                        draft.location.as_str(),
                        murder_location.clone(),
                        slot,
                        draft.activity,
                    )
                } else {
                    Presence::truthful(role, draft.location.as_str(), slot, draft.activity)
                }
            })
            .collect();

        let sightings = self
            .sightings
            .into_iter()
            .map(|draft| SightingEdge {
                is_truthful: draft.observer_role != murderer,
                observer: draft.observer_role,
                subject: draft.subject_role,
                location_id: LocationId::new(draft.location),
                time_slot: draft.time_slot,
                is_mutual: draft.is_mutual,
                claim_text: draft.claim_text,
            })
            .collect();

        EncounterGraph::new(locations, presences, sightings, murderer, murder_location)
    }
}

fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

fn default_public() -> bool {
    true
}

fn default_activity() -> String {
    "present".to_string()
}

fn default_slot() -> TimeSlot {
    TimeSlot::CRITICAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaseError;

    const DRAFT: &str = r#"{
        "locations": [
            {"name": "Wine Cellar", "is_murder_scene": true},
            {"id": "garden", "name": "Garden", "adjacent_to": ["wine_cellar"]},
            {"id": "library", "name": "Library"}
        ],
        "timeline": [
            {"role": "the gardener", "slots": {
                "dinner_main": {"location": "garden", "activity": "serving drinks"},
                "critical_window": {"location": "garden", "activity": "pruning roses"}
            }},
            {"role": "the butler", "slots": {
                "critical_window": {"location": "library"}
            }}
        ],
        "sightings": [
            {"observer_role": "the gardener", "subject_role": "the butler", "location": "garden"},
            {"observer_role": "the butler", "subject_role": "the gardener", "location": "garden",
             "time_slot": "dinner_main"}
        ],
        "murderer_role": "the gardener",
        "murder_location": "study"
    }"#;

    #[test]
    fn test_draft_builds_consistent_graph() {
        let draft: EncounterGraphDraft = serde_json::from_str(DRAFT).unwrap();
        let graph = draft.into_graph().unwrap();

        // Murder scene flag wins over the draft's murder_location.
        assert_eq!(graph.murder_location(), &LocationId::new("wine_cellar"));

        let gardener = Role::new("the gardener");
        let claim = graph.presence(&gardener, TimeSlot::CriticalWindow).unwrap();
        assert!(!claim.is_truthful);
        assert_eq!(claim.actual_location_id, Some(LocationId::new("wine_cellar")));

        let earlier = graph.presence(&gardener, TimeSlot::DinnerMain).unwrap();
        assert!(earlier.is_truthful);

        let butler = graph.presence(&"the butler".into(), TimeSlot::CriticalWindow).unwrap();
        assert_eq!(butler.activity, "present");

        let by_gardener: Vec<_> = graph.sightings_by(&gardener).collect();
        assert_eq!(by_gardener.len(), 1);
        assert!(!by_gardener[0].is_truthful);
        assert_eq!(by_gardener[0].time_slot, TimeSlot::CriticalWindow);

        let of_gardener: Vec<_> = graph.sightings_of(&gardener).collect();
        assert!(of_gardener[0].is_truthful);
    }

    #[test]
    fn test_draft_with_unknown_location_is_rejected() {
        let mut draft: EncounterGraphDraft = serde_json::from_str(DRAFT).unwrap();
        draft.timeline[1].slots.insert(
            TimeSlot::LateEvening,
            SlotDraft {
                location: "ballroom".into(),
                activity: "dancing".into(),
            },
        );

        let err = draft.into_graph().unwrap_err();
        assert!(matches!(err, CaseError::UnknownLocation { .. }));
    }
}
