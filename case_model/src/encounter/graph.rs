//! Encounter Graph - the authoritative record of who was where, and when.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use super::{Location, LocationId, Presence, SightingEdge, TimeSlot, Verdict, VerdictReason};
use crate::entities::Role;
use crate::error::{CaseError, CaseResult};

/// Activity reported for a resolved fabricated presence.
pub const CONCEALED_ACTIVITY: &str = "committing the murder";

/// The complete graph of encounters for one case.
///
/// Built once, validated on construction, and never edited afterwards. Any
/// later "mutation" during play is state *about* the graph, held elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GraphParts")]
pub struct EncounterGraph {
    locations: Vec<Location>,
    presences: Vec<Presence>,
    sightings: Vec<SightingEdge>,
    murderer_role: Role,
    murder_location: LocationId,
}

/// Unvalidated graph fields as they appear in a case file.
#[derive(Deserialize)]
struct GraphParts {
    locations: Vec<Location>,
    presences: Vec<Presence>,
    sightings: Vec<SightingEdge>,
    murderer_role: Role,
    murder_location: LocationId,
}

impl TryFrom<GraphParts> for EncounterGraph {
    type Error = CaseError;

    fn try_from(parts: GraphParts) -> Result<Self, Self::Error> {
        EncounterGraph::new(
            parts.locations,
            parts.presences,
            parts.sightings,
            parts.murderer_role,
            parts.murder_location,
        )
    }
}

impl EncounterGraph {
    /// Build and validate a graph.
    ///
    /// # Errors
    ///
    /// Any [`CaseError`] invariant violation; the case must then be
    /// regenerated.
    pub fn new(
        locations: Vec<Location>,
        presences: Vec<Presence>,
        sightings: Vec<SightingEdge>,
        murderer_role: impl Into<Role>,
        murder_location: impl Into<LocationId>,
    ) -> CaseResult<Self> {
        let graph = Self {
            locations,
            presences,
            sightings,
            murderer_role: murderer_role.into(),
            murder_location: murder_location.into(),
        };
        graph.validate()?;

        tracing::debug!(
            locations = graph.locations.len(),
            presences = graph.presences.len(),
            sightings = graph.sightings.len(),
            "encounter graph validated"
        );
        Ok(graph)
    }

    fn validate(&self) -> CaseResult<()> {
        let mut known = HashSet::new();
        for location in &self.locations {
            if !known.insert(&location.id) {
                return Err(CaseError::DuplicateLocation(location.id.clone()));
            }
        }

        let require = |id: &LocationId, context: &dyn Fn() -> String| -> CaseResult<()> {
            if known.contains(id) {
                Ok(())
            } else {
                Err(CaseError::UnknownLocation {
                    location: id.clone(),
                    context: context(),
                })
            }
        };

        for location in &self.locations {
            for neighbour in &location.adjacent {
                require(neighbour, &|| format!("adjacency of {}", location.id))?;
            }
        }
        require(&self.murder_location, &|| "murder location".to_string())?;

        let mut seen = HashSet::new();
        for presence in &self.presences {
            let role = &presence.role;
            let slot = presence.time_slot;
            if !seen.insert((role, slot)) {
                return Err(CaseError::DuplicatePresence {
                    role: role.clone(),
                    slot,
                });
            }

            require(&presence.location_id, &|| format!("presence of {role} during {slot}"))?;

            if !presence.is_truthful {
                let Some(actual) = &presence.actual_location_id else {
                    return Err(CaseError::FabricationWithoutActualLocation {
                        role: role.clone(),
                        slot,
                    });
                };
                if *role != self.murderer_role {
                    return Err(CaseError::FabricationByInnocent {
                        role: role.clone(),
                        slot,
                    });
                }
                require(actual, &|| format!("actual position of {role} during {slot}"))?;
            }
        }

        for sighting in &self.sightings {
            require(&sighting.location_id, &|| {
                format!("sighting of {} by {}", sighting.subject, sighting.observer)
            })?;
        }

        Ok(())
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, id: &LocationId) -> Option<&Location> {
        self.locations.iter().find(|l| &l.id == id)
    }

    pub fn presences(&self) -> &[Presence] {
        &self.presences
    }

    pub fn sightings(&self) -> &[SightingEdge] {
        &self.sightings
    }

    pub fn murderer_role(&self) -> &Role {
        &self.murderer_role
    }

    pub fn murder_location(&self) -> &LocationId {
        &self.murder_location
    }

    /// Every role with at least one recorded presence.
    pub fn roles(&self) -> BTreeSet<&Role> {
        self.presences.iter().map(|p| &p.role).collect()
    }

    /// Where a person *claims* to have been.
    pub fn presence(&self, role: &Role, slot: TimeSlot) -> Option<&Presence> {
        self.presences
            .iter()
            .find(|p| &p.role == role && p.time_slot == slot)
    }

    /// Where a person *actually* was, resolving fabrication.
    ///
    /// Truthful presences come back unchanged. A fabricated presence comes
    /// back as a synthetic truthful presence at its actual location.
    pub fn actual_presence(&self, role: &Role, slot: TimeSlot) -> Option<Cow<'_, Presence>> {
        let presence = self.presence(role, slot)?;
        match (&presence.actual_location_id, presence.is_truthful) {
            (Some(actual), false) => Some(Cow::Owned(Presence {
                role: presence.role.clone(),
                location_id: actual.clone(),
                time_slot: slot,
                activity: CONCEALED_ACTIVITY.to_string(),
                is_truthful: true,
                actual_location_id: None,
            })),
            _ => Some(Cow::Borrowed(presence)),
        }
    }

    fn actual_location(&self, role: &Role, slot: TimeSlot) -> Option<&LocationId> {
        self.presence(role, slot).map(Presence::actual_location)
    }

    /// Sightings reported by a person.
    pub fn sightings_by<'a>(&'a self, observer: &'a Role) -> impl Iterator<Item = &'a SightingEdge> {
        self.sightings.iter().filter(move |s| &s.observer == observer)
    }

    /// Sightings of a person reported by others.
    pub fn sightings_of<'a>(&'a self, subject: &'a Role) -> impl Iterator<Item = &'a SightingEdge> {
        self.sightings.iter().filter(move |s| &s.subject == subject)
    }

    /// Everyone actually at a location during a slot.
    pub fn people_at(&self, location: &LocationId, slot: TimeSlot) -> Vec<&Role> {
        self.presences
            .iter()
            .filter(|p| p.time_slot == slot && p.actual_location() == location)
            .map(|p| &p.role)
            .collect()
    }

    /// Could `observer` have seen `subject` during `slot`?
    ///
    /// True when both were actually in the same place, or the subject was in
    /// a location adjacent to the observer's.
    pub fn can_see(&self, observer: &Role, subject: &Role, slot: TimeSlot) -> Verdict {
        let Some(observer_at) = self.actual_location(observer, slot) else {
            return missing(observer, slot);
        };
        let Some(subject_at) = self.actual_location(subject, slot) else {
            return missing(subject, slot);
        };

        if observer_at == subject_at {
            return Verdict::yes(VerdictReason::BothAt(observer_at.clone()));
        }

        let adjacent = self
            .location(observer_at)
            .is_some_and(|l| l.adjacent.contains(subject_at));
        if adjacent {
            Verdict::yes(VerdictReason::Adjacent {
                from: observer_at.clone(),
                to: subject_at.clone(),
            })
        } else {
            Verdict::no(VerdictReason::Apart {
                observer: observer_at.clone(),
                subject: subject_at.clone(),
            })
        }
    }

    /// Is a sighting claim physically valid?
    ///
    /// Valid iff both the observer and the subject were actually at the
    /// claimed location during the claimed slot. Pure; reads nothing beyond
    /// presences.
    pub fn validate_sighting(&self, edge: &SightingEdge) -> Verdict {
        let slot = edge.time_slot;
        let Some(observer_at) = self.actual_location(&edge.observer, slot) else {
            return missing(&edge.observer, slot);
        };
        let Some(subject_at) = self.actual_location(&edge.subject, slot) else {
            return missing(&edge.subject, slot);
        };

        if observer_at != &edge.location_id {
            return Verdict::no(VerdictReason::ObserverElsewhere {
                actual: observer_at.clone(),
                claimed: edge.location_id.clone(),
            });
        }
        if subject_at != &edge.location_id {
            return Verdict::no(VerdictReason::SubjectElsewhere {
                actual: subject_at.clone(),
                claimed: edge.location_id.clone(),
            });
        }

        Verdict::yes(VerdictReason::Consistent)
    }
}

fn missing(role: &Role, slot: TimeSlot) -> Verdict {
    Verdict::no(VerdictReason::MissingPresence {
        role: role.clone(),
        slot,
    })
}
