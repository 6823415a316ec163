//! Alibis and clue opportunities, read straight off the graph.

use serde::{Deserialize, Serialize};

use super::{EncounterGraph, LocationId, TimeSlot};
use crate::entities::Role;

/// How a person's claimed position during a slot holds up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlibiVerification {
    pub role: Role,
    pub slot: TimeSlot,
    pub is_truthful: bool,
    pub claimed_location: LocationId,
    pub claimed_activity: String,
    pub actual_location: LocationId,
    /// Observers whose truthful sighting matches the claimed location.
    pub corroborators: Vec<Role>,
    /// Observers whose truthful sighting places the person elsewhere.
    pub contradictors: Vec<Role>,
}

/// An alibi statement derived from the graph, never invented separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlibiClaim {
    pub time_claimed: String,
    /// `None` when the graph has nothing on record.
    pub location_claimed: Option<LocationId>,
    pub location_name: Option<String>,
    pub activity: String,
    pub corroborator: Option<Role>,
    pub is_truthful: bool,
}

impl AlibiClaim {
    /// The alibi as the suspect would say it, naming a corroborator by role.
    pub fn narrate(&self) -> String {
        self.narrate_naming(|role| role.to_string())
    }

    /// Like [`AlibiClaim::narrate`], with `name_of` choosing how the
    /// corroborator is referred to.
    pub fn narrate_naming(&self, name_of: impl Fn(&Role) -> String) -> String {
        let when = capitalize(&self.time_claimed);
        let Some(place) = &self.location_name else {
            return format!("{when}? I don't remember exactly where I was.");
        };

        let mut line = format!("{when} I was in {place}, {}.", self.activity);
        if let Some(witness) = &self.corroborator {
            line.push_str(&format!(" You can ask {}.", name_of(witness)));
        }
        line
    }
}

/// The kind of evidence a clue could provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    /// Evidence that someone was NOT where they claim.
    AbsenceEvidence,
    /// Evidence placing someone somewhere they deny.
    PresenceEvidence,
    /// Evidence confirming an honest alibi.
    AlibiSupport,
}

/// What finding such evidence would prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proves {
    AlibiFalse,
    AtMurderScene,
    AlibiTrue,
}

/// A place where case construction could plant a clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueOpportunity {
    pub kind: OpportunityKind,
    pub location: LocationId,
    pub target_role: Role,
    pub description: String,
    pub proves: Proves,
}

impl EncounterGraph {
    /// Alibi status for the critical window.
    pub fn alibi_verification_status(&self, role: &Role) -> Option<AlibiVerification> {
        self.alibi_verification_at(role, TimeSlot::CRITICAL)
    }

    /// Alibi status for any slot. `None` means nothing is on record, which
    /// callers must read as "unknown".
    pub fn alibi_verification_at(&self, role: &Role, slot: TimeSlot) -> Option<AlibiVerification> {
        let claim = self.presence(role, slot)?;

        let (corroborating, contradicting): (Vec<_>, Vec<_>) = self
            .sightings_of(role)
            .filter(|s| s.time_slot == slot && s.is_truthful)
            .partition(|s| s.location_id == claim.location_id);

        Some(AlibiVerification {
            role: role.clone(),
            slot,
            is_truthful: claim.is_truthful,
            claimed_location: claim.location_id.clone(),
            claimed_activity: claim.activity.clone(),
            actual_location: claim.actual_location().clone(),
            corroborators: corroborating.into_iter().map(|s| s.observer.clone()).collect(),
            contradictors: contradicting.into_iter().map(|s| s.observer.clone()).collect(),
        })
    }

    /// Derive the alibi a person gives for the critical window.
    pub fn derive_alibi_claim(&self, role: &Role) -> AlibiClaim {
        let slot = TimeSlot::CRITICAL;
        let Some(presence) = self.presence(role, slot) else {
            return AlibiClaim {
                time_claimed: slot.label().to_string(),
                location_claimed: None,
                location_name: None,
                activity: "I don't remember exactly".to_string(),
                corroborator: None,
                is_truthful: true,
            };
        };

        let corroborator = self
            .sightings_of(role)
            .find(|s| s.time_slot == slot && s.is_truthful && s.location_id == presence.location_id)
            .map(|s| s.observer.clone());

        let location_name = self
            .location(&presence.location_id)
            .map(|l| l.spoken_name())
            .unwrap_or_else(|| format!("the {}", presence.location_id));

        AlibiClaim {
            time_claimed: slot.label().to_string(),
            location_claimed: Some(presence.location_id.clone()),
            location_name: Some(location_name),
            activity: presence.activity.clone(),
            corroborator,
            is_truthful: presence.is_truthful,
        }
    }

    /// Where evidence could be planted, for case construction.
    ///
    /// A fabricating murderer yields absence evidence at the claimed place
    /// and presence evidence at the true place; every other person with a
    /// truthful critical-window presence yields alibi support.
    pub fn clue_opportunities(&self) -> Vec<ClueOpportunity> {
        let slot = TimeSlot::CRITICAL;
        let murderer = self.murderer_role();
        let mut opportunities = Vec::new();

        if let Some(claim) = self.presence(murderer, slot).filter(|p| !p.is_truthful) {
            opportunities.push(ClueOpportunity {
                kind: OpportunityKind::AbsenceEvidence,
                location: claim.location_id.clone(),
                target_role: murderer.clone(),
                description: format!("Evidence showing {murderer} was NOT at {}", claim.location_id),
                proves: Proves::AlibiFalse,
            });

            if let Some(actual) = &claim.actual_location_id {
                opportunities.push(ClueOpportunity {
                    kind: OpportunityKind::PresenceEvidence,
                    location: actual.clone(),
                    target_role: murderer.clone(),
                    description: format!("Evidence placing {murderer} at {actual}"),
                    proves: Proves::AtMurderScene,
                });
            }
        }

        for presence in self.presences() {
            if &presence.role == murderer || presence.time_slot != slot || !presence.is_truthful {
                continue;
            }
            opportunities.push(ClueOpportunity {
                kind: OpportunityKind::AlibiSupport,
                location: presence.location_id.clone(),
                target_role: presence.role.clone(),
                description: format!(
                    "Evidence confirming {} was at {}",
                    presence.role, presence.location_id
                ),
                proves: Proves::AlibiTrue,
            });
        }

        opportunities
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
