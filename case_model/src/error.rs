//! Errors raised while building a case.
//!
//! Every variant here is fatal at case-generation time: a case that fails
//! validation must be regenerated, never played.

use crate::encounter::{LocationId, TimeSlot};
use crate::entities::Role;

/// Invariant violations detected while constructing a case or its graph.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// Two presences were recorded for the same person in the same slot.
    #[error("duplicate presence for {role} during {slot}")]
    DuplicatePresence { role: Role, slot: TimeSlot },

    /// A fabricated presence does not say where the person really was.
    #[error("fabricated presence for {role} during {slot} has no actual location")]
    FabricationWithoutActualLocation { role: Role, slot: TimeSlot },

    /// Only the murderer may carry a fabricated presence.
    #[error("fabricated presence for {role} during {slot}, but {role} is not the murderer")]
    FabricationByInnocent { role: Role, slot: TimeSlot },

    /// A location was declared twice.
    #[error("location {0} declared more than once")]
    DuplicateLocation(LocationId),

    /// Something references a location that was never declared.
    #[error("{context} references unknown location {location}")]
    UnknownLocation {
        location: LocationId,
        context: String,
    },

    /// The case must have exactly one guilty suspect.
    #[error("expected exactly one guilty suspect, found {0}")]
    GuiltCount(usize),

    /// The guilty suspect's role does not match the case's murderer role.
    #[error("guilty suspect has role {suspect_role}, but the murderer role is {murderer_role}")]
    MurdererRoleMismatch {
        murderer_role: Role,
        suspect_role: Role,
    },

    /// Case and graph disagree about who the murderer is.
    #[error("case names {case} as murderer, encounter graph names {graph}")]
    GraphMismatch { case: Role, graph: Role },

    /// A suspect has no critical-window presence, so their alibi cannot be
    /// read from the graph.
    #[error("encounter graph has no {slot} presence for suspect role {role}")]
    MissingAlibi { role: Role, slot: TimeSlot },

    /// Two suspects share a name.
    #[error("suspect name {0:?} is used more than once")]
    DuplicateSuspect(String),

    /// No clue is flagged as the red herring.
    #[error("case has no red herring clue")]
    MissingRedHerring,

    /// Case file (de)serialization failed.
    #[error("case file serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias for case construction.
pub type CaseResult<T> = Result<T, CaseError>;
