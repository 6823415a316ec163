//! Typed answers to physical-possibility questions.

use serde::{Deserialize, Serialize};

use super::{LocationId, TimeSlot};
use crate::entities::Role;

/// The answer to "is this physically possible?" plus the reason why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub holds: bool,
    pub reason: VerdictReason,
}

impl Verdict {
    pub(crate) fn yes(reason: VerdictReason) -> Self {
        Self { holds: true, reason }
    }

    pub(crate) fn no(reason: VerdictReason) -> Self {
        Self {
            holds: false,
            reason,
        }
    }

    /// True when the graph has no position on record, so the answer is
    /// "unknown" rather than "false".
    pub fn is_unknown(&self) -> bool {
        matches!(self.reason, VerdictReason::MissingPresence { .. })
    }

    /// The verdict as a `(holds, reason)` pair.
    pub fn into_pair(self) -> (bool, String) {
        (self.holds, self.reason.to_string())
    }
}

/// Why a verdict came out the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictReason {
    BothAt(LocationId),
    Adjacent {
        from: LocationId,
        to: LocationId,
    },
    Apart {
        observer: LocationId,
        subject: LocationId,
    },
    MissingPresence {
        role: Role,
        slot: TimeSlot,
    },
    ObserverElsewhere {
        actual: LocationId,
        claimed: LocationId,
    },
    SubjectElsewhere {
        actual: LocationId,
        claimed: LocationId,
    },
    Consistent,
}

impl std::fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictReason::BothAt(location) => write!(f, "Both at {location}"),
            VerdictReason::Adjacent { from, to } => {
                write!(f, "Adjacent locations ({from} -> {to})")
            }
            VerdictReason::Apart { observer, subject } => {
                write!(f, "Different locations: {observer} vs {subject}")
            }
            VerdictReason::MissingPresence { role, slot } => {
                write!(f, "{role} has no recorded position during {slot}")
            }
            VerdictReason::ObserverElsewhere { actual, claimed } => {
                write!(f, "Observer was actually at {actual}, not {claimed}")
            }
            VerdictReason::SubjectElsewhere { actual, claimed } => {
                write!(f, "Subject was actually at {actual}, not {claimed}")
            }
            VerdictReason::Consistent => f.write_str("Sighting is physically possible"),
        }
    }
}
