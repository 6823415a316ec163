//! Discrete time slots of the evening.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One slot of the mystery timeline, in narrative order.
///
/// Consistency checks work per slot; the ordering only matters for telling
/// the story in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// 6:00-7:30 PM, before the event.
    EarlyEvening,
    /// 7:30-8:00 PM, guests gather.
    DinnerStart,
    /// 8:00-8:45 PM, main course.
    DinnerMain,
    /// 8:45-9:15 PM, the murder happens here.
    CriticalWindow,
    /// 9:15-9:45 PM, the body is found.
    PostDiscovery,
    /// 9:45 PM onwards, police arrive.
    LateEvening,
}

impl TimeSlot {
    /// Every slot in narrative order.
    pub const ALL: [TimeSlot; 6] = [
        TimeSlot::EarlyEvening,
        TimeSlot::DinnerStart,
        TimeSlot::DinnerMain,
        TimeSlot::CriticalWindow,
        TimeSlot::PostDiscovery,
        TimeSlot::LateEvening,
    ];

    /// The slot during which the murder occurs.
    pub const CRITICAL: TimeSlot = TimeSlot::CriticalWindow;

    pub fn is_critical(self) -> bool {
        self == Self::CRITICAL
    }

    /// The snake_case name used in case files.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::EarlyEvening => "early_evening",
            TimeSlot::DinnerStart => "dinner_start",
            TimeSlot::DinnerMain => "dinner_main",
            TimeSlot::CriticalWindow => "critical_window",
            TimeSlot::PostDiscovery => "post_discovery",
            TimeSlot::LateEvening => "late_evening",
        }
    }

    /// How a character would say this time out loud.
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::EarlyEvening => "early in the evening",
            TimeSlot::DinnerStart => "around half past seven",
            TimeSlot::DinnerMain => "around 8 PM",
            TimeSlot::CriticalWindow => "around 9 PM",
            TimeSlot::PostDiscovery => "around half past nine",
            TimeSlot::LateEvening => "late in the evening",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that does not name any time slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time slot: {0:?}")]
pub struct UnknownTimeSlot(pub String);

impl FromStr for TimeSlot {
    type Err = UnknownTimeSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownTimeSlot(s.to_string()))
    }
}
