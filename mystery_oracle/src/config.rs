//! Oracle configuration.
//!
//! The reveal thresholds are game-balance knobs, so they live here rather
//! than in the policy code. Everything has a default; a TOML file only needs
//! to name what it changes.
//!
//! ```toml
//! difficulty = "hard"
//!
//! [thresholds]
//! innocent_secret_trust = 55
//!
//! [synthesis]
//! timeout_ms = 8000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::disclosure::{CueLexicon, DisclosurePolicy, DisclosureThresholds, EmotionalDeltas};
use crate::error::OracleResult;

pub const DEFAULT_TRUST: u8 = 50;
pub const DEFAULT_NERVOUSNESS: u8 = 30;
pub const DEFAULT_MAX_WRONG_ACCUSATIONS: u32 = 3;

/// Threshold presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn thresholds(self) -> DisclosureThresholds {
        match self {
            Difficulty::Easy => DisclosureThresholds {
                guilty_hint_trust: 80,
                innocent_hint_trust: 65,
                guilty_crack_nervousness: 85,
                guilty_crack_contradictions: 2,
                innocent_secret_trust: 55,
            },
            Difficulty::Normal => DisclosureThresholds::default(),
            Difficulty::Hard => DisclosureThresholds {
                guilty_hint_trust: 90,
                innocent_hint_trust: 75,
                guilty_crack_nervousness: 95,
                guilty_crack_contradictions: 3,
                innocent_secret_trust: 65,
            },
        }
    }
}

/// Limits for the dialogue backend call and the prompt it receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub timeout_ms: u64,
    /// How many past exchanges go into the prompt.
    pub history_window: usize,
    /// Characters kept from each past question.
    pub question_clip: usize,
    /// Characters kept from each past answer.
    pub answer_clip: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 20_000,
            history_window: 5,
            question_clip: 100,
            answer_clip: 150,
        }
    }
}

impl SynthesisConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Starting values for a fresh game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub trust: u8,
    pub nervousness: u8,
    /// Wrong accusations allowed before the game ends.
    pub max_wrong_accusations: u32,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            trust: DEFAULT_TRUST,
            nervousness: DEFAULT_NERVOUSNESS,
            max_wrong_accusations: DEFAULT_MAX_WRONG_ACCUSATIONS,
        }
    }
}

/// Everything the oracle can be tuned with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OracleConfig {
    pub difficulty: Difficulty,
    pub policy: DisclosurePolicy,
    pub synthesis: SynthesisConfig,
    pub session: SessionDefaults,
}

impl OracleConfig {
    /// Defaults with the thresholds of the given preset.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let mut config = Self {
            difficulty,
            ..Self::default()
        };
        config.policy.thresholds = difficulty.thresholds();
        config
    }

    pub fn from_toml_str(source: &str) -> OracleResult<Self> {
        let raw: RawConfig = toml::from_str(source)?;
        Ok(raw.into_config())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> OracleResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisConfig) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_session(mut self, session: SessionDefaults) -> Self {
        self.session = session;
        self
    }
}

/// On-disk shape: individual thresholds layer over the difficulty preset.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    difficulty: Difficulty,
    thresholds: RawThresholds,
    deltas: EmotionalDeltas,
    cues: CueLexicon,
    synthesis: SynthesisConfig,
    session: SessionDefaults,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawThresholds {
    guilty_hint_trust: Option<u8>,
    innocent_hint_trust: Option<u8>,
    guilty_crack_nervousness: Option<u8>,
    guilty_crack_contradictions: Option<u32>,
    innocent_secret_trust: Option<u8>,
}

impl RawConfig {
    fn into_config(self) -> OracleConfig {
        let preset = self.difficulty.thresholds();
        let t = self.thresholds;
        let thresholds = DisclosureThresholds {
            guilty_hint_trust: t.guilty_hint_trust.unwrap_or(preset.guilty_hint_trust),
            innocent_hint_trust: t.innocent_hint_trust.unwrap_or(preset.innocent_hint_trust),
            guilty_crack_nervousness: t
                .guilty_crack_nervousness
                .unwrap_or(preset.guilty_crack_nervousness),
            guilty_crack_contradictions: t
                .guilty_crack_contradictions
                .unwrap_or(preset.guilty_crack_contradictions),
            innocent_secret_trust: t.innocent_secret_trust.unwrap_or(preset.innocent_secret_trust),
        };

        OracleConfig {
            difficulty: self.difficulty,
            policy: DisclosurePolicy {
                thresholds,
                deltas: self.deltas,
                cues: self.cues,
            },
            synthesis: self.synthesis,
            session: self.session,
        }
    }
}
