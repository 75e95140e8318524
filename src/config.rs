//! Simulation profiles: which kit to run, how long, how often, and the stat and scenario
//! overrides applied before the first trial.
//!
//! Profiles are JSON or YAML, picked by file extension. A profile that cannot be read or
//! parsed is an error; there is no fallback to defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{BaseStats, Element, ToughnessTracker, DEFAULT_MAX_TOUGHNESS};
use crate::error::{SimError, SimResult};

pub const DEFAULT_CYCLES: u32 = 5;
pub const DEFAULT_TRIALS: u32 = 1000;
pub const DEFAULT_ALLIES: u32 = 3;

/// Per-stat overrides; unset fields keep the kit's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatOverrides {
    pub attack: Option<f64>,
    pub crit_rate: Option<f64>,
    pub crit_damage: Option<f64>,
    pub speed: Option<f64>,
    pub elemental_dmg_multiplier: Option<f64>,
    pub break_effect: Option<f64>,
    pub ultimate_energy_threshold: Option<u32>,
}

impl StatOverrides {
    pub fn apply(&self, base: BaseStats) -> BaseStats {
        BaseStats {
            attack: self.attack.unwrap_or(base.attack),
            crit_rate: self.crit_rate.unwrap_or(base.crit_rate),
            crit_damage: self.crit_damage.unwrap_or(base.crit_damage),
            speed: self.speed.unwrap_or(base.speed),
            elemental_dmg_multiplier: self
                .elemental_dmg_multiplier
                .unwrap_or(base.elemental_dmg_multiplier),
            break_effect: self.break_effect.unwrap_or(base.break_effect),
            ultimate_energy_threshold: self
                .ultimate_energy_threshold
                .unwrap_or(base.ultimate_energy_threshold),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Scenario knobs read by kits at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Allies fielded alongside the simulated character.
    pub allies: u32,
    /// Enhancement tier of the character's kit (0 = none).
    pub enhancement: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            allies: DEFAULT_ALLIES,
            enhancement: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyProfile {
    pub max_toughness: u32,
    /// Elements that deal toughness damage. Empty means "weak to everything".
    pub weaknesses: Vec<Element>,
}

impl Default for EnemyProfile {
    fn default() -> Self {
        Self {
            max_toughness: DEFAULT_MAX_TOUGHNESS,
            weaknesses: Vec::new(),
        }
    }
}

impl EnemyProfile {
    pub fn tracker(&self) -> ToughnessTracker {
        let weaknesses = if self.weaknesses.is_empty() {
            Element::ALL.to_vec()
        } else {
            self.weaknesses.clone()
        };
        ToughnessTracker::new(self.max_toughness, weaknesses)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationProfile {
    pub kit: String,
    pub cycles: u32,
    pub trials: u32,
    /// Fixed seed for reproducible aggregates; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    pub parallel: bool,
    /// Worker threads for parallel trials; 0 uses every core.
    pub workers: usize,
    pub stats: StatOverrides,
    pub summon: StatOverrides,
    pub enemy: EnemyProfile,
    pub scenario: Scenario,
}

impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            kit: "basic".to_string(),
            cycles: DEFAULT_CYCLES,
            trials: DEFAULT_TRIALS,
            seed: None,
            parallel: false,
            workers: 0,
            stats: StatOverrides::default(),
            summon: StatOverrides::default(),
            enemy: EnemyProfile::default(),
            scenario: Scenario::default(),
        }
    }
}

impl SimulationProfile {
    pub fn for_kit(kit: &str) -> Self {
        Self {
            kit: kit.to_string(),
            ..Self::default()
        }
    }
}

pub fn load_profile(path: impl AsRef<Path>) -> SimResult<SimulationProfile> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| SimError::ProfileRead {
        path: display.clone(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    parse_profile(&raw, is_yaml).map_err(|message| SimError::ProfileParse {
        path: display,
        message,
    })
}

fn parse_profile(raw: &str, yaml: bool) -> Result<SimulationProfile, String> {
    if yaml {
        serde_yaml::from_str(raw).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(raw).map_err(|err| err.to_string())
    }
}
