//! Sample ability kits. Each kit is a small [ActionBehavior](crate::combat::ActionBehavior)
//! plus the default stats of the character it drives.

pub mod basic;
pub mod conjurer;
pub mod pyro;
pub mod shatter;

use std::fmt;
use std::str::FromStr;

use crate::combat::Battle;
use crate::config::SimulationProfile;
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kit {
    Basic,
    Pyro,
    Shatter,
    Conjurer,
}

impl Kit {
    pub const ALL: [Kit; 4] = [Kit::Basic, Kit::Pyro, Kit::Shatter, Kit::Conjurer];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Pyro => "pyro",
            Self::Shatter => "shatter",
            Self::Conjurer => "conjurer",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::Basic => "basic attacks every turn, ultimate on full energy",
            Self::Pyro => "burn damage over time, ultimate raises speed for two turns",
            Self::Shatter => "heavy toughness damage, super break scaled by ally count",
            Self::Conjurer => "character plus an independently scheduled summon",
        }
    }

    pub fn battle(self, profile: &SimulationProfile) -> SimResult<Battle> {
        match self {
            Self::Basic => basic::battle(profile),
            Self::Pyro => pyro::battle(profile),
            Self::Shatter => shatter::battle(profile),
            Self::Conjurer => conjurer::battle(profile),
        }
    }
}

impl FromStr for Kit {
    type Err = SimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Kit::ALL
            .into_iter()
            .find(|kit| kit.name() == normalized)
            .ok_or_else(|| SimError::UnknownKit(value.to_string()))
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the battle described by `profile`.
pub fn build_battle(profile: &SimulationProfile) -> SimResult<Battle> {
    profile.kit.parse::<Kit>()?.battle(profile)
}
