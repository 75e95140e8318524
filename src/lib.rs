//! Turn-based battle damage simulator: action-value scheduling, toughness and break,
//! stacked stat modifiers, and Monte-Carlo aggregation over repeated battles.

pub mod cli;
pub mod combat;
pub mod config;
pub mod error;
pub mod kits;
pub mod parallel;
pub mod sim;

pub use error::{SimError, SimResult};

use crate::combat::Rng;
use crate::config::SimulationProfile;

/// Generator for a profile: the fixed seed when one is set, OS entropy otherwise.
pub fn rng_for_profile(profile: &SimulationProfile) -> SimResult<Rng> {
    match profile.seed {
        Some(seed) => Ok(Rng::new(seed)),
        None => Rng::from_entropy(),
    }
}
