//! Damage composition.
//!
//! `damage = (attack * ability_multiplier + flat) * dmg_mult * res_mult * def_mult * reduction`
//!
//! `reduction` is 0.9 against an intact target and 1.0 against a weakness-broken one. Callers
//! must sample the broken state before applying the same hit's toughness damage.

use serde::{Deserialize, Serialize};

use crate::combat::rng::Rng;

/// Universal damage reduction applied while the target's toughness is intact.
pub const INTACT_DAMAGE_REDUCTION: f64 = 0.9;

/// Level-80 scaling constant shared by break and super break damage.
pub const LEVEL_MULTIPLIER: f64 = 3767.5533;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Physical,
    Fire,
    Ice,
    Lightning,
    Wind,
    Quantum,
    Imaginary,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::Physical,
        Element::Fire,
        Element::Ice,
        Element::Lightning,
        Element::Wind,
        Element::Quantum,
        Element::Imaginary,
    ];

    pub const fn break_multiplier(self) -> f64 {
        match self {
            Self::Physical | Self::Fire => 2.0,
            Self::Wind => 1.5,
            Self::Ice | Self::Lightning => 1.0,
            Self::Quantum | Self::Imaginary => 0.5,
        }
    }
}

/// Inputs for one damage instance. Multiplier terms are sums of the individual bonuses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub attack: f64,
    pub ability_multiplier: f64,
    pub flat_bonus: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    /// Σ DMG% bonuses (or Σ DoT bonuses when `dot` is set).
    pub extra_multipliers: f64,
    pub res_penetration: f64,
    pub def_reduction: f64,
    /// Damage-over-time instances never crit and never roll.
    pub dot: bool,
}

impl DamageInput {
    pub fn new(attack: f64, ability_multiplier: f64) -> Self {
        Self {
            attack,
            ability_multiplier,
            flat_bonus: 0.0,
            crit_rate: 0.0,
            crit_damage: 0.0,
            extra_multipliers: 0.0,
            res_penetration: 0.0,
            def_reduction: 0.0,
            dot: false,
        }
    }

    pub fn with_crit(mut self, crit_rate: f64, crit_damage: f64) -> Self {
        self.crit_rate = crit_rate;
        self.crit_damage = crit_damage;
        self
    }

    pub fn with_flat_bonus(mut self, flat_bonus: f64) -> Self {
        self.flat_bonus = flat_bonus;
        self
    }

    pub fn with_extra(mut self, extra: f64) -> Self {
        self.extra_multipliers += extra;
        self
    }

    pub fn with_res_penetration(mut self, res_penetration: f64) -> Self {
        self.res_penetration += res_penetration;
        self
    }

    pub fn with_def_reduction(mut self, def_reduction: f64) -> Self {
        self.def_reduction += def_reduction;
        self
    }

    pub fn as_dot(mut self) -> Self {
        self.dot = true;
        self
    }

    pub fn base_damage(&self) -> f64 {
        self.attack * self.ability_multiplier + self.flat_bonus
    }

    pub fn res_multiplier(&self) -> f64 {
        1.0 + self.res_penetration
    }

    pub fn def_multiplier(&self) -> f64 {
        1.0 + self.def_reduction
    }

    pub fn damage_multiplier(&self, crit: bool) -> f64 {
        let bonus = 1.0 + self.extra_multipliers;
        if crit && !self.dot {
            (1.0 + self.crit_damage) * bonus
        } else {
            bonus
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub amount: f64,
    pub crit: bool,
}

pub const fn universal_reduction(weakness_broken: bool) -> f64 {
    if weakness_broken {
        1.0
    } else {
        INTACT_DAMAGE_REDUCTION
    }
}

/// Damage with the crit outcome already decided.
pub fn damage_with_crit(input: &DamageInput, crit: bool, weakness_broken: bool) -> f64 {
    input.base_damage()
        * input.damage_multiplier(crit)
        * input.res_multiplier()
        * input.def_multiplier()
        * universal_reduction(weakness_broken)
}

/// Rolls crit once for this instance, then composes the damage.
pub fn roll_damage(input: &DamageInput, weakness_broken: bool, rng: &mut Rng) -> DamageRoll {
    let crit = !input.dot && rng.chance(input.crit_rate);
    DamageRoll {
        amount: damage_with_crit(input, crit, weakness_broken),
        crit,
    }
}

/// One-off damage dealt when the target's toughness is depleted. Scales with the target's
/// max toughness and the attacker's break effect, never with attack.
pub fn break_damage(
    element: Element,
    max_toughness: u32,
    break_effect: f64,
    res_multiplier: f64,
    def_multiplier: f64,
) -> f64 {
    let toughness_factor = 0.5 + f64::from(max_toughness) / 40.0;
    element.break_multiplier()
        * LEVEL_MULTIPLIER
        * toughness_factor
        * (1.0 + break_effect)
        * res_multiplier
        * def_multiplier
}

/// Bonus damage converted from toughness removed while the target is already broken.
pub fn super_break_damage(
    excess_toughness: u32,
    break_effect: f64,
    talent_multiplier: f64,
    def_multiplier: f64,
) -> f64 {
    LEVEL_MULTIPLIER
        * (f64::from(excess_toughness) / 10.0)
        * (1.0 + break_effect)
        * talent_multiplier
        * def_multiplier
}
