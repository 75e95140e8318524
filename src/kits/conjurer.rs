//! Character + summon pair. The familiar is a separate unit with its own speed and budget;
//! the scheduler interleaves the two by cumulative action value.

use crate::combat::{
    ActionBehavior, Actor, BaseStats, Battle, BattleContext, DamageType, Element, Hit, Unit,
};
use crate::config::{Scenario, SimulationProfile};
use crate::error::SimResult;

#[derive(Debug, Clone, Default)]
pub struct ConjurerKit;

impl ActionBehavior for ConjurerKit {
    fn name(&self) -> &str {
        "conjurer"
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        ctx.ultimate(Hit::new(DamageType::Ultimate, 3.2).toughness(20));
        // Always keeps one skill point in reserve.
        let hit = if ctx.actor.ledger.skill_points() > 1 {
            ctx.skill(Hit::new(DamageType::Skill, 1.5).toughness(20))
        } else {
            None
        };
        if hit.is_none() {
            ctx.basic_attack(Hit::new(DamageType::BasicAttack, 1.0).toughness(10));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FamiliarKit {
    multiplier: f64,
}

impl FamiliarKit {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            multiplier: 0.9 + 0.1 * f64::from(scenario.enhancement),
        }
    }
}

impl ActionBehavior for FamiliarKit {
    fn name(&self) -> &str {
        "familiar"
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        ctx.talent(Hit::new(DamageType::Summon, self.multiplier).toughness(5));
        Ok(())
    }
}

pub fn base_stats() -> BaseStats {
    BaseStats {
        attack: 2200.0,
        crit_rate: 0.6,
        crit_damage: 1.2,
        speed: 100.0,
        elemental_dmg_multiplier: 1.2,
        break_effect: 0.0,
        ultimate_energy_threshold: 130,
    }
}

pub fn familiar_stats() -> BaseStats {
    BaseStats {
        attack: 1600.0,
        crit_rate: 0.6,
        crit_damage: 1.2,
        speed: 120.0,
        elemental_dmg_multiplier: 1.2,
        break_effect: 0.0,
        ultimate_energy_threshold: 100,
    }
}

pub fn battle(profile: &SimulationProfile) -> SimResult<Battle> {
    let conjurer = Actor::new("Conjurer", Element::Quantum, profile.stats.apply(base_stats()))?;
    let familiar = Actor::new(
        "Familiar",
        Element::Quantum,
        profile.summon.apply(familiar_stats()),
    )?;
    Ok(Battle::with_summon(
        Unit::new(conjurer, ConjurerKit),
        Unit::new(familiar, FamiliarKit::new(&profile.scenario)),
        profile.enemy.tracker(),
    ))
}
