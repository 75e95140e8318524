//! Burn-focused kit. The skill leaves a burn that ticks on enemy turns; the ultimate enters
//! combustion, a speed-raising mode that also empowers basic attacks.

use crate::combat::{
    ActionBehavior, Actor, BaseStats, Battle, BattleContext, DamageType, Element, Hit, StatKey,
    StatModifier, TimerKind, Unit,
};
use crate::config::{Scenario, SimulationProfile};
use crate::error::SimResult;

pub const BURN: &str = "burn";
pub const COMBUSTION: &str = "combustion";

/// Enemy turns a fresh burn lasts.
pub const BURN_TURNS: u32 = 2;
/// Covers the turn the ultimate is used in plus the next two.
pub const COMBUSTION_TURNS: u32 = 3;

const BASIC_MULTIPLIER: f64 = 1.0;
const COMBUSTION_BASIC_BONUS: f64 = 0.5;
const SKILL_MULTIPLIER: f64 = 1.6;
const ULTIMATE_MULTIPLIER: f64 = 2.4;
const BURN_MULTIPLIER: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct PyroKit {
    burn_multiplier: f64,
    combustion_speed: f64,
}

impl PyroKit {
    pub fn new(scenario: &Scenario) -> Self {
        let tier = f64::from(scenario.enhancement);
        Self {
            burn_multiplier: BURN_MULTIPLIER + 0.1 * tier,
            combustion_speed: 0.5 + 0.05 * tier,
        }
    }

    fn enter_combustion(&self, ctx: &mut BattleContext<'_>) {
        ctx.actor
            .ledger
            .set_timer(COMBUSTION, TimerKind::Duration, COMBUSTION_TURNS, COMBUSTION_TURNS);
        ctx.actor.add_timed_modifier(
            COMBUSTION,
            StatModifier::percent(StatKey::Speed, self.combustion_speed),
        );
    }
}

impl ActionBehavior for PyroKit {
    fn name(&self) -> &str {
        "pyro"
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        if ctx
            .ultimate(Hit::new(DamageType::Ultimate, ULTIMATE_MULTIPLIER).toughness(20))
            .is_some()
        {
            self.enter_combustion(ctx);
        }

        if ctx.actor.ledger.is_active(COMBUSTION) {
            ctx.basic_attack(
                Hit::new(DamageType::BasicAttack, BASIC_MULTIPLIER)
                    .bonus(COMBUSTION_BASIC_BONUS)
                    .toughness(15),
            );
        } else if ctx
            .skill(Hit::new(DamageType::Skill, SKILL_MULTIPLIER).toughness(20))
            .is_some()
        {
            ctx.actor
                .ledger
                .set_timer(BURN, TimerKind::Stacks, BURN_TURNS, BURN_TURNS);
        } else {
            ctx.basic_attack(Hit::new(DamageType::BasicAttack, BASIC_MULTIPLIER).toughness(10));
        }
        Ok(())
    }

    fn on_enemy_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        if ctx.actor.ledger.is_active(BURN) {
            ctx.dot(self.burn_multiplier, 0.0);
            ctx.actor.ledger.decrement(BURN);
        }
        Ok(())
    }
}

pub fn base_stats() -> BaseStats {
    BaseStats {
        attack: 2400.0,
        crit_rate: 0.5,
        crit_damage: 1.0,
        speed: 101.0,
        elemental_dmg_multiplier: 1.3,
        break_effect: 0.2,
        ultimate_energy_threshold: 120,
    }
}

pub fn battle(profile: &SimulationProfile) -> SimResult<Battle> {
    let stats = profile.stats.apply(base_stats());
    let actor = Actor::new("Pyro", Element::Fire, stats)?;
    Ok(Battle::solo(
        Unit::new(actor, PyroKit::new(&profile.scenario)),
        profile.enemy.tracker(),
    ))
}
