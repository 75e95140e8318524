//! Break-focused kit: high toughness damage, and a talent that converts toughness dealt to
//! an already-broken enemy into super break damage. The talent grows with the number of
//! allies on the field.

use crate::combat::{
    ActionBehavior, Actor, BaseStats, Battle, BattleContext, DamageType, Element, Hit, StatKey,
    StatModifier, TimerKind, Unit,
};
use crate::config::{Scenario, SimulationProfile};
use crate::error::SimResult;

pub const TECHNIQUE: &str = "technique";

const TECHNIQUE_TURNS: u32 = 2;
const TECHNIQUE_BREAK_EFFECT: f64 = 0.3;
const MAX_COUNTED_ALLIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct ShatterKit {
    super_break_multiplier: f64,
}

impl ShatterKit {
    pub fn new(scenario: &Scenario) -> Self {
        let allies = scenario.allies.min(MAX_COUNTED_ALLIES);
        Self {
            super_break_multiplier: 0.6 + 0.2 * f64::from(allies),
        }
    }

    pub fn super_break_multiplier(&self) -> f64 {
        self.super_break_multiplier
    }
}

impl ActionBehavior for ShatterKit {
    fn name(&self) -> &str {
        "shatter"
    }

    /// Opens the battle with a short break effect buff.
    fn reset_for_battle(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        ctx.actor
            .ledger
            .set_timer(TECHNIQUE, TimerKind::Duration, TECHNIQUE_TURNS, TECHNIQUE_TURNS);
        ctx.actor.add_timed_modifier(
            TECHNIQUE,
            StatModifier::flat(StatKey::BreakEffect, TECHNIQUE_BREAK_EFFECT),
        );
        Ok(())
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        ctx.ultimate(Hit::new(DamageType::Ultimate, 3.0).toughness(30));
        if ctx
            .skill(Hit::new(DamageType::Skill, 2.0).toughness(30))
            .is_none()
        {
            ctx.basic_attack(Hit::new(DamageType::BasicAttack, 1.0).toughness(15));
        }
        ctx.super_break(self.super_break_multiplier);
        Ok(())
    }
}

pub fn base_stats() -> BaseStats {
    BaseStats {
        attack: 1800.0,
        crit_rate: 0.3,
        crit_damage: 0.8,
        speed: 110.0,
        elemental_dmg_multiplier: 1.0,
        break_effect: 1.5,
        ultimate_energy_threshold: 110,
    }
}

pub fn battle(profile: &SimulationProfile) -> SimResult<Battle> {
    let stats = profile.stats.apply(base_stats());
    let actor = Actor::new("Shatter", Element::Physical, stats)?;
    Ok(Battle::solo(
        Unit::new(actor, ShatterKit::new(&profile.scenario)),
        profile.enemy.tracker(),
    ))
}
