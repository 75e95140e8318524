//! The seam between the battle kernel and per-character ability logic.
//!
//! A kit implements [ActionBehavior] and acts on the battle only through [BattleContext],
//! which owns the shared rules: damage composition, toughness bookkeeping and energy/skill
//! point accounting.

use tracing::debug;

use crate::combat::actor::{Actor, EffectiveStats};
use crate::combat::damage::{
    break_damage, roll_damage, super_break_damage, universal_reduction, DamageInput,
};
use crate::combat::rng::Rng;
use crate::combat::toughness::{ToughnessHit, ToughnessTracker};
use crate::combat::trace::{DamageTrace, DamageType};
use crate::error::SimResult;

pub const BASIC_ATTACK_ENERGY: u32 = 20;
pub const SKILL_ENERGY: u32 = 30;
pub const ULTIMATE_ENERGY_REFUND: u32 = 5;
pub const BASIC_ATTACK_SKILL_POINTS: u32 = 1;

/// Per-character strategy driven by the battle loop.
pub trait ActionBehavior {
    fn name(&self) -> &str;

    /// Clears kit-internal state and applies enter-battle effects. The actor and enemy have
    /// already been reset when this runs.
    fn reset_for_battle(&mut self, _ctx: &mut BattleContext<'_>) -> SimResult<()> {
        Ok(())
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()>;

    /// Called once per enemy turn, outside this unit's own turn slot.
    fn on_enemy_turn(&mut self, _ctx: &mut BattleContext<'_>) -> SimResult<()> {
        Ok(())
    }
}

/// One damage instance as described by a kit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: DamageType,
    pub multiplier: f64,
    pub toughness_damage: u32,
    pub flat_bonus: f64,
    pub extra_multipliers: f64,
    pub res_penetration: f64,
    pub def_reduction: f64,
}

impl Hit {
    pub fn new(kind: DamageType, multiplier: f64) -> Self {
        Self {
            kind,
            multiplier,
            toughness_damage: 0,
            flat_bonus: 0.0,
            extra_multipliers: 0.0,
            res_penetration: 0.0,
            def_reduction: 0.0,
        }
    }

    pub fn toughness(mut self, amount: u32) -> Self {
        self.toughness_damage = amount;
        self
    }

    pub fn flat(mut self, amount: f64) -> Self {
        self.flat_bonus += amount;
        self
    }

    pub fn bonus(mut self, extra: f64) -> Self {
        self.extra_multipliers += extra;
        self
    }

    pub fn res_pen(mut self, amount: f64) -> Self {
        self.res_penetration += amount;
        self
    }

    pub fn def_shred(mut self, amount: f64) -> Self {
        self.def_reduction += amount;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    pub damage: f64,
    pub crit: bool,
    pub toughness: ToughnessHit,
}

impl HitOutcome {
    pub fn broke(&self) -> bool {
        self.toughness == ToughnessHit::Broke
    }
}

/// Mutable view of the battle handed to a kit for one callback.
pub struct BattleContext<'a> {
    pub actor: &'a mut Actor,
    pub enemy: &'a mut ToughnessTracker,
    pub rng: &'a mut Rng,
    trace: &'a mut DamageTrace,
}

impl<'a> BattleContext<'a> {
    pub fn new(
        actor: &'a mut Actor,
        enemy: &'a mut ToughnessTracker,
        rng: &'a mut Rng,
        trace: &'a mut DamageTrace,
    ) -> Self {
        Self {
            actor,
            enemy,
            rng,
            trace,
        }
    }

    pub fn stats(&self) -> EffectiveStats {
        self.actor.effective_stats()
    }

    pub fn trace(&self) -> &DamageTrace {
        self.trace
    }

    fn input_for(&self, stats: &EffectiveStats, hit: &Hit) -> DamageInput {
        DamageInput::new(stats.attack, hit.multiplier)
            .with_crit(stats.crit_rate, stats.crit_damage)
            .with_flat_bonus(hit.flat_bonus)
            .with_extra(stats.elemental_dmg_multiplier - 1.0 + hit.extra_multipliers)
            .with_res_penetration(hit.res_penetration)
            .with_def_reduction(hit.def_reduction)
    }

    /// Deals one damage instance, then applies its toughness damage. The broken state is
    /// sampled before the reduction, so the hit that breaks still eats the 10% reduction.
    pub fn hit(&mut self, hit: Hit) -> HitOutcome {
        let stats = self.stats();
        let input = self.input_for(&stats, &hit);
        let broken = self.enemy.is_weakness_broken();
        let roll = roll_damage(&input, broken, self.rng);
        self.trace.push(roll.amount, hit.kind);

        let element = self.actor.element();
        let toughness = self.enemy.reduce(hit.toughness_damage, element);
        if toughness == ToughnessHit::Broke {
            let amount = break_damage(
                element,
                self.enemy.max_toughness(),
                stats.break_effect,
                input.res_multiplier(),
                input.def_multiplier(),
            );
            debug!(unit = self.actor.name(), amount, "break damage");
            self.trace.push(amount, DamageType::Break);
        }

        HitOutcome {
            damage: roll.amount,
            crit: roll.crit,
            toughness,
        }
    }

    /// Damage-over-time tick: never crits, `dot_bonus` replaces the DMG% terms.
    pub fn dot(&mut self, multiplier: f64, dot_bonus: f64) -> f64 {
        let stats = self.stats();
        let input = DamageInput::new(stats.attack, multiplier)
            .with_extra(stats.elemental_dmg_multiplier - 1.0 + dot_bonus)
            .as_dot();
        let roll = roll_damage(&input, self.enemy.is_weakness_broken(), self.rng);
        self.trace.push(roll.amount, DamageType::DoT);
        roll.amount
    }

    /// Converts the enemy's banked excess toughness into super break damage.
    /// Returns 0 (and records nothing) when there is no excess.
    pub fn super_break(&mut self, talent_multiplier: f64) -> f64 {
        let excess = self.enemy.take_excess_break();
        if excess == 0 {
            return 0.0;
        }
        let stats = self.stats();
        let amount = super_break_damage(excess, stats.break_effect, talent_multiplier, 1.0)
            * universal_reduction(self.enemy.is_weakness_broken());
        self.trace.push(amount, DamageType::SuperBreak);
        amount
    }

    /// Records an already-computed damage value under `kind`.
    pub fn record(&mut self, amount: f64, kind: DamageType) {
        self.trace.push(amount, kind);
    }

    pub fn basic_attack(&mut self, hit: Hit) -> HitOutcome {
        let outcome = self.hit(hit);
        self.actor.ledger.gain_skill_points(BASIC_ATTACK_SKILL_POINTS);
        self.actor.ledger.gain_energy(BASIC_ATTACK_ENERGY);
        outcome
    }

    /// Spends a skill point and lands `hit`. `None` when no skill point is available.
    pub fn skill(&mut self, hit: Hit) -> Option<HitOutcome> {
        if !self.actor.ledger.spend_skill_point() {
            return None;
        }
        let outcome = self.hit(hit);
        self.actor.ledger.gain_energy(SKILL_ENERGY);
        Some(outcome)
    }

    /// Spends a full energy bar and lands `hit`. `None` while energy is below threshold.
    pub fn ultimate(&mut self, hit: Hit) -> Option<HitOutcome> {
        if !self.actor.ledger.ultimate_ready() {
            return None;
        }
        self.actor.ledger.set_energy(0);
        let outcome = self.hit(hit);
        self.actor.ledger.gain_energy(ULTIMATE_ENERGY_REFUND);
        Some(outcome)
    }

    pub fn talent(&mut self, hit: Hit) -> HitOutcome {
        self.hit(hit)
    }
}
