//! Characters and summons: immutable base stats, a resource ledger and timed modifiers.
//!
//! Effective stats are recomputed from the base on every read, so expiring a buff never
//! needs a restore step.

use serde::{Deserialize, Serialize};

use crate::combat::damage::Element;
use crate::combat::ledger::ResourceLedger;
use crate::combat::stacking::{ModifierStack, StatKey, StatModifier};
use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub attack: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub speed: f64,
    pub elemental_dmg_multiplier: f64,
    pub break_effect: f64,
    pub ultimate_energy_threshold: u32,
}

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            attack: 2000.0,
            crit_rate: 0.0,
            crit_damage: 0.5,
            speed: 100.0,
            elemental_dmg_multiplier: 1.0,
            break_effect: 0.0,
            ultimate_energy_threshold: 140,
        }
    }
}

impl BaseStats {
    pub fn validate(&self) -> SimResult<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(invalid("speed", self.speed, "must be positive and finite"));
        }
        if !self.attack.is_finite() || self.attack < 0.0 {
            return Err(invalid("attack", self.attack, "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.crit_rate) {
            return Err(invalid("crit rate", self.crit_rate, "must lie in [0, 1]"));
        }
        if !self.crit_damage.is_finite() || self.crit_damage < 0.0 {
            return Err(invalid("crit damage", self.crit_damage, "must be non-negative"));
        }
        if !self.elemental_dmg_multiplier.is_finite() || self.elemental_dmg_multiplier < 1.0 {
            return Err(invalid(
                "elemental damage multiplier",
                self.elemental_dmg_multiplier,
                "must be at least 1",
            ));
        }
        if !self.break_effect.is_finite() || self.break_effect < 0.0 {
            return Err(invalid("break effect", self.break_effect, "must be non-negative"));
        }
        if self.ultimate_energy_threshold == 0 {
            return Err(invalid("ultimate energy threshold", 0.0, "must be positive"));
        }
        Ok(())
    }
}

fn invalid(stat: &'static str, value: f64, reason: &'static str) -> SimError {
    SimError::InvalidStat {
        stat,
        value,
        reason,
    }
}

/// Stats after active modifiers. Crit rate is clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveStats {
    pub attack: f64,
    pub crit_rate: f64,
    pub crit_damage: f64,
    pub speed: f64,
    pub elemental_dmg_multiplier: f64,
    pub break_effect: f64,
}

/// A stat modifier that stays active while the named ledger timer is non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedModifier {
    pub timer: String,
    pub modifier: StatModifier,
}

#[derive(Debug, Clone)]
pub struct Actor {
    name: String,
    element: Element,
    base: BaseStats,
    pub ledger: ResourceLedger,
    modifiers: Vec<TimedModifier>,
}

impl Actor {
    pub fn new(name: impl Into<String>, element: Element, base: BaseStats) -> SimResult<Self> {
        base.validate()?;
        Ok(Self {
            name: name.into(),
            element,
            ledger: ResourceLedger::new(base.ultimate_energy_threshold),
            base,
            modifiers: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> Element {
        self.element
    }

    pub fn base(&self) -> &BaseStats {
        &self.base
    }

    /// Back to battle-start state: ledger defaults and no modifiers. Base stats are untouched.
    pub fn reset(&mut self) {
        self.ledger.reset();
        self.modifiers.clear();
    }

    /// Registers `modifier` under `timer`. A modifier already registered under the same timer
    /// for the same stat is replaced rather than stacked.
    pub fn add_timed_modifier(&mut self, timer: &str, modifier: StatModifier) {
        self.modifiers
            .retain(|existing| !(existing.timer == timer && existing.modifier.key == modifier.key));
        self.modifiers.push(TimedModifier {
            timer: timer.to_string(),
            modifier,
        });
    }

    pub fn active_modifiers(&self) -> impl Iterator<Item = &TimedModifier> {
        self.modifiers
            .iter()
            .filter(|timed| self.ledger.is_active(&timed.timer))
    }

    pub fn effective_stats(&self) -> EffectiveStats {
        let mut stack = ModifierStack::new();
        stack.add_many(self.active_modifiers().map(|timed| timed.modifier));
        let base = &self.base;
        EffectiveStats {
            attack: stack.compose(StatKey::Attack, base.attack),
            crit_rate: stack.compose(StatKey::CritRate, base.crit_rate).clamp(0.0, 1.0),
            crit_damage: stack.compose(StatKey::CritDamage, base.crit_damage).max(0.0),
            speed: stack.compose(StatKey::Speed, base.speed),
            elemental_dmg_multiplier: stack
                .compose(StatKey::ElementalDamage, base.elemental_dmg_multiplier)
                .max(1.0),
            break_effect: stack.compose(StatKey::BreakEffect, base.break_effect).max(0.0),
        }
    }

    /// End-of-own-turn bookkeeping: tick durations and drop modifiers whose timer expired.
    pub fn end_turn(&mut self) {
        self.ledger.tick_durations();
        let ledger = &self.ledger;
        self.modifiers.retain(|timed| ledger.is_active(&timed.timer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ledger::{TimerKind, DEFAULT_SKILL_POINTS};

    fn actor() -> Actor {
        Actor::new("tester", Element::Fire, BaseStats::default()).expect("defaults are valid")
    }

    #[test]
    fn rejects_invalid_configuration() {
        let zero_speed = BaseStats {
            speed: 0.0,
            ..BaseStats::default()
        };
        assert!(matches!(
            Actor::new("a", Element::Ice, zero_speed),
            Err(SimError::InvalidStat { stat: "speed", .. })
        ));

        let bad_crit = BaseStats {
            crit_rate: 1.5,
            ..BaseStats::default()
        };
        assert!(matches!(
            Actor::new("a", Element::Ice, bad_crit),
            Err(SimError::InvalidStat { stat: "crit rate", .. })
        ));

        let low_elemental = BaseStats {
            elemental_dmg_multiplier: 0.8,
            ..BaseStats::default()
        };
        assert!(Actor::new("a", Element::Ice, low_elemental).is_err());

        let no_threshold = BaseStats {
            ultimate_energy_threshold: 0,
            ..BaseStats::default()
        };
        assert!(Actor::new("a", Element::Ice, no_threshold).is_err());
    }

    #[test]
    fn effective_stats_follow_timer_lifetime() {
        let mut actor = actor();
        actor.ledger.set_timer("haste", TimerKind::Duration, 2, 2);
        actor.add_timed_modifier("haste", StatModifier::percent(StatKey::Speed, 0.5));
        assert_eq!(actor.effective_stats().speed, 150.0);

        actor.end_turn();
        assert_eq!(actor.effective_stats().speed, 150.0);
        actor.end_turn();
        assert_eq!(actor.effective_stats().speed, 100.0);
        assert_eq!(actor.active_modifiers().count(), 0);
        assert_eq!(actor.base().speed, 100.0);
    }

    #[test]
    fn refreshing_a_modifier_does_not_stack_it() {
        let mut actor = actor();
        actor.ledger.set_timer("rage", TimerKind::Duration, 3, 3);
        actor.add_timed_modifier("rage", StatModifier::percent(StatKey::Attack, 0.2));
        actor.add_timed_modifier("rage", StatModifier::percent(StatKey::Attack, 0.2));
        assert!((actor.effective_stats().attack - 2400.0).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut actor = actor();
        actor.ledger.gain_energy(60);
        actor.ledger.set_timer("haste", TimerKind::Duration, 2, 2);
        actor.add_timed_modifier("haste", StatModifier::flat(StatKey::Speed, 30.0));

        actor.reset();

        assert_eq!(actor.ledger.ultimate_energy(), 0);
        assert_eq!(actor.ledger.skill_points(), DEFAULT_SKILL_POINTS);
        assert_eq!(actor.ledger.timer("haste"), 0);
        assert_eq!(actor.effective_stats().speed, 100.0);
    }

    #[test]
    fn crit_rate_is_clamped_after_buffs() {
        let mut actor = actor();
        actor.ledger.set_timer("focus", TimerKind::Duration, 1, 1);
        actor.add_timed_modifier("focus", StatModifier::flat(StatKey::CritRate, 2.0));
        assert_eq!(actor.effective_stats().crit_rate, 1.0);
    }
}
