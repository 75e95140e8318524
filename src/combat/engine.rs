//! Single-battle runner: resets every piece of state, drives the action-value scheduler to
//! completion and hands back the damage trace.
//!
//! The same [Battle] value is reused across Monte-Carlo trials; [Battle::run] always starts
//! from an explicit reset so no buff, resource or toughness state leaks between trials.

use tracing::debug;

use crate::combat::actor::Actor;
use crate::combat::behavior::{ActionBehavior, BattleContext};
use crate::combat::rng::Rng;
use crate::combat::scheduler::{ActionValueScheduler, ScheduleReport, TurnOrder};
use crate::combat::toughness::{EnemyTurn, ToughnessTracker};
use crate::combat::trace::{DamageTrace, SimulationRun};
use crate::error::{SimError, SimResult};

/// An actor paired with the kit that drives it.
pub struct Unit {
    pub actor: Actor,
    pub behavior: Box<dyn ActionBehavior>,
}

impl Unit {
    pub fn new(actor: Actor, behavior: impl ActionBehavior + 'static) -> Self {
        Self {
            actor,
            behavior: Box::new(behavior),
        }
    }
}

impl std::fmt::Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("actor", &self.actor.name())
            .field("behavior", &self.behavior.name())
            .finish()
    }
}

/// A character (slot 0), optionally its summon (slot 1), and the enemy they share.
#[derive(Debug)]
pub struct Battle {
    units: Vec<Unit>,
    enemy: ToughnessTracker,
    trace: DamageTrace,
}

impl Battle {
    pub fn solo(character: Unit, enemy: ToughnessTracker) -> Self {
        Self {
            units: vec![character],
            enemy,
            trace: DamageTrace::new(),
        }
    }

    pub fn with_summon(character: Unit, summon: Unit, enemy: ToughnessTracker) -> Self {
        Self {
            units: vec![character, summon],
            enemy,
            trace: DamageTrace::new(),
        }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn enemy(&self) -> &ToughnessTracker {
        &self.enemy
    }

    pub fn character(&self) -> &Actor {
        &self.units[0].actor
    }

    /// Runs one battle of `cycles` cycles and returns its trace tagged with `round_index`.
    pub fn run(
        &mut self,
        round_index: u32,
        cycles: u32,
        rng: &mut Rng,
    ) -> SimResult<SimulationRun> {
        self.trace.clear();
        self.enemy.reset();
        for unit in &mut self.units {
            unit.actor.reset();
        }

        let mut turns = BattleTurns {
            units: &mut self.units,
            enemy: &mut self.enemy,
            trace: &mut self.trace,
            rng,
        };
        turns.enter_battle()?;
        let report = ActionValueScheduler::for_cycles(cycles).run(&mut turns)?;
        log_report(round_index, &report, &self.trace);

        Ok(SimulationRun {
            round_index,
            damage_trace: std::mem::take(&mut self.trace),
            turns: report.turns,
        })
    }
}

fn log_report(round_index: u32, report: &ScheduleReport, trace: &DamageTrace) {
    debug!(
        round = round_index,
        turns = ?report.turns,
        hits = trace.len(),
        total = trace.total(),
        "battle finished"
    );
}

/// Disjoint borrows of a battle for the duration of one scheduler run.
struct BattleTurns<'a> {
    units: &'a mut [Unit],
    enemy: &'a mut ToughnessTracker,
    trace: &'a mut DamageTrace,
    rng: &'a mut Rng,
}

impl BattleTurns<'_> {
    fn enter_battle(&mut self) -> SimResult<()> {
        for Unit { actor, behavior } in self.units.iter_mut() {
            let mut ctx = BattleContext::new(actor, self.enemy, self.rng, self.trace);
            behavior.reset_for_battle(&mut ctx)?;
        }
        Ok(())
    }

    /// One enemy turn: the toughness state machine advances, then every unit reacts.
    fn enemy_turn(&mut self) -> SimResult<()> {
        let outcome = self.enemy.on_enemy_turn();
        if outcome != EnemyTurn::Acted {
            debug!(?outcome, "enemy turn");
        }
        for Unit { actor, behavior } in self.units.iter_mut() {
            let mut ctx = BattleContext::new(actor, self.enemy, self.rng, self.trace);
            behavior.on_enemy_turn(&mut ctx)?;
        }
        Ok(())
    }
}

impl TurnOrder for BattleTurns<'_> {
    fn unit_count(&self) -> usize {
        self.units.len()
    }

    fn speed(&self, slot: usize) -> SimResult<f64> {
        let actor = &self.units[slot].actor;
        let speed = actor.effective_stats().speed;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(SimError::InvalidSpeed {
                unit: actor.name().to_string(),
                speed,
            });
        }
        Ok(speed)
    }

    fn take_turn(&mut self, slot: usize) -> SimResult<()> {
        let Unit { actor, behavior } = &mut self.units[slot];
        let mut ctx = BattleContext::new(actor, self.enemy, self.rng, self.trace);
        behavior.take_turn(&mut ctx)?;
        actor.end_turn();

        if slot == 0 {
            self.enemy_turn()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::actor::BaseStats;
    use crate::combat::behavior::Hit;
    use crate::combat::damage::Element;
    use crate::combat::trace::DamageType;

    struct Jabber;

    impl ActionBehavior for Jabber {
        fn name(&self) -> &str {
            "jabber"
        }

        fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
            ctx.basic_attack(Hit::new(DamageType::BasicAttack, 1.0).toughness(10));
            Ok(())
        }
    }

    struct EnemyTurnCounter {
        seen: u32,
    }

    impl ActionBehavior for EnemyTurnCounter {
        fn name(&self) -> &str {
            "counter"
        }

        fn reset_for_battle(&mut self, _ctx: &mut BattleContext<'_>) -> SimResult<()> {
            self.seen = 0;
            Ok(())
        }

        fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
            ctx.record(f64::from(self.seen), DamageType::Summon);
            Ok(())
        }

        fn on_enemy_turn(&mut self, _ctx: &mut BattleContext<'_>) -> SimResult<()> {
            self.seen += 1;
            Ok(())
        }
    }

    fn unit(name: &str, speed: f64, behavior: impl ActionBehavior + 'static) -> Unit {
        let stats = BaseStats {
            speed,
            ..BaseStats::default()
        };
        Unit::new(
            Actor::new(name, Element::Physical, stats).expect("valid stats"),
            behavior,
        )
    }

    #[test]
    fn zero_cycles_produce_an_empty_trace() {
        let mut battle = Battle::solo(unit("a", 100.0, Jabber), ToughnessTracker::default());
        let run = battle.run(0, 0, &mut Rng::new(1)).expect("battle runs");
        assert!(run.damage_trace.is_empty());
        assert_eq!(run.turns, vec![0]);
    }

    #[test]
    fn reruns_start_from_reset_state() {
        let mut battle = Battle::solo(
            unit("a", 100.0, Jabber),
            ToughnessTracker::new(30, Element::ALL.to_vec()),
        );
        let mut rng = Rng::new(9);
        let first = battle.run(0, 4, &mut rng).expect("battle runs");
        let second = battle.run(1, 4, &mut rng).expect("battle runs");
        assert_eq!(first.damage_trace, second.damage_trace);
        assert_eq!(second.round_index, 1);
    }

    #[test]
    fn enemy_turns_follow_character_turns_only() {
        let mut battle = Battle::with_summon(
            unit("a", 100.0, Jabber),
            unit("b", 200.0, EnemyTurnCounter { seen: 0 }),
            ToughnessTracker::default(),
        );
        let run = battle.run(0, 2, &mut Rng::new(1)).expect("battle runs");
        assert_eq!(run.turns, vec![2, 5]);
        let seen: Vec<f64> = run
            .damage_trace
            .records()
            .iter()
            .filter(|r| r.kind == DamageType::Summon)
            .map(|r| r.amount)
            .collect();
        assert_eq!(seen, vec![0.0, 1.0, 1.0, 2.0, 2.0]);
    }
}
