//! Action-value turn scheduling.
//!
//! Each unit pays `10000 / speed` action value (AV) per turn out of its own cycle budget.
//! The next turn goes to the unit whose cumulative AV after acting would be lowest; ties go
//! to the lower slot (the character before its summon). A unit whose next turn no longer
//! fits its remaining budget is done for the battle.

use tracing::trace;

use crate::error::SimResult;

pub const ACTION_VALUE_SCALE: f64 = 10_000.0;
pub const FIRST_CYCLE_AV: f64 = 150.0;
pub const CYCLE_AV: f64 = 100.0;
pub const EPSILON: f64 = 1e-9;

/// Total AV available for `cycles` cycles: `150 + 100 * (cycles - 1)`, and 0 for zero cycles.
pub fn cycle_budget(cycles: u32) -> f64 {
    if cycles == 0 {
        0.0
    } else {
        FIRST_CYCLE_AV + CYCLE_AV * f64::from(cycles - 1)
    }
}

pub fn action_value(speed: f64) -> f64 {
    ACTION_VALUE_SCALE / speed
}

/// Closed-form turn count for a unit whose speed never changes.
pub fn turn_count(speed: f64, cycles: u32) -> u32 {
    ((cycle_budget(cycles) + EPSILON) / action_value(speed)).floor() as u32
}

/// The units taking part in one scheduled battle.
pub trait TurnOrder {
    fn unit_count(&self) -> usize;

    /// Current effective speed of `slot`, read fresh before every scheduling decision.
    fn speed(&self, slot: usize) -> SimResult<f64>;

    fn take_turn(&mut self, slot: usize) -> SimResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    pub turns: Vec<u32>,
    /// Budget each unit could not spend on a whole turn.
    pub leftover: Vec<f64>,
}

impl ScheduleReport {
    pub fn total_turns(&self) -> u32 {
        self.turns.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionValueScheduler {
    budget: f64,
}

impl ActionValueScheduler {
    pub fn new(budget: f64) -> Self {
        Self {
            budget: budget.max(0.0),
        }
    }

    pub fn for_cycles(cycles: u32) -> Self {
        Self::new(cycle_budget(cycles))
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn run<T: TurnOrder + ?Sized>(&self, units: &mut T) -> SimResult<ScheduleReport> {
        let count = units.unit_count();
        let mut remaining = vec![self.budget; count];
        let mut elapsed = vec![0.0_f64; count];
        let mut turns = vec![0u32; count];
        let mut done = vec![false; count];

        loop {
            let mut next: Option<(usize, f64, f64)> = None;
            for slot in 0..count {
                if done[slot] {
                    continue;
                }
                let av = action_value(units.speed(slot)?);
                if av > remaining[slot] + EPSILON {
                    done[slot] = true;
                    continue;
                }
                let acts_at = elapsed[slot] + av;
                if next.map_or(true, |(_, _, best)| acts_at < best - EPSILON) {
                    next = Some((slot, av, acts_at));
                }
            }

            let Some((slot, av, acts_at)) = next else {
                break;
            };
            remaining[slot] = (remaining[slot] - av).max(0.0);
            elapsed[slot] = acts_at;
            turns[slot] += 1;
            trace!(slot, av, acts_at, turn = turns[slot], "turn");
            units.take_turn(slot)?;
        }

        Ok(ScheduleReport {
            turns,
            leftover: remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;

    /// Fixed-speed units that log the slot order of every turn.
    struct Units {
        speeds: Vec<f64>,
        log: Vec<usize>,
        boost_after: Option<(usize, u32, f64)>,
    }

    impl Units {
        fn new(speeds: &[f64]) -> Self {
            Self {
                speeds: speeds.to_vec(),
                log: Vec::new(),
                boost_after: None,
            }
        }
    }

    impl TurnOrder for Units {
        fn unit_count(&self) -> usize {
            self.speeds.len()
        }

        fn speed(&self, slot: usize) -> SimResult<f64> {
            let speed = self.speeds[slot];
            if speed <= 0.0 {
                return Err(SimError::InvalidSpeed {
                    unit: slot.to_string(),
                    speed,
                });
            }
            Ok(speed)
        }

        fn take_turn(&mut self, slot: usize) -> SimResult<()> {
            self.log.push(slot);
            if let Some((boost_slot, after, speed)) = self.boost_after {
                let taken = self.log.iter().filter(|&&s| s == boost_slot).count() as u32;
                if slot == boost_slot && taken == after {
                    self.speeds[slot] = speed;
                }
            }
            Ok(())
        }
    }

    #[test]
    fn budget_formula() {
        assert_eq!(cycle_budget(0), 0.0);
        assert_eq!(cycle_budget(1), 150.0);
        assert_eq!(cycle_budget(7), 750.0);
    }

    #[test]
    fn turn_count_table_for_seven_cycles() {
        for (speed, expected) in [(90.0, 6), (100.0, 7), (134.0, 10), (160.0, 12), (200.1, 15)] {
            assert_eq!(turn_count(speed, 7), expected, "speed {speed}");
            let mut units = Units::new(&[speed]);
            let report = ActionValueScheduler::for_cycles(7)
                .run(&mut units)
                .expect("schedule should run");
            assert_eq!(report.turns, vec![expected], "speed {speed}");
        }
    }

    #[test]
    fn zero_cycles_never_takes_a_turn() {
        let mut units = Units::new(&[1000.0, 50.0]);
        let report = ActionValueScheduler::for_cycles(0)
            .run(&mut units)
            .expect("schedule should run");
        assert_eq!(report.total_turns(), 0);
        assert!(units.log.is_empty());
    }

    #[test]
    fn pair_interleaves_by_cumulative_av_with_character_first_on_ties() {
        // AV 100 vs 50: summon acts at 50, tie at 100 goes to the character.
        let mut units = Units::new(&[100.0, 200.0]);
        let report = ActionValueScheduler::for_cycles(2)
            .run(&mut units)
            .expect("schedule should run");
        assert_eq!(report.turns, vec![2, 5]);
        assert_eq!(units.log, vec![1, 0, 1, 1, 0, 1, 1]);
    }

    #[test]
    fn pair_runs_until_both_budgets_are_spent() {
        let mut units = Units::new(&[50.0, 300.0]);
        let report = ActionValueScheduler::for_cycles(3)
            .run(&mut units)
            .expect("schedule should run");
        assert_eq!(report.turns, vec![1, 10]);
        assert!(report.leftover.iter().all(|&left| left >= 0.0));
    }

    #[test]
    fn speed_change_applies_from_the_next_turn() {
        let mut units = Units::new(&[100.0]);
        units.boost_after = Some((0, 1, 200.0));
        let report = ActionValueScheduler::for_cycles(1)
            .run(&mut units)
            .expect("schedule should run");
        // First turn costs 100 at the old speed; the remaining 50 funds one turn at AV 50.
        assert_eq!(report.turns, vec![2]);
    }

    #[test]
    fn invalid_speed_propagates() {
        let mut units = Units::new(&[0.0]);
        let result = ActionValueScheduler::for_cycles(3).run(&mut units);
        assert!(matches!(result, Err(SimError::InvalidSpeed { .. })));
    }
}
