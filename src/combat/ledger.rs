//! Per-actor resource pools: skill points, ultimate energy and named timers.
//!
//! Every counter is bounded on both sides. Mutations clamp instead of failing, so a kit that
//! over-grants energy or stacks simply saturates at the cap.

use std::collections::BTreeMap;

pub const DEFAULT_SKILL_POINTS: u32 = 3;
pub const MAX_SKILL_POINTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Remaining owner turns. Decremented by [ResourceLedger::tick_durations] at the end of
    /// each of the owner's turns; a duration of `n` survives `n` ticks, counting the turn it
    /// was applied in.
    Duration,
    /// Stack count. Only changed explicitly by the owning kit.
    Stacks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    kind: TimerKind,
    value: u32,
    max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    skill_points: u32,
    max_skill_points: u32,
    ultimate_energy: u32,
    ultimate_energy_threshold: u32,
    timers: BTreeMap<String, Timer>,
}

impl ResourceLedger {
    pub fn new(ultimate_energy_threshold: u32) -> Self {
        Self {
            skill_points: DEFAULT_SKILL_POINTS,
            max_skill_points: MAX_SKILL_POINTS,
            ultimate_energy: 0,
            ultimate_energy_threshold,
            timers: BTreeMap::new(),
        }
    }

    /// Restores battle-start values. Timers are dropped, so every name reads back as 0.
    pub fn reset(&mut self) {
        self.skill_points = DEFAULT_SKILL_POINTS.min(self.max_skill_points);
        self.ultimate_energy = 0;
        self.timers.clear();
    }

    pub fn skill_points(&self) -> u32 {
        self.skill_points
    }

    pub fn max_skill_points(&self) -> u32 {
        self.max_skill_points
    }

    pub fn gain_skill_points(&mut self, amount: u32) {
        self.skill_points = self
            .skill_points
            .saturating_add(amount)
            .min(self.max_skill_points);
    }

    /// Spends one skill point. Returns `false` (and changes nothing) when the pool is empty.
    pub fn spend_skill_point(&mut self) -> bool {
        if self.skill_points == 0 {
            return false;
        }
        self.skill_points -= 1;
        true
    }

    pub fn ultimate_energy(&self) -> u32 {
        self.ultimate_energy
    }

    pub fn ultimate_energy_threshold(&self) -> u32 {
        self.ultimate_energy_threshold
    }

    pub fn gain_energy(&mut self, amount: u32) {
        self.ultimate_energy = self
            .ultimate_energy
            .saturating_add(amount)
            .min(self.ultimate_energy_threshold);
    }

    pub fn set_energy(&mut self, amount: u32) {
        self.ultimate_energy = amount.min(self.ultimate_energy_threshold);
    }

    pub fn ultimate_ready(&self) -> bool {
        self.ultimate_energy >= self.ultimate_energy_threshold
    }

    /// Current value of a named timer; unknown names read as 0.
    pub fn timer(&self, name: &str) -> u32 {
        self.timers.get(name).map_or(0, |timer| timer.value)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.timer(name) > 0
    }

    /// Sets (or refreshes) a timer to `value`, clamped to `max`.
    pub fn set_timer(&mut self, name: &str, kind: TimerKind, value: u32, max: u32) {
        let timer = Timer {
            kind,
            value: value.min(max),
            max,
        };
        self.timers.insert(name.to_string(), timer);
    }

    /// Adds stacks to a [TimerKind::Stacks] timer, creating it if absent, clamped to `max`.
    /// Returns the new count.
    pub fn add_stacks(&mut self, name: &str, amount: u32, max: u32) -> u32 {
        let timer = self.timers.entry(name.to_string()).or_insert(Timer {
            kind: TimerKind::Stacks,
            value: 0,
            max,
        });
        timer.max = max;
        timer.value = timer.value.saturating_add(amount).min(max);
        timer.value
    }

    /// Decrements one timer by one, never below zero. Returns the new value.
    pub fn decrement(&mut self, name: &str) -> u32 {
        match self.timers.get_mut(name) {
            Some(timer) => {
                timer.value = timer.value.saturating_sub(1);
                timer.value
            }
            None => 0,
        }
    }

    /// Reads a timer and zeroes it.
    pub fn consume(&mut self, name: &str) -> u32 {
        match self.timers.get_mut(name) {
            Some(timer) => std::mem::take(&mut timer.value),
            None => 0,
        }
    }

    /// End-of-owner-turn bookkeeping: every [TimerKind::Duration] timer loses one turn.
    pub fn tick_durations(&mut self) {
        for timer in self.timers.values_mut() {
            if timer.kind == TimerKind::Duration {
                timer.value = timer.value.saturating_sub(1);
            }
        }
    }

    pub fn timers(&self) -> impl Iterator<Item = (&str, u32)> {
        self.timers
            .iter()
            .map(|(name, timer)| (name.as_str(), timer.value))
    }

    /// Upper bound of a timer, if it exists.
    pub fn timer_max(&self, name: &str) -> Option<u32> {
        self.timers.get(name).map(|timer| timer.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_reads_back_documented_defaults() {
        let mut ledger = ResourceLedger::new(140);
        ledger.gain_energy(90);
        ledger.spend_skill_point();
        ledger.set_timer("burn", TimerKind::Duration, 2, 2);
        ledger.add_stacks("shock", 3, 5);

        ledger.reset();

        assert_eq!(ledger.skill_points(), DEFAULT_SKILL_POINTS);
        assert_eq!(ledger.ultimate_energy(), 0);
        assert_eq!(ledger.timer("burn"), 0);
        assert_eq!(ledger.timer("shock"), 0);
        assert_eq!(ledger.timers().count(), 0);
    }

    #[test]
    fn skill_points_clamp_at_both_ends() {
        let mut ledger = ResourceLedger::new(140);
        ledger.gain_skill_points(10);
        assert_eq!(ledger.skill_points(), MAX_SKILL_POINTS);

        for _ in 0..MAX_SKILL_POINTS {
            assert!(ledger.spend_skill_point());
        }
        assert!(!ledger.spend_skill_point());
        assert_eq!(ledger.skill_points(), 0);
    }

    #[test]
    fn energy_saturates_at_threshold() {
        let mut ledger = ResourceLedger::new(140);
        ledger.gain_energy(100);
        assert!(!ledger.ultimate_ready());
        ledger.gain_energy(100);
        assert_eq!(ledger.ultimate_energy(), 140);
        assert!(ledger.ultimate_ready());

        ledger.set_energy(500);
        assert_eq!(ledger.ultimate_energy(), 140);
    }

    #[test]
    fn durations_tick_but_stacks_do_not() {
        let mut ledger = ResourceLedger::new(140);
        ledger.set_timer("combustion", TimerKind::Duration, 2, 3);
        ledger.add_stacks("shock", 2, 5);

        ledger.tick_durations();
        assert_eq!(ledger.timer("combustion"), 1);
        assert_eq!(ledger.timer("shock"), 2);

        ledger.tick_durations();
        ledger.tick_durations();
        assert_eq!(ledger.timer("combustion"), 0);
        assert!(!ledger.is_active("combustion"));
    }

    #[test]
    fn stacks_and_timers_clamp_to_their_max() {
        let mut ledger = ResourceLedger::new(140);
        assert_eq!(ledger.add_stacks("shock", 4, 5), 4);
        assert_eq!(ledger.add_stacks("shock", 4, 5), 5);
        ledger.set_timer("burn", TimerKind::Duration, 9, 2);
        assert_eq!(ledger.timer("burn"), 2);
        assert_eq!(ledger.timer_max("burn"), Some(2));
    }

    #[test]
    fn consume_and_decrement_never_go_negative() {
        let mut ledger = ResourceLedger::new(140);
        assert_eq!(ledger.decrement("missing"), 0);
        ledger.add_stacks("charge", 1, 3);
        assert_eq!(ledger.decrement("charge"), 0);
        assert_eq!(ledger.decrement("charge"), 0);

        ledger.add_stacks("charge", 3, 3);
        assert_eq!(ledger.consume("charge"), 3);
        assert_eq!(ledger.timer("charge"), 0);
        assert_eq!(ledger.consume("charge"), 0);
    }
}
