//! Enemy toughness and weakness-break state machine.
//!
//! `Intact --(toughness <= 0)--> Broken --(enemy turn)--> RecoveringDelay --(enemy turn)--> Intact`
//!
//! The break fires once per cycle. While broken, further toughness damage keeps driving the
//! pool negative and is banked as "excess" for super break; callers read and clear it with
//! [ToughnessTracker::take_excess_break].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::damage::Element;

pub const DEFAULT_MAX_TOUGHNESS: u32 = 160;

/// Enemy turns the target loses to the break before it recovers.
pub const BREAK_RECOVERY_DELAY_TURNS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToughnessState {
    Intact,
    /// Broken this cycle; the enemy has not taken a turn since.
    Broken,
    /// The enemy's turn is being consumed by the break delay.
    RecoveringDelay,
}

/// What a toughness reduction did to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToughnessHit {
    /// Target still intact (or the hit dealt no toughness damage).
    Reduced,
    /// This hit depleted the pool; break damage is due.
    Broke,
    /// Target was already broken; the amount was added to the excess delta.
    Excess(u32),
    /// The attack's element is not one of the target's weaknesses.
    Resisted,
}

/// Outcome of the enemy's own turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyTurn {
    Acted,
    Delayed,
    Recovered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToughnessTracker {
    current_toughness: i64,
    max_toughness: u32,
    state: ToughnessState,
    break_recovery_delay_turns: u32,
    excess_break: u32,
    weaknesses: Vec<Element>,
    break_count: u32,
}

impl Default for ToughnessTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOUGHNESS, Element::ALL.to_vec())
    }
}

impl ToughnessTracker {
    pub fn new(max_toughness: u32, weaknesses: Vec<Element>) -> Self {
        Self {
            current_toughness: i64::from(max_toughness),
            max_toughness,
            state: ToughnessState::Intact,
            break_recovery_delay_turns: 0,
            excess_break: 0,
            weaknesses,
            break_count: 0,
        }
    }

    pub fn reset(&mut self) {
        self.recover();
        self.excess_break = 0;
        self.break_count = 0;
    }

    pub fn current_toughness(&self) -> i64 {
        self.current_toughness
    }

    pub fn max_toughness(&self) -> u32 {
        self.max_toughness
    }

    pub fn state(&self) -> ToughnessState {
        self.state
    }

    pub fn is_weakness_broken(&self) -> bool {
        self.state != ToughnessState::Intact
    }

    pub fn break_recovery_delay_turns(&self) -> u32 {
        self.break_recovery_delay_turns
    }

    pub fn is_weak_to(&self, element: Element) -> bool {
        self.weaknesses.contains(&element)
    }

    pub fn weaknesses(&self) -> &[Element] {
        &self.weaknesses
    }

    /// Number of breaks since the last reset.
    pub fn break_count(&self) -> u32 {
        self.break_count
    }

    pub fn excess_break(&self) -> u32 {
        self.excess_break
    }

    /// Returns the banked excess toughness damage and clears it.
    pub fn take_excess_break(&mut self) -> u32 {
        std::mem::take(&mut self.excess_break)
    }

    pub fn reduce(&mut self, amount: u32, element: Element) -> ToughnessHit {
        if !self.is_weak_to(element) {
            return ToughnessHit::Resisted;
        }
        if amount == 0 {
            return ToughnessHit::Reduced;
        }
        self.current_toughness -= i64::from(amount);
        match self.state {
            ToughnessState::Intact if self.current_toughness <= 0 => {
                self.state = ToughnessState::Broken;
                self.break_recovery_delay_turns = BREAK_RECOVERY_DELAY_TURNS;
                self.break_count += 1;
                debug!(
                    toughness = self.current_toughness,
                    breaks = self.break_count,
                    "weakness broken"
                );
                ToughnessHit::Broke
            }
            ToughnessState::Intact => ToughnessHit::Reduced,
            ToughnessState::Broken | ToughnessState::RecoveringDelay => {
                self.excess_break = self.excess_break.saturating_add(amount);
                ToughnessHit::Excess(amount)
            }
        }
    }

    /// Advances the state machine by one enemy turn.
    pub fn on_enemy_turn(&mut self) -> EnemyTurn {
        match self.state {
            ToughnessState::Intact => EnemyTurn::Acted,
            ToughnessState::Broken => {
                self.state = ToughnessState::RecoveringDelay;
                self.break_recovery_delay_turns = self.break_recovery_delay_turns.saturating_sub(1);
                EnemyTurn::Delayed
            }
            ToughnessState::RecoveringDelay if self.break_recovery_delay_turns > 0 => {
                self.break_recovery_delay_turns -= 1;
                EnemyTurn::Delayed
            }
            ToughnessState::RecoveringDelay => {
                self.recover();
                debug!(toughness = self.current_toughness, "toughness recovered");
                EnemyTurn::Recovered
            }
        }
    }

    fn recover(&mut self) {
        self.current_toughness = i64::from(self.max_toughness);
        self.state = ToughnessState::Intact;
        self.break_recovery_delay_turns = 0;
    }
}
