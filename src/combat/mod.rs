pub mod actor;
pub mod behavior;
pub mod damage;
pub mod engine;
pub mod ledger;
pub mod rng;
pub mod scheduler;
pub mod stacking;
pub mod toughness;
pub mod trace;

pub use actor::{Actor, BaseStats, EffectiveStats, TimedModifier};
pub use behavior::{
    ActionBehavior, BattleContext, Hit, HitOutcome, BASIC_ATTACK_ENERGY,
    BASIC_ATTACK_SKILL_POINTS, SKILL_ENERGY, ULTIMATE_ENERGY_REFUND,
};
pub use damage::{
    break_damage, damage_with_crit, roll_damage, super_break_damage, universal_reduction,
    DamageInput, DamageRoll, Element, INTACT_DAMAGE_REDUCTION, LEVEL_MULTIPLIER,
};
pub use engine::{Battle, Unit};
pub use ledger::{ResourceLedger, TimerKind, DEFAULT_SKILL_POINTS, MAX_SKILL_POINTS};
pub use rng::Rng;
pub use scheduler::{
    action_value, cycle_budget, turn_count, ActionValueScheduler, ScheduleReport, TurnOrder,
    EPSILON,
};
pub use stacking::{CategoryTotals, ModifierStack, StackCategory, StatKey, StatModifier};
pub use toughness::{
    EnemyTurn, ToughnessHit, ToughnessState, ToughnessTracker, BREAK_RECOVERY_DELAY_TURNS,
    DEFAULT_MAX_TOUGHNESS,
};
pub use trace::{DamageRecord, DamageTrace, DamageType, SimulationRun};
