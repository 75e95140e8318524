use crate::combat::{
    ActionBehavior, Actor, BaseStats, Battle, BattleContext, DamageType, Element, Hit, Unit,
};
use crate::config::SimulationProfile;
use crate::error::SimResult;

pub const BASIC_MULTIPLIER: f64 = 1.0;
pub const ULTIMATE_MULTIPLIER: f64 = 3.0;
pub const BASIC_TOUGHNESS: u32 = 10;
pub const ULTIMATE_TOUGHNESS: u32 = 30;

/// Reference kit: a basic attack every turn and the ultimate whenever energy is full.
#[derive(Debug, Clone, Default)]
pub struct BasicKit;

impl ActionBehavior for BasicKit {
    fn name(&self) -> &str {
        "basic"
    }

    fn take_turn(&mut self, ctx: &mut BattleContext<'_>) -> SimResult<()> {
        ctx.ultimate(
            Hit::new(DamageType::Ultimate, ULTIMATE_MULTIPLIER).toughness(ULTIMATE_TOUGHNESS),
        );
        ctx.basic_attack(
            Hit::new(DamageType::BasicAttack, BASIC_MULTIPLIER).toughness(BASIC_TOUGHNESS),
        );
        Ok(())
    }
}

pub fn base_stats() -> BaseStats {
    BaseStats::default()
}

pub fn battle(profile: &SimulationProfile) -> SimResult<Battle> {
    let stats = profile.stats.apply(base_stats());
    let actor = Actor::new("Basic", Element::Physical, stats)?;
    Ok(Battle::solo(Unit::new(actor, BasicKit), profile.enemy.tracker()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Rng;

    #[test]
    fn one_cycle_is_a_single_unreduced_basic_attack() {
        let mut battle = battle(&SimulationProfile::default()).expect("default battle");
        let run = battle.run(0, 1, &mut Rng::new(1)).expect("battle runs");
        let records = run.damage_trace.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DamageType::BasicAttack);
        assert_eq!(records[0].amount, 1800.0);
    }

    #[test]
    fn ultimate_fires_once_energy_reaches_threshold() {
        // 20 energy per basic attack: the 7th turn starts with 140 energy.
        let mut battle = battle(&SimulationProfile::default()).expect("default battle");
        let run = battle.run(0, 7, &mut Rng::new(1)).expect("battle runs");
        assert_eq!(run.turns, vec![7]);
        assert_eq!(run.damage_trace.count_of(DamageType::BasicAttack), 7);
        assert_eq!(run.damage_trace.count_of(DamageType::Ultimate), 0);

        let run = battle.run(1, 8, &mut Rng::new(1)).expect("battle runs");
        assert_eq!(run.damage_trace.count_of(DamageType::Ultimate), 1);
    }

    #[test]
    fn unreachable_threshold_is_not_an_error() {
        let mut profile = SimulationProfile::default();
        profile.stats.ultimate_energy_threshold = Some(10_000);
        let mut battle = battle(&profile).expect("battle builds");
        let run = battle.run(0, 10, &mut Rng::new(1)).expect("battle runs");
        assert_eq!(run.damage_trace.count_of(DamageType::Ultimate), 0);
    }
}
