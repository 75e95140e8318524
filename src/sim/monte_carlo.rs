//! Monte-Carlo aggregation over repeated single battles.
//!
//! The sequential entry points reuse one [Battle] and one continuing RNG stream across all
//! trials; each trial starts from the battle's explicit reset. The parallel entry point
//! builds a fresh battle per batch and derives one stream per batch from the seed, so its
//! results are reproducible for a given seed but not bit-identical to the sequential mode.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::combat::{Battle, DamageType, Rng, SimulationRun};
use crate::config::SimulationProfile;
use crate::error::{SimError, SimResult};
use crate::kits::build_battle;
use crate::parallel::{plan_trial_batches, TrialBatch, WorkerPool};
use crate::rng_for_profile;
use crate::sim::export::{rows_from_run, DamageRow};

/// Trials per parallel batch. Fixed so parallel results do not depend on the core count.
pub const TRIALS_PER_BATCH: u32 = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageSummary {
    pub trials: u32,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    /// Mean damage per trial, split by damage type.
    pub mean_by_type: BTreeMap<DamageType, f64>,
}

impl DamageSummary {
    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.mean, self.min, self.max)
    }
}

#[derive(Debug, Clone)]
struct SummaryAccumulator {
    trials: u32,
    sum: f64,
    sum_sq: f64,
    min: f64,
    max: f64,
    by_type: BTreeMap<DamageType, f64>,
}

impl Default for SummaryAccumulator {
    fn default() -> Self {
        Self {
            trials: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            by_type: BTreeMap::new(),
        }
    }
}

impl SummaryAccumulator {
    fn add(&mut self, run: &SimulationRun) {
        let total = run.total_damage();
        self.trials += 1;
        self.sum += total;
        self.sum_sq += total * total;
        self.min = self.min.min(total);
        self.max = self.max.max(total);
        for (kind, amount) in run.damage_trace.total_by_type() {
            *self.by_type.entry(kind).or_insert(0.0) += amount;
        }
    }

    fn merge(&mut self, other: SummaryAccumulator) {
        self.trials += other.trials;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        for (kind, amount) in other.by_type {
            *self.by_type.entry(kind).or_insert(0.0) += amount;
        }
    }

    fn finish(self) -> SimResult<DamageSummary> {
        if self.trials == 0 {
            return Err(SimError::NoTrials);
        }
        let n = f64::from(self.trials);
        // Rounding in the sum must not push the mean outside the observed range.
        let mean = (self.sum / n).clamp(self.min, self.max);
        let variance = (self.sum_sq / n - mean * mean).max(0.0);
        if self.max == 0.0 {
            warn!(trials = self.trials, "no damage dealt in any trial");
        }
        Ok(DamageSummary {
            trials: self.trials,
            mean,
            min: self.min,
            max: self.max,
            std_dev: variance.sqrt(),
            mean_by_type: self
                .by_type
                .into_iter()
                .map(|(kind, total)| (kind, total / n))
                .collect(),
        })
    }
}

/// Runs `trials` battles back to back and keeps every trace.
pub fn run_trials(
    battle: &mut Battle,
    cycles: u32,
    trials: u32,
    rng: &mut Rng,
) -> SimResult<Vec<SimulationRun>> {
    (0..trials)
        .map(|round| battle.run(round, cycles, rng))
        .collect()
}

/// Mean/min/max (plus spread and per-type means) of total damage over `trials` battles.
pub fn aggregate(
    battle: &mut Battle,
    cycles: u32,
    trials: u32,
    rng: &mut Rng,
) -> SimResult<DamageSummary> {
    if trials == 0 {
        return Err(SimError::NoTrials);
    }
    let mut acc = SummaryAccumulator::default();
    for round in 0..trials {
        let run = battle.run(round, cycles, rng)?;
        acc.add(&run);
    }
    let summary = acc.finish()?;
    info!(
        trials,
        cycles,
        mean = summary.mean,
        min = summary.min,
        max = summary.max,
        "aggregate complete"
    );
    Ok(summary)
}

/// Every damage instance of every trial, flattened into export rows.
pub fn aggregate_rows(
    battle: &mut Battle,
    cycles: u32,
    trials: u32,
    rng: &mut Rng,
) -> SimResult<Vec<DamageRow>> {
    if trials == 0 {
        return Err(SimError::NoTrials);
    }
    let mut rows = Vec::new();
    for round in 0..trials {
        let run = battle.run(round, cycles, rng)?;
        rows.extend(rows_from_run(&run));
    }
    info!(trials, cycles, rows = rows.len(), "rows collected");
    Ok(rows)
}

/// Parallel [aggregate]. `build` is called once per batch, so no battle state is ever
/// shared between workers.
pub fn aggregate_parallel<F>(
    build: F,
    cycles: u32,
    trials: u32,
    seed: u64,
    pool: &WorkerPool,
) -> SimResult<DamageSummary>
where
    F: Fn() -> SimResult<Battle> + Sync,
{
    if trials == 0 {
        return Err(SimError::NoTrials);
    }
    let batches = plan_trial_batches(trials, TRIALS_PER_BATCH, seed);
    let run_batch = |batch: &TrialBatch| -> SimResult<SummaryAccumulator> {
        let mut battle = build()?;
        let mut rng = Rng::new(batch.seed);
        let mut acc = SummaryAccumulator::default();
        for round in batch.start..batch.end {
            let run = battle.run(round, cycles, &mut rng)?;
            acc.add(&run);
        }
        Ok(acc)
    };

    let partials: Vec<SummaryAccumulator> =
        pool.install(|| batches.par_iter().map(run_batch).collect::<SimResult<Vec<_>>>())??;

    let mut acc = SummaryAccumulator::default();
    for partial in partials {
        acc.merge(partial);
    }
    let summary = acc.finish()?;
    info!(
        trials,
        cycles,
        batches = batches.len(),
        mean = summary.mean,
        "parallel aggregate complete"
    );
    Ok(summary)
}

/// Runs the aggregate a profile describes, sequential or parallel as configured.
pub fn aggregate_profile(profile: &SimulationProfile) -> SimResult<DamageSummary> {
    if profile.parallel {
        let seed = match profile.seed {
            Some(seed) => seed,
            None => crate::combat::rng::entropy_seed()?,
        };
        let pool = WorkerPool::with_workers(profile.workers);
        aggregate_parallel(
            || build_battle(profile),
            profile.cycles,
            profile.trials,
            seed,
            &pool,
        )
    } else {
        let mut battle = build_battle(profile)?;
        let mut rng = rng_for_profile(profile)?;
        aggregate(&mut battle, profile.cycles, profile.trials, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn battle(kit: &str) -> Battle {
        build_battle(&SimulationProfile::for_kit(kit)).expect("kit builds")
    }

    #[test]
    fn single_trial_mean_is_the_run_total() {
        let mut rng = Rng::new(21);
        let mut replay = Rng::new(21);
        let summary = aggregate(&mut battle("pyro"), 4, 1, &mut rng).expect("aggregate runs");
        let run = battle("pyro").run(0, 4, &mut replay).expect("battle runs");

        assert_eq!(summary.trials, 1);
        assert_eq!(summary.mean, run.total_damage());
        assert_eq!(summary.min, summary.max);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn mean_lies_between_min_and_max() {
        let summary =
            aggregate(&mut battle("conjurer"), 5, 200, &mut Rng::new(5)).expect("aggregate runs");
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
        assert!(summary.max > summary.min, "crits should spread the totals");
        let by_type_total: f64 = summary.mean_by_type.values().sum();
        assert!((by_type_total - summary.mean).abs() < 1e-6 * summary.mean);
    }

    #[test]
    fn zero_trials_is_an_error() {
        assert!(matches!(
            aggregate(&mut battle("basic"), 3, 0, &mut Rng::new(1)),
            Err(SimError::NoTrials)
        ));
        assert!(matches!(
            aggregate_rows(&mut battle("basic"), 3, 0, &mut Rng::new(1)),
            Err(SimError::NoTrials)
        ));
    }

    #[test]
    fn rows_cover_every_trial() {
        let rows = aggregate_rows(&mut battle("basic"), 1, 3, &mut Rng::new(1)).expect("rows");
        let rounds: Vec<u32> = rows.iter().map(|row| row.round).collect();
        assert_eq!(rounds, vec![0, 1, 2]);
        assert!(rows.iter().all(|row| row.dmg == 1800.0));
    }

    #[test]
    fn shared_stream_makes_the_aggregate_reproducible() {
        let a = aggregate(&mut battle("shatter"), 6, 50, &mut Rng::new(77)).expect("aggregate");
        let b = aggregate(&mut battle("shatter"), 6, 50, &mut Rng::new(77)).expect("aggregate");
        assert_eq!(a, b);
    }

    #[test]
    fn parallel_aggregate_is_reproducible_and_independent_of_workers() {
        let profile = SimulationProfile::for_kit("pyro");
        let build = || build_battle(&profile);
        let one = aggregate_parallel(build, 5, 300, 9, &WorkerPool::with_workers(1))
            .expect("parallel aggregate");
        let many = aggregate_parallel(build, 5, 300, 9, &WorkerPool::with_workers(4))
            .expect("parallel aggregate");
        assert_eq!(one, many);
        assert_eq!(one.trials, 300);
        assert!(one.min <= one.mean && one.mean <= one.max);
    }

    #[test]
    fn parallel_errors_propagate() {
        let mut profile = SimulationProfile::for_kit("basic");
        profile.stats.crit_rate = Some(3.0);
        let result = aggregate_parallel(
            || build_battle(&profile),
            2,
            10,
            1,
            &WorkerPool::default(),
        );
        assert!(matches!(result, Err(SimError::InvalidStat { .. })));
    }
}
