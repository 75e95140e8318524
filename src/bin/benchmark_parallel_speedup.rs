//! Run the Monte-Carlo aggregate once sequentially and once in parallel, then print timings
//! and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::process;
use std::time::Instant;

use battlesim::combat::Rng;
use battlesim::config::SimulationProfile;
use battlesim::kits::build_battle;
use battlesim::parallel::WorkerPool;
use battlesim::sim::{aggregate, aggregate_parallel};
use battlesim::SimResult;

fn main() {
    if let Err(err) = run() {
        eprintln!("benchmark failed: {err}");
        process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let profile = SimulationProfile::for_kit("pyro");
    let seed = 12345u64;
    let cycles = 10;
    let trials = 20_000;

    println!("Monte Carlo: {} trials x {} cycles (kit={})", trials, cycles, profile.kit);
    println!();

    // Sequential
    let t0 = Instant::now();
    let mut battle = build_battle(&profile)?;
    let seq = aggregate(&mut battle, cycles, trials, &mut Rng::new(seed))?;
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} trials/s)",
        seq_ms,
        trials as f64 / elapsed_seq.as_secs_f64()
    );

    // Parallel
    let t0 = Instant::now();
    let par = aggregate_parallel(
        || build_battle(&profile),
        cycles,
        trials,
        seed,
        &WorkerPool::default(),
    )?;
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} trials/s)",
        par_ms,
        trials as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    // Different RNG streams, so only the statistics should agree.
    let drift = (seq.mean - par.mean).abs() / seq.mean;
    println!(
        "Mean damage: sequential {:.1}, parallel {:.1} ({:.3}% apart)",
        seq.mean,
        par.mean,
        drift * 100.0
    );
    Ok(())
}
