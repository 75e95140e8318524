//! Run the battle benchmark and optionally append one line to a log file for trend tracking.
//!
//! Usage:
//!   cargo run --release --bin benchmark_simulator
//!   cargo run --release --bin benchmark_simulator -- --log
//!
//! --log  Append one row to benchmark_log.csv (date, battles_per_sec, battles_per_min, turns_per_sec, cycles_per_battle).

use std::fs::OpenOptions;
use std::io::Write;
use std::process;
use std::time::Instant;

use battlesim::combat::Rng;
use battlesim::config::SimulationProfile;
use battlesim::kits::build_battle;
use battlesim::SimResult;

// Run for at least this long or this many battles
const MIN_DURATION_MS: u128 = 2000;
const MIN_BATTLES: u32 = 500;

fn main() {
    if let Err(err) = run() {
        eprintln!("benchmark failed: {err}");
        process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let log = std::env::args().any(|a| a == "--log");

    let cycles_per_battle = 20u32;
    let mut battle = build_battle(&SimulationProfile::for_kit("conjurer"))?;
    let mut rng = Rng::new(7);

    let start = Instant::now();
    let mut battles: u32 = 0;
    let mut turns: u64 = 0;
    while start.elapsed().as_millis() < MIN_DURATION_MS || battles < MIN_BATTLES {
        let run = battle.run(battles, cycles_per_battle, &mut rng)?;
        turns += run.turns.iter().map(|&t| u64::from(t)).sum::<u64>();
        battles += 1;
    }
    let elapsed_secs = start.elapsed().as_secs_f64();

    let battles_per_sec = battles as f64 / elapsed_secs;
    let battles_per_min = battles_per_sec * 60.0;
    let turns_per_sec = turns as f64 / elapsed_secs;

    println!("Battle benchmark (conjurer, {} cycles/battle):", cycles_per_battle);
    println!("  Battles:     {}", battles);
    println!("  Duration:    {:.2} s", elapsed_secs);
    println!("  Battles/s:   {:.2}", battles_per_sec);
    println!("  Battles/min: {:.2}", battles_per_min);
    println!("  Turns/s:     {:.2}", turns_per_sec);

    if log {
        let date = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!(
            "{},{:.4},{:.4},{:.4},{}\n",
            date, battles_per_sec, battles_per_min, turns_per_sec, cycles_per_battle
        );
        let path = "benchmark_log.csv";
        if let Err(err) = append_log(path, &line) {
            eprintln!("could not append to {path}: {err}");
            process::exit(1);
        }
        println!("Appended to {}", path);
    }
    Ok(())
}

fn append_log(path: &str, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if file.metadata().map(|m| m.len() == 0).unwrap_or(true) {
        file.write_all(b"date,battles_per_sec,battles_per_min,turns_per_sec,cycles_per_battle\n")?;
    }
    file.write_all(line.as_bytes())?;
    file.flush()
}
