use serde::Serialize;
use tracing::warn;

use crate::combat::SimulationRun;
use crate::config::{load_profile, SimulationProfile, DEFAULT_CYCLES, DEFAULT_TRIALS};
use crate::error::{SimError, SimResult};
use crate::kits::{build_battle, Kit};
use crate::rng_for_profile;
use crate::sim::{
    aggregate_profile, aggregate_rows, summary_table, write_rows_to_path, DamageSummary,
};

const USAGE: &str = "usage: battlesim <simulate|aggregate|profile|kits>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Simulate,
    Aggregate,
    Profile,
    Kits,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("simulate") => Some(Command::Simulate),
        Some("aggregate") => Some(Command::Aggregate),
        Some("profile") => Some(Command::Profile),
        Some("kits") => Some(Command::Kits),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Simulate) => handle_simulate(args),
        Some(Command::Aggregate) => handle_aggregate(args),
        Some(Command::Profile) => handle_profile(args),
        Some(Command::Kits) => handle_kits(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

#[derive(Debug, Serialize)]
struct SimulateReport<'a> {
    kit: &'a str,
    cycles: u32,
    total_damage: f64,
    run: &'a SimulationRun,
}

#[derive(Debug, Serialize)]
struct AggregateReport<'a> {
    kit: &'a str,
    cycles: u32,
    parallel: bool,
    summary: &'a DamageSummary,
}

fn handle_simulate(args: &[String]) -> i32 {
    let positional = positional_args(args);
    let Some(kit) = positional.first() else {
        eprintln!("usage: battlesim simulate <kit> [cycles] [seed] [--table]");
        return 2;
    };
    let mut profile = SimulationProfile::for_kit(kit);
    profile.cycles = parse_u32_arg(positional.get(1).copied(), "cycles", DEFAULT_CYCLES);
    profile.seed = parse_seed_arg(positional.get(2).copied());
    let as_table = has_flag(args, "--table");

    let run = match simulate_once(&profile) {
        Ok(run) => run,
        Err(err) => return report_error(&err),
    };

    if as_table {
        println!("kit\tcycles\ttotal_damage\thits\tturns");
        println!(
            "{}\t{}\t{:.6}\t{}\t{}",
            profile.kit,
            profile.cycles,
            run.total_damage(),
            run.damage_trace.len(),
            run.turns.iter().sum::<u32>()
        );
        return 0;
    }

    print_json(&SimulateReport {
        kit: &profile.kit,
        cycles: profile.cycles,
        total_damage: run.total_damage(),
        run: &run,
    })
}

fn simulate_once(profile: &SimulationProfile) -> SimResult<SimulationRun> {
    let mut battle = build_battle(profile)?;
    let mut rng = rng_for_profile(profile)?;
    battle.run(0, profile.cycles, &mut rng)
}

fn handle_aggregate(args: &[String]) -> i32 {
    let csv_path = match flag_value(args, "--csv") {
        Ok(path) => path,
        Err(()) => {
            eprintln!("usage: battlesim aggregate <kit> ... --csv <path>");
            return 2;
        }
    };
    let positional = positional_args(args);
    let Some(kit) = positional.first() else {
        eprintln!(
            "usage: battlesim aggregate <kit> [cycles] [trials] [seed] [--parallel] [--csv PATH]"
        );
        return 2;
    };
    let mut profile = SimulationProfile::for_kit(kit);
    profile.cycles = parse_u32_arg(positional.get(1).copied(), "cycles", DEFAULT_CYCLES);
    profile.trials = parse_u32_arg(positional.get(2).copied(), "trials", DEFAULT_TRIALS);
    profile.seed = parse_seed_arg(positional.get(3).copied());
    profile.parallel = has_flag(args, "--parallel");

    if let Some(path) = csv_path {
        return match export_rows(&profile, path) {
            Ok(count) => {
                println!("export complete: rows={count}, path='{path}'");
                0
            }
            Err(err) => report_error(&err),
        };
    }

    match aggregate_profile(&profile) {
        Ok(summary) => {
            if has_flag(args, "--table") {
                println!("{}", summary_table(&profile.kit, profile.cycles, &summary));
                0
            } else {
                print_json(&AggregateReport {
                    kit: &profile.kit,
                    cycles: profile.cycles,
                    parallel: profile.parallel,
                    summary: &summary,
                })
            }
        }
        Err(err) => report_error(&err),
    }
}

fn export_rows(profile: &SimulationProfile, path: &str) -> SimResult<usize> {
    if profile.parallel {
        warn!("row export always runs sequentially; ignoring --parallel");
    }
    let mut battle = build_battle(profile)?;
    let mut rng = rng_for_profile(profile)?;
    let rows = aggregate_rows(&mut battle, profile.cycles, profile.trials, &mut rng)?;
    write_rows_to_path(&rows, path)?;
    Ok(rows.len())
}

fn handle_profile(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: battlesim profile <path-to-profile.{{json,yaml}}>");
        return 2;
    };

    let profile = match load_profile(path) {
        Ok(profile) => profile,
        Err(err) => return report_error(&err),
    };
    match aggregate_profile(&profile) {
        Ok(summary) => print_json(&AggregateReport {
            kit: &profile.kit,
            cycles: profile.cycles,
            parallel: profile.parallel,
            summary: &summary,
        }),
        Err(err) => report_error(&err),
    }
}

fn handle_kits() -> i32 {
    for kit in Kit::ALL {
        println!("{}\t{}", kit.name(), kit.summary());
    }
    0
}

fn print_json<T: Serialize>(payload: &T) -> i32 {
    match serde_json::to_string_pretty(payload) {
        Ok(text) => {
            println!("{text}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

/// Unknown kits are a usage problem; everything else is a runtime failure.
fn report_error(err: &SimError) -> i32 {
    eprintln!("error: {err}");
    match err {
        SimError::UnknownKit(_) => 2,
        _ => 1,
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().skip(2).any(|arg| arg == flag)
}

/// `Ok(None)` when the flag is absent, `Err` when it is present without a value.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>, ()> {
    match args.iter().skip(2).position(|arg| arg == flag) {
        None => Ok(None),
        Some(index) => match args.get(index + 3) {
            Some(value) if !value.starts_with("--") => Ok(Some(value.as_str())),
            _ => Err(()),
        },
    }
}

/// Arguments after the command that are neither flags nor the value of `--csv`.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut positional = Vec::new();
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        if arg == "--csv" {
            rest.next();
        } else if !arg.starts_with("--") {
            positional.push(arg.as_str());
        }
    }
    positional
}

fn parse_u32_arg(raw: Option<&str>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                warn!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}

/// A missing or unparsable seed falls back to OS entropy.
fn parse_seed_arg(raw: Option<&str>) -> Option<u64> {
    let value = raw?;
    match value.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            warn!("invalid seed '{value}', seeding from entropy");
            None
        }
    }
}
