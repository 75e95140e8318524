//! Repeated battles and what is done with their traces.

pub mod export;
pub mod monte_carlo;

pub use export::{
    read_rows, rows_from_run, summary_table, write_rows, write_rows_to_path, DamageRow,
};
pub use monte_carlo::{
    aggregate, aggregate_parallel, aggregate_profile, aggregate_rows, run_trials, DamageSummary,
    TRIALS_PER_BATCH,
};
