//! Flat `(DMG, DMG_Type, round)` rows for tabular export, written and read with `csv`.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::{DamageType, SimulationRun};
use crate::error::SimResult;
use crate::sim::monte_carlo::DamageSummary;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRow {
    #[serde(rename = "DMG")]
    pub dmg: f64,
    #[serde(rename = "DMG_Type")]
    pub dmg_type: DamageType,
    pub round: u32,
}

pub fn rows_from_run(run: &SimulationRun) -> impl Iterator<Item = DamageRow> + '_ {
    run.damage_trace.records().iter().map(move |record| DamageRow {
        dmg: record.amount,
        dmg_type: record.kind,
        round: run.round_index,
    })
}

pub fn write_rows<W: io::Write>(rows: &[DamageRow], writer: W) -> SimResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_rows_to_path(rows: &[DamageRow], path: impl AsRef<Path>) -> SimResult<()> {
    let mut csv_writer = csv::Writer::from_path(path)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn read_rows<R: io::Read>(reader: R) -> SimResult<Vec<DamageRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Tab-separated one-line summary with a header, for `--table` output.
pub fn summary_table(kit: &str, cycles: u32, summary: &DamageSummary) -> String {
    format!(
        "kit\tcycles\ttrials\tmean\tmin\tmax\tstd_dev\n{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
        kit,
        cycles,
        summary.trials,
        summary.mean,
        summary.min,
        summary.max,
        summary.std_dev
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageTrace;

    fn run() -> SimulationRun {
        let mut trace = DamageTrace::new();
        trace.push(1800.0, DamageType::BasicAttack);
        trace.push(412.5, DamageType::DoT);
        SimulationRun {
            round_index: 4,
            damage_trace: trace,
            turns: vec![1],
        }
    }

    #[test]
    fn rows_carry_the_round_index() {
        let rows: Vec<_> = rows_from_run(&run()).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.round == 4));
        assert_eq!(rows[1].dmg_type, DamageType::DoT);
    }

    #[test]
    fn csv_uses_export_headers_and_labels() {
        let rows: Vec<_> = rows_from_run(&run()).collect();
        let mut buffer = Vec::new();
        write_rows(&rows, &mut buffer).expect("rows should be written");
        let text = String::from_utf8(buffer).expect("csv is utf-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("DMG,DMG_Type,round"));
        assert_eq!(lines.next(), Some("1800.0,Basic ATK,4"));

        let parsed = read_rows(text.as_bytes()).expect("rows should parse back");
        assert_eq!(parsed, rows);
    }
}
