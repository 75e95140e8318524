use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label attached to every damage instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[serde(rename = "Basic ATK")]
    BasicAttack,
    #[serde(rename = "Skill")]
    Skill,
    #[serde(rename = "Ultimate")]
    Ultimate,
    #[serde(rename = "Talent")]
    Talent,
    #[serde(rename = "Follow-up ATK")]
    FollowUp,
    #[serde(rename = "Summon ATK")]
    Summon,
    #[serde(rename = "DoT")]
    DoT,
    #[serde(rename = "Break DMG")]
    Break,
    #[serde(rename = "Super Break DMG")]
    SuperBreak,
}

impl DamageType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BasicAttack => "Basic ATK",
            Self::Skill => "Skill",
            Self::Ultimate => "Ultimate",
            Self::Talent => "Talent",
            Self::FollowUp => "Follow-up ATK",
            Self::Summon => "Summon ATK",
            Self::DoT => "DoT",
            Self::Break => "Break DMG",
            Self::SuperBreak => "Super Break DMG",
        }
    }
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRecord {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: DamageType,
}

/// Append-only damage log for one battle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageTrace {
    records: Vec<DamageRecord>,
}

impl DamageTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, amount: f64, kind: DamageType) {
        self.records.push(DamageRecord { amount, kind });
    }

    pub fn records(&self) -> &[DamageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.records.iter().map(|record| record.amount).sum()
    }

    pub fn total_by_type(&self) -> BTreeMap<DamageType, f64> {
        let mut totals = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.kind).or_insert(0.0) += record.amount;
        }
        totals
    }

    pub fn count_of(&self, kind: DamageType) -> usize {
        self.records.iter().filter(|record| record.kind == kind).count()
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

/// One Monte-Carlo trial: its index and the full damage trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub round_index: u32,
    pub damage_trace: DamageTrace,
    /// Turns taken per unit, in unit order.
    pub turns: Vec<u32>,
}

impl SimulationRun {
    pub fn total_damage(&self) -> f64 {
        self.damage_trace.total()
    }
}
