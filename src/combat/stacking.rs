//! Composition of temporary stat modifiers on top of an actor's base stats.
//!
//! Every modifier lands in one of two buckets per stat: a percentage of the base value or
//! a flat amount. The effective value is `base * (1 + Σpercent) + Σflat`; the base value
//! itself is never written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Attack,
    CritRate,
    CritDamage,
    Speed,
    ElementalDamage,
    BreakEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackCategory {
    /// Scales the base value (`base * (1 + value)`).
    Percent,
    /// Added after scaling.
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub key: StatKey,
    pub category: StackCategory,
    pub value: f64,
}

impl StatModifier {
    pub fn percent(key: StatKey, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Percent,
            value,
        }
    }

    pub fn flat(key: StatKey, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Flat,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    pub percent: f64,
    pub flat: f64,
}

impl CategoryTotals {
    pub fn apply(&mut self, category: StackCategory, value: f64) {
        match category {
            StackCategory::Percent => self.percent += value,
            StackCategory::Flat => self.flat += value,
        }
    }

    pub fn compose(self, base: f64) -> f64 {
        base * (1.0 + self.percent) + self.flat
    }
}

/// Per-stat running totals of the modifiers active for one stat read.
#[derive(Debug, Clone, Default)]
pub struct ModifierStack {
    totals: BTreeMap<StatKey, CategoryTotals>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, modifier: StatModifier) {
        self.totals
            .entry(modifier.key)
            .or_default()
            .apply(modifier.category, modifier.value);
    }

    pub fn add_many<I>(&mut self, modifiers: I)
    where
        I: IntoIterator<Item = StatModifier>,
    {
        for modifier in modifiers {
            self.add(modifier);
        }
    }

    pub fn totals_for(&self, key: StatKey) -> CategoryTotals {
        self.totals.get(&key).copied().unwrap_or_default()
    }

    /// Effective value of `key` given its unmodified `base`.
    pub fn compose(&self, key: StatKey, base: f64) -> f64 {
        self.totals_for(key).compose(base)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_returns_base_unchanged() {
        let stack = ModifierStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.compose(StatKey::Attack, 2000.0), 2000.0);
    }

    #[test]
    fn percent_scales_before_flat_is_added() {
        let mut stack = ModifierStack::new();
        stack.add_many([
            StatModifier::percent(StatKey::Attack, 0.25),
            StatModifier::percent(StatKey::Attack, 0.25),
            StatModifier::flat(StatKey::Attack, 100.0),
        ]);
        assert_eq!(stack.compose(StatKey::Attack, 2000.0), 3100.0);
    }

    #[test]
    fn modifiers_only_touch_their_own_stat() {
        let mut stack = ModifierStack::new();
        stack.add(StatModifier::percent(StatKey::Speed, 0.5));
        assert_eq!(stack.compose(StatKey::Speed, 100.0), 150.0);
        assert_eq!(stack.compose(StatKey::Attack, 2000.0), 2000.0);
        assert_eq!(stack.totals_for(StatKey::CritRate), CategoryTotals::default());
    }
}
