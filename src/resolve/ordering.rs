// src/resolve/ordering.rs
//! Deterministic member-ordering strategies.
//!
//! Which fields a snapshot carries varies per cube generation, so the sort
//! key is chosen once from an ordered list of strategies and then applied,
//! never discovered through fallible sorting attempts.

use std::cmp::Ordering;

use crate::model::Member;

/// Ordering strategies, in fixed priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// Explicit member ordinal, ascending.
    Ordinal,
    /// Generic ordinal column, ascending.
    GenericOrdinal,
    /// Member key parsed as a number (so `2` sorts before `10`).
    NumericKey,
    /// Member key compared as a string.
    StringKey,
    /// Caption, alphabetically. Final fallback; always applicable.
    Caption,
}

impl OrderingStrategy {
    /// Pick the highest-priority strategy the rows support.
    pub fn choose(members: &[&Member]) -> Self {
        if members.iter().any(|m| m.ordinal.is_some()) {
            return Self::Ordinal;
        }
        if members.iter().any(|m| m.generic_ordinal.is_some()) {
            return Self::GenericOrdinal;
        }
        let keys: Vec<&str> = members.iter().filter_map(|m| m.key.as_deref()).collect();
        if !keys.is_empty() && keys.len() == members.len() {
            if keys.iter().all(|k| k.trim().parse::<f64>().is_ok()) {
                return Self::NumericKey;
            }
            return Self::StringKey;
        }
        Self::Caption
    }

    /// Sort members under this strategy.
    ///
    /// The unique name is always the final tiebreak, so the result is
    /// invariant under input shuffling.
    pub fn sort(self, members: &mut [&Member]) {
        members.sort_by(|a, b| self.compare(a, b).then_with(|| a.unique_name.cmp(&b.unique_name)));
    }

    fn compare(self, a: &Member, b: &Member) -> Ordering {
        match self {
            Self::Ordinal => opt_cmp(a.ordinal, b.ordinal),
            Self::GenericOrdinal => opt_cmp(a.generic_ordinal, b.generic_ordinal),
            Self::NumericKey => {
                let na = numeric_key(a);
                let nb = numeric_key(b);
                match (na, nb) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
            Self::StringKey => a.key.cmp(&b.key),
            Self::Caption => a.caption.cmp(&b.caption),
        }
    }
}

fn opt_cmp(a: Option<i64>, b: Option<i64>) -> Ordering {
    // Rows missing the column sort last.
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn numeric_key(m: &Member) -> Option<f64> {
    m.key.as_deref().and_then(|k| k.trim().parse::<f64>().ok())
}
