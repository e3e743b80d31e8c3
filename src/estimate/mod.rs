//! Pre-execution cardinality estimation.
//!
//! The estimate is informational backpressure, never a hard limit: ad hoc
//! analytical queries legitimately can be large, so crossing the threshold
//! produces an advisory alongside the estimate, not an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::MemberCatalog;
use crate::model::RowDimensionSelection;
use crate::resolve::MemberFilterResolver;

/// Non-fatal advisory that a query will likely produce a large result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityWarning {
    pub estimated_rows: u64,
    pub threshold: u64,
}

impl std::fmt::Display for CardinalityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Large result set: ~{} rows estimated (threshold {})",
            self.estimated_rows, self.threshold
        )
    }
}

/// Estimated result-row count with its optional advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityEstimate {
    pub rows: u64,
    pub warning: Option<CardinalityWarning>,
}

/// Estimates result rows from the chosen row dimensions before execution.
#[derive(Debug, Clone, Copy)]
pub struct CardinalityEstimator<'a> {
    catalog: &'a MemberCatalog,
    threshold: u64,
}

impl<'a> CardinalityEstimator<'a> {
    pub fn new(catalog: &'a MemberCatalog, threshold: u64) -> Self {
        Self { catalog, threshold }
    }

    /// Product of per-dimension candidate counts, each floored at 1.
    ///
    /// Flooring keeps the estimate monotonic: adding a dimension never
    /// decreases it. When a level cannot be resolved against the snapshot the
    /// hierarchy's total member count stands in.
    pub fn estimate(&self, selections: &[RowDimensionSelection]) -> CardinalityEstimate {
        let resolver = MemberFilterResolver::new(self.catalog);

        let mut rows: u64 = 1;
        for selection in selections {
            let mut count = if selection.single_level {
                resolver.hierarchy_member_count(&selection.dimension, &selection.hierarchy)
            } else {
                resolver
                    .members_at_level(&selection.dimension, &selection.hierarchy, &selection.level)
                    .len()
            };
            if count == 0 {
                count =
                    resolver.hierarchy_member_count(&selection.dimension, &selection.hierarchy);
            }
            rows = rows.saturating_mul(count.max(1) as u64);
        }

        let warning = if !selections.is_empty() && rows > self.threshold {
            let w = CardinalityWarning {
                estimated_rows: rows,
                threshold: self.threshold,
            };
            warn!(estimated_rows = rows, threshold = self.threshold, "{w}");
            Some(w)
        } else {
            None
        };

        CardinalityEstimate { rows, warning }
    }
}
