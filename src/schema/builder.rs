// src/schema/builder.rs
//! Full-catalog hierarchy resolution.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::MemberCatalog;
use crate::mdx::escape::tail_segment;
use crate::model::{Hierarchy, HierarchyKey, Level, Member};
use crate::schema::grouping::GroupingClassifier;
use crate::schema::inference::LevelInferenceEngine;

/// Applies [`LevelInferenceEngine`] across every distinct
/// `(dimension, hierarchy)` pair of a snapshot.
///
/// Runs in a single pass over the rows plus one inference per pair; the
/// snapshot is never re-scanned per hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyCatalogBuilder {
    engine: LevelInferenceEngine,
}

impl HierarchyCatalogBuilder {
    pub fn new(sample_size: usize) -> Self {
        Self {
            engine: LevelInferenceEngine::new(sample_size),
        }
    }

    /// Build the schema map for a catalog.
    ///
    /// Pairs the classifier marks as pseudo-dimensions (measure- and
    /// variable-carrying) are not row-groupable and are skipped.
    pub fn build(
        &self,
        catalog: &MemberCatalog,
        classifier: &dyn GroupingClassifier,
    ) -> HashMap<HierarchyKey, Hierarchy> {
        let mut groups: HashMap<HierarchyKey, Vec<&Member>> = HashMap::new();
        let mut insertion_order: Vec<HierarchyKey> = Vec::new();

        for member in catalog.members() {
            if classifier.is_pseudo_dimension(&member.dimension) {
                continue;
            }
            let key = HierarchyKey::new(&member.dimension, &member.hierarchy);
            let bucket = groups.entry(key.clone()).or_insert_with(|| {
                insertion_order.push(key);
                Vec::new()
            });
            bucket.push(member);
        }

        let mut hierarchies = HashMap::with_capacity(groups.len());
        for key in insertion_order {
            let members = &groups[&key];
            let mut levels = self.engine.infer(members, &key.hierarchy);
            if levels.is_empty() && !members.is_empty() {
                // Flat hierarchy whose members sit at depth 0: address it
                // through a single level named after the hierarchy itself.
                levels.push(Level::recovered(&tail_segment(&key.hierarchy), 1));
            }
            hierarchies.insert(
                key.clone(),
                Hierarchy {
                    dimension: key.dimension,
                    hierarchy: key.hierarchy,
                    levels,
                },
            );
        }

        debug!(
            catalog = %catalog.catalog_id,
            hierarchies = hierarchies.len(),
            rows = catalog.len(),
            "resolved hierarchy schema"
        );
        hierarchies
    }
}
