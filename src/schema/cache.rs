// src/schema/cache.rs
//! Explicit per-hierarchy schema cache.
//!
//! Derived hierarchy structures are pure functions of a snapshot, so they can
//! be memoized per `(catalog, dimension, hierarchy)` key. The cache is an
//! owned object with an explicit invalidation hook tied to snapshot reload,
//! never process-global mutable state.
//!
//! # Key Format
//!
//! ```text
//! (catalog_id, dimension, hierarchy) -> Hierarchy
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::MemberCatalog;
use crate::model::Hierarchy;
use crate::schema::inference::LevelInferenceEngine;

type CacheKey = (String, String, String);

/// Memoizes inferred hierarchy structures across catalogs.
#[derive(Debug, Default)]
pub struct HierarchyCache {
    entries: HashMap<CacheKey, Arc<Hierarchy>>,
}

impl HierarchyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inferred structure for one pair, computed at most once per key.
    pub fn get_or_build(
        &mut self,
        catalog: &MemberCatalog,
        dimension: &str,
        hierarchy: &str,
        sample_size: usize,
    ) -> Arc<Hierarchy> {
        let key = (
            catalog.catalog_id.clone(),
            dimension.to_string(),
            hierarchy.to_string(),
        );
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit);
        }

        let members = catalog.members_of(dimension, hierarchy);
        let levels = LevelInferenceEngine::new(sample_size).infer(&members, hierarchy);
        let built = Arc::new(Hierarchy {
            dimension: dimension.to_string(),
            hierarchy: hierarchy.to_string(),
            levels,
        });
        self.entries.insert(key, Arc::clone(&built));
        built
    }

    /// Peek without building.
    pub fn get(&self, catalog_id: &str, dimension: &str, hierarchy: &str) -> Option<Arc<Hierarchy>> {
        let key = (
            catalog_id.to_string(),
            dimension.to_string(),
            hierarchy.to_string(),
        );
        self.entries.get(&key).map(Arc::clone)
    }

    /// Drop every entry derived from one catalog. Call on snapshot reload.
    pub fn invalidate_catalog(&mut self, catalog_id: &str) {
        self.entries.retain(|(cat, _, _), _| cat != catalog_id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
