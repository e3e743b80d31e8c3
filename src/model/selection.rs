// src/model/selection.rs
use serde::{Deserialize, Serialize};

use crate::model::hierarchy::{HierarchyKey, Level};

/// A measure or variable placed on the COLUMNS axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureSelection {
    pub caption: String,
    pub unique_name: String,
}

impl MeasureSelection {
    pub fn new(caption: &str, unique_name: &str) -> Self {
        Self {
            caption: caption.into(),
            unique_name: unique_name.into(),
        }
    }
}

/// A user-chosen grouping axis: one hierarchy broken out at one level.
///
/// `dimension_properties` holds ancestor level paths that must stay
/// retrievable without being part of the grouping axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDimensionSelection {
    pub dimension: String,
    pub hierarchy: String,
    pub level: Level,
    #[serde(default)]
    pub dimension_properties: Vec<String>,
    /// True when this hierarchy exposes exactly one inferred level, in which
    /// case the axis addresses the hierarchy itself rather than a level.
    #[serde(default)]
    pub single_level: bool,
}

impl RowDimensionSelection {
    pub fn new(dimension: &str, hierarchy: &str, level: Level) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: hierarchy.into(),
            level,
            dimension_properties: Vec::new(),
            single_level: false,
        }
    }

    pub fn key(&self) -> HierarchyKey {
        HierarchyKey::new(&self.dimension, &self.hierarchy)
    }
}

/// A user-chosen restriction: specific members of one hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub dimension: String,
    pub hierarchy: String,
    /// Member unique names, already bracketed by the catalog.
    pub members: Vec<String>,
}

impl FilterSelection {
    pub fn new(dimension: &str, hierarchy: &str, members: Vec<String>) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: hierarchy.into(),
            members,
        }
    }

    pub fn key(&self) -> HierarchyKey {
        HierarchyKey::new(&self.dimension, &self.hierarchy)
    }
}
