// src/schema/grouping.rs
//! Pluggable classification of pseudo-dimensions and the domain-specific
//! two-tier grouping.
//!
//! The health-statistics cubes carry their statistical variables inside a
//! dedicated dimension, split into a first tier of thematic groups and a
//! second tier of variables. Detecting that dimension is inherently
//! dataset-specific, so it lives behind a trait and the generic resolver
//! stays dataset-agnostic.

use serde::{Deserialize, Serialize};

use crate::catalog::MemberCatalog;
use crate::config::ClassifierSettings;
use crate::model::{Member, SchemaVariant};

/// Classifies dimensions/hierarchies of a catalog.
///
/// `is_pseudo_dimension` drives which pairs the hierarchy builder treats as
/// row-groupable; the rest describes the two-tier grouping dimension.
pub trait GroupingClassifier {
    /// Does this dimension carry measures rather than members?
    fn is_measure_dimension(&self, dimension: &str) -> bool;

    /// Does this dimension carry the statistical variables?
    fn is_variable_dimension(&self, dimension: &str) -> bool;

    /// Does this hierarchy carry the two-tier group/variable split?
    fn is_group_hierarchy(&self, hierarchy: &str) -> bool;

    /// Explicit level name of the first grouping tier.
    fn group_level_name(&self) -> &str;

    /// Explicit level name of the second tier.
    fn variable_level_name(&self) -> &str;

    /// Pairs excluded from row-groupable hierarchy resolution.
    fn is_pseudo_dimension(&self, dimension: &str) -> bool {
        self.is_measure_dimension(dimension) || self.is_variable_dimension(dimension)
    }
}

/// Substring-marker classifier with configurable markers.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    variable_marker: String,
    group_marker: String,
    measure_marker: String,
    group_level: String,
    variable_level: String,
}

impl MarkerClassifier {
    pub fn from_settings(settings: &ClassifierSettings) -> Self {
        Self {
            variable_marker: settings.variable_marker.to_uppercase(),
            group_marker: settings.group_marker.to_uppercase(),
            measure_marker: settings.measure_marker.to_uppercase(),
            group_level: "Apartado".to_string(),
            variable_level: "Variable".to_string(),
        }
    }
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::from_settings(&ClassifierSettings::default())
    }
}

impl GroupingClassifier for MarkerClassifier {
    fn is_measure_dimension(&self, dimension: &str) -> bool {
        dimension.to_uppercase().contains(&self.measure_marker)
    }

    fn is_variable_dimension(&self, dimension: &str) -> bool {
        dimension.to_uppercase().contains(&self.variable_marker)
    }

    fn is_group_hierarchy(&self, hierarchy: &str) -> bool {
        hierarchy.to_uppercase().contains(&self.group_marker)
    }

    fn group_level_name(&self) -> &str {
        &self.group_level
    }

    fn variable_level_name(&self) -> &str {
        &self.variable_level
    }

    fn is_pseudo_dimension(&self, dimension: &str) -> bool {
        // Some catalogs expose a degenerate dimension literally named
        // "DIMENSION"; it is never row-groupable either.
        self.is_measure_dimension(dimension)
            || self.is_variable_dimension(dimension)
            || dimension.eq_ignore_ascii_case("DIMENSION")
    }
}

/// One first-tier thematic group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub caption: String,
    pub unique_name: String,
    pub dimension: String,
    pub hierarchy: String,
}

/// One second-tier statistical variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableEntry {
    pub caption: String,
    pub unique_name: String,
    /// Caption of the group this variable belongs to.
    pub group: String,
}

fn variable_rows<'a>(
    catalog: &'a MemberCatalog,
    classifier: &dyn GroupingClassifier,
) -> Vec<&'a Member> {
    let both: Vec<&Member> = catalog
        .members()
        .iter()
        .filter(|m| {
            classifier.is_variable_dimension(&m.dimension)
                && classifier.is_group_hierarchy(&m.hierarchy)
        })
        .collect();
    if !both.is_empty() {
        return both;
    }
    // Older catalogs rename the dimension; fall back to the hierarchy marker.
    catalog
        .members()
        .iter()
        .filter(|m| classifier.is_group_hierarchy(&m.hierarchy))
        .collect()
}

/// First-tier groups of the variable dimension, sorted by caption.
pub fn groups(catalog: &MemberCatalog, classifier: &dyn GroupingClassifier) -> Vec<GroupEntry> {
    let rows = variable_rows(catalog, classifier);
    if rows.is_empty() {
        return Vec::new();
    }

    let mut tier: Vec<&Member> = match catalog.variant() {
        SchemaVariant::ExplicitLevels => rows
            .iter()
            .copied()
            .filter(|m| m.level_name.as_deref() == Some(classifier.group_level_name()))
            .collect(),
        SchemaVariant::Legacy => rows.iter().copied().filter(|m| m.depth() == 1).collect(),
    };

    if tier.is_empty() {
        // Last resort: every distinct member of the hierarchy.
        let mut seen = std::collections::HashSet::new();
        tier = rows
            .iter()
            .copied()
            .filter(|m| seen.insert(m.unique_name.as_str()))
            .collect();
    }

    tier.sort_by(|a, b| {
        a.caption
            .cmp(&b.caption)
            .then_with(|| a.unique_name.cmp(&b.unique_name))
    });
    tier.iter()
        .map(|m| GroupEntry {
            caption: m.caption.clone(),
            unique_name: m.unique_name.clone(),
            dimension: m.dimension.clone(),
            hierarchy: m.hierarchy.clone(),
        })
        .collect()
}

/// Second-tier variables belonging to the given groups, in group order.
///
/// Children are matched by `parent_unique_name` when the snapshot carries it,
/// else by unique-name prefix.
pub fn variables_in_groups(
    catalog: &MemberCatalog,
    classifier: &dyn GroupingClassifier,
    selected: &[GroupEntry],
) -> Vec<VariableEntry> {
    let rows = variable_rows(catalog, classifier);
    let has_parent_info = rows.iter().any(|m| m.parent_unique_name.is_some());

    let mut variables = Vec::new();
    for group in selected {
        let children = rows.iter().copied().filter(|m| {
            if has_parent_info {
                m.parent_unique_name.as_deref() == Some(group.unique_name.as_str())
            } else {
                m.unique_name.starts_with(&group.unique_name) && m.unique_name != group.unique_name
            }
        });
        for child in children {
            variables.push(VariableEntry {
                caption: child.caption.clone(),
                unique_name: child.unique_name.clone(),
                group: group.caption.clone(),
            });
        }
    }
    variables
}

/// Every second-tier variable of the catalog, regardless of group.
pub fn all_variables(
    catalog: &MemberCatalog,
    classifier: &dyn GroupingClassifier,
) -> Vec<VariableEntry> {
    let rows = variable_rows(catalog, classifier);
    rows.iter()
        .filter(|m| match catalog.variant() {
            SchemaVariant::ExplicitLevels => {
                m.level_name.as_deref() == Some(classifier.variable_level_name())
            }
            SchemaVariant::Legacy => m.depth() >= 2,
        })
        .map(|m| VariableEntry {
            caption: m.caption.clone(),
            unique_name: m.unique_name.clone(),
            group: String::new(),
        })
        .collect()
}
