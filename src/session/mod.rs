//! Interactive query-building state machine.
//!
//! Drives UI-led construction through fixed states:
//!
//! ```text
//! SelectMeasure → SelectGroup → SelectVariable → ConfigureAxes ⟲ → Finalized
//! ```
//!
//! The axes state is unreachable until at least one measure and one variable
//! are chosen; row dimensions are capped and deduplicated per hierarchy at
//! the moment of selection, so finalization can only fail on structural
//! validation the guards could not see.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::MemberCatalog;
use crate::config::Settings;
use crate::estimate::{CardinalityEstimate, CardinalityEstimator};
use crate::mdx::{ancestor_properties, MdxSynthesizer, QueryRequest, SynthesisError, ValidationError};
use crate::model::{
    FilterSelection, Hierarchy, HierarchyKey, MeasureSelection, RowDimensionSelection,
};
use crate::resolve::{MemberFilterResolver, ResolutionError, ResolvedMember};
use crate::schema::grouping::{self, GroupEntry, VariableEntry};
use crate::schema::{HierarchyCatalogBuilder, MarkerClassifier};
use crate::selection::{parse_ranges, sanitize_search, ParseError, ParsePolicy};

/// Errors raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("'{operation}' is not allowed in state {state:?}")]
    InvalidState {
        state: SessionState,
        operation: &'static str,
    },

    #[error("Row dimension cap of {0} reached; use a filter instead")]
    RowDimensionCapReached(usize),

    #[error("Selection index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Where the builder currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SelectMeasure,
    SelectGroup,
    SelectVariable,
    ConfigureAxes,
    Finalized,
}

/// The finished product: one MDX statement plus its advisory.
#[derive(Debug, Clone)]
pub struct FinalizedQuery {
    pub mdx: String,
    pub estimate: CardinalityEstimate,
}

/// Interactive builder over one catalog snapshot.
pub struct BuilderSession<'a> {
    catalog: &'a MemberCatalog,
    settings: Settings,
    classifier: MarkerClassifier,
    hierarchies: HashMap<HierarchyKey, Hierarchy>,
    state: SessionState,
    cube: String,
    measures: Vec<MeasureSelection>,
    groups: Vec<GroupEntry>,
    variables: Vec<MeasureSelection>,
    row_dimensions: Vec<RowDimensionSelection>,
    filters: Vec<FilterSelection>,
}

impl<'a> BuilderSession<'a> {
    pub fn new(catalog: &'a MemberCatalog, cube: &str, settings: Settings) -> Self {
        let classifier = MarkerClassifier::from_settings(&settings.classifier);
        let hierarchies =
            HierarchyCatalogBuilder::new(settings.level_sample_size).build(catalog, &classifier);
        Self {
            catalog,
            settings,
            classifier,
            hierarchies,
            state: SessionState::SelectMeasure,
            cube: cube.to_string(),
            measures: Vec::new(),
            groups: Vec::new(),
            variables: Vec::new(),
            row_dimensions: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Row-groupable hierarchies, sorted for stable listing.
    pub fn selectable_hierarchies(&self) -> Vec<&Hierarchy> {
        let mut keys: Vec<&HierarchyKey> = self.hierarchies.keys().collect();
        keys.sort();
        keys.into_iter().map(|k| &self.hierarchies[k]).collect()
    }

    pub fn hierarchy(&self, dimension: &str, hierarchy: &str) -> SessionResult<&Hierarchy> {
        self.hierarchies
            .get(&HierarchyKey::new(dimension, hierarchy))
            .ok_or_else(|| {
                ResolutionError::UnknownHierarchy {
                    catalog: self.catalog.catalog_id.clone(),
                    dimension: dimension.to_string(),
                    hierarchy: hierarchy.to_string(),
                }
                .into()
            })
    }

    // ------------------------------------------------------------------
    // SelectMeasure
    // ------------------------------------------------------------------

    pub fn select_measures(&mut self, measures: Vec<MeasureSelection>) -> SessionResult<()> {
        self.require_state(SessionState::SelectMeasure, "select_measures")?;
        if measures.is_empty() {
            return Err(ValidationError::NoMeasures.into());
        }
        self.measures = measures;
        self.state = SessionState::SelectGroup;
        Ok(())
    }

    // ------------------------------------------------------------------
    // SelectGroup
    // ------------------------------------------------------------------

    /// First-tier thematic groups available for selection.
    pub fn available_groups(&self) -> Vec<GroupEntry> {
        grouping::groups(self.catalog, &self.classifier)
    }

    pub fn select_groups(&mut self, groups: Vec<GroupEntry>) -> SessionResult<()> {
        self.require_state(SessionState::SelectGroup, "select_groups")?;
        self.groups = groups;
        self.state = SessionState::SelectVariable;
        Ok(())
    }

    /// Select groups by a 1-based range string against [`Self::available_groups`].
    ///
    /// The policy is part of this call site's contract; it is never implied.
    pub fn select_groups_from(&mut self, input: &str, policy: ParsePolicy) -> SessionResult<()> {
        self.require_state(SessionState::SelectGroup, "select_groups_from")?;
        let available = self.available_groups();
        let picked = pick(&available, input, policy)?;
        self.select_groups(picked)
    }

    // ------------------------------------------------------------------
    // SelectVariable
    // ------------------------------------------------------------------

    /// Variables of the selected groups; every variable when no group was
    /// chosen. Falls back to the groups themselves on hierarchies without a
    /// second tier.
    pub fn available_variables(&self) -> Vec<VariableEntry> {
        let variables = if self.groups.is_empty() {
            grouping::all_variables(self.catalog, &self.classifier)
        } else {
            grouping::variables_in_groups(self.catalog, &self.classifier, &self.groups)
        };
        if variables.is_empty() {
            debug!("no child variables found; offering the groups themselves");
            return self
                .groups
                .iter()
                .map(|g| VariableEntry {
                    caption: g.caption.clone(),
                    unique_name: g.unique_name.clone(),
                    group: g.caption.clone(),
                })
                .collect();
        }
        variables
    }

    /// Variables whose caption contains the sanitized search text,
    /// case-insensitively. Rejected search strings match nothing.
    pub fn search_variables(&self, text: &str) -> Vec<VariableEntry> {
        let Some(needle) = sanitize_search(text) else {
            return Vec::new();
        };
        let needle = needle.to_lowercase();
        self.available_variables()
            .into_iter()
            .filter(|v| v.caption.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select_variables(&mut self, variables: Vec<MeasureSelection>) -> SessionResult<()> {
        self.require_state(SessionState::SelectVariable, "select_variables")?;
        if variables.is_empty() {
            return Err(ValidationError::NoVariables.into());
        }
        self.variables = variables;
        self.state = SessionState::ConfigureAxes;
        Ok(())
    }

    /// Select variables by a 1-based range string against
    /// [`Self::available_variables`]. Policy declared by the caller.
    pub fn select_variables_from(&mut self, input: &str, policy: ParsePolicy) -> SessionResult<()> {
        self.require_state(SessionState::SelectVariable, "select_variables_from")?;
        let available = self.available_variables();
        let picked = pick(&available, input, policy)?;
        let selections = picked
            .into_iter()
            .map(|v| MeasureSelection::new(&v.caption, &v.unique_name))
            .collect();
        self.select_variables(selections)
    }

    // ------------------------------------------------------------------
    // ConfigureAxes
    // ------------------------------------------------------------------

    /// Add a grouping axis at the named level of a hierarchy.
    ///
    /// Rejected past the row-dimension cap and on a hierarchy already in use
    /// (MDX forbids crossjoining a hierarchy with itself).
    pub fn add_row_dimension(
        &mut self,
        dimension: &str,
        hierarchy: &str,
        level_name: &str,
    ) -> SessionResult<()> {
        self.require_state(SessionState::ConfigureAxes, "add_row_dimension")?;
        if self.row_dimensions.len() >= self.settings.row_dimension_cap {
            return Err(SessionError::RowDimensionCapReached(
                self.settings.row_dimension_cap,
            ));
        }
        let key = HierarchyKey::new(dimension, hierarchy);
        if self.row_dimensions.iter().any(|r| r.key() == key) {
            return Err(ValidationError::DuplicateHierarchy(key).into());
        }

        let resolved = self.hierarchy(dimension, hierarchy)?;
        let level = resolved
            .level_by_name(level_name)
            .ok_or_else(|| ResolutionError::UnknownLevel {
                hierarchy: hierarchy.to_string(),
                level: level_name.to_string(),
            })?
            .clone();

        let mut selection = RowDimensionSelection::new(dimension, hierarchy, level.clone());
        selection.single_level = resolved.levels.len() <= 1 && !level.explicit();
        selection.dimension_properties = ancestor_properties(resolved, &level);
        self.row_dimensions.push(selection);
        Ok(())
    }

    /// Ordered candidate members for building a filter on one level.
    pub fn members_for_filter(
        &self,
        dimension: &str,
        hierarchy: &str,
        level_name: &str,
    ) -> SessionResult<Vec<ResolvedMember>> {
        let resolved = self.hierarchy(dimension, hierarchy)?;
        let level = resolved
            .level_by_name(level_name)
            .ok_or_else(|| ResolutionError::UnknownLevel {
                hierarchy: hierarchy.to_string(),
                level: level_name.to_string(),
            })?;
        Ok(MemberFilterResolver::new(self.catalog).members_at_level(dimension, hierarchy, level))
    }

    /// Restrict a hierarchy to specific members. Unlimited, unlike axes.
    pub fn add_filter(
        &mut self,
        dimension: &str,
        hierarchy: &str,
        members: Vec<String>,
    ) -> SessionResult<()> {
        self.require_state(SessionState::ConfigureAxes, "add_filter")?;
        self.hierarchy(dimension, hierarchy)?;
        self.filters
            .push(FilterSelection::new(dimension, hierarchy, members));
        Ok(())
    }

    /// Current estimate for the chosen axes.
    pub fn estimate(&self) -> CardinalityEstimate {
        CardinalityEstimator::new(self.catalog, self.settings.cardinality_threshold)
            .estimate(&self.row_dimensions)
    }

    // ------------------------------------------------------------------
    // Finalize
    // ------------------------------------------------------------------

    /// Synthesize the MDX statement and close the session.
    pub fn finalize(&mut self) -> SessionResult<FinalizedQuery> {
        self.require_state(SessionState::ConfigureAxes, "finalize")?;

        let estimate = self.estimate();
        let request = QueryRequest {
            cube: self.cube.clone(),
            measures: self.measures.clone(),
            variables: self.variables.clone(),
            row_dimensions: self.row_dimensions.clone(),
            filters: self.filters.clone(),
        };
        let mdx = MdxSynthesizer::new().synthesize(&request)?;

        self.state = SessionState::Finalized;
        Ok(FinalizedQuery { mdx, estimate })
    }

    fn require_state(
        &self,
        expected: SessionState,
        operation: &'static str,
    ) -> SessionResult<()> {
        if self.state != expected {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation,
            });
        }
        Ok(())
    }
}

/// Resolve a 1-based range-selection string against a listing.
fn pick<T: Clone>(items: &[T], input: &str, policy: ParsePolicy) -> SessionResult<Vec<T>> {
    let indices = parse_ranges(input, policy)?;
    let mut picked = Vec::with_capacity(indices.len());
    for index in indices {
        match items.get(index - 1) {
            Some(item) => picked.push(item.clone()),
            None => match policy {
                ParsePolicy::Strict => return Err(SessionError::IndexOutOfRange(index)),
                ParsePolicy::Lenient => continue,
            },
        }
    }
    Ok(picked)
}
