// src/mdx/query.rs
//! Assembly of the MDX `SELECT` statement.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mdx::escape::{bracket, tail_segment};
use crate::mdx::{SynthesisResult, ValidationError};
use crate::model::{
    FilterSelection, Hierarchy, Level, LevelNameSource, MeasureSelection, RowDimensionSelection,
};

/// A complete, validated query selection ready for synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Target cube. Bracket-escaped on output.
    pub cube: String,
    /// COLUMNS axis items.
    pub measures: Vec<MeasureSelection>,
    /// Base ROWS set: the selected statistical variables.
    pub variables: Vec<MeasureSelection>,
    /// Grouping axes, in the caller's insertion order.
    #[serde(default)]
    pub row_dimensions: Vec<RowDimensionSelection>,
    /// Member restrictions, folded into the ROWS crossjoin chain.
    #[serde(default)]
    pub filters: Vec<FilterSelection>,
}

/// Synthesizes one MDX `SELECT` statement from a [`QueryRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MdxSynthesizer;

impl MdxSynthesizer {
    pub fn new() -> Self {
        Self
    }

    /// Produce the statement, validating structure first.
    ///
    /// Output shape:
    /// ```text
    /// SELECT
    ///     {<columns-set>} ON COLUMNS,
    ///     NON EMPTY <rows-set>[ DIMENSION PROPERTIES <props>] ON ROWS
    /// FROM [<cube>]
    /// ```
    pub fn synthesize(&self, request: &QueryRequest) -> SynthesisResult<String> {
        self.validate(request)?;

        let columns = set_literal(request.measures.iter().map(|m| bracket(&m.unique_name)));

        // ROWS: base variable set, then one CROSSJOIN wrapper per axis in
        // insertion order, then the filter sets.
        let mut rows = set_literal(request.variables.iter().map(|v| bracket(&v.unique_name)));
        for axis in &request.row_dimensions {
            rows = format!("CROSSJOIN({}, {})", axis_path(axis), rows);
        }

        // Filters fold into the same chain instead of a WHERE slicer;
        // WHERE-clause support is unreliable across legacy cube generations.
        let used: HashSet<_> = request.row_dimensions.iter().map(|r| r.key()).collect();
        for filter in &request.filters {
            if filter.members.is_empty() {
                continue;
            }
            if used.contains(&filter.key()) {
                // Crossjoining a hierarchy with itself is invalid; the axis
                // already exposes every member of this hierarchy.
                debug!(hierarchy = %filter.key(), "skipping filter on a hierarchy already used as a row dimension");
                continue;
            }
            let member_set = set_literal(filter.members.iter().map(|m| bracket(m)));
            rows = format!("CROSSJOIN({member_set}, {rows})");
        }

        let properties: Vec<&str> = request
            .row_dimensions
            .iter()
            .flat_map(|r| r.dimension_properties.iter().map(String::as_str))
            .collect();
        let props_clause = if properties.is_empty() {
            String::new()
        } else {
            format!(" DIMENSION PROPERTIES {}", properties.join(", "))
        };

        Ok(format!(
            "SELECT\n    {columns} ON COLUMNS,\n    NON EMPTY {rows}{props_clause} ON ROWS\nFROM {cube}",
            cube = bracket(&request.cube),
        ))
    }

    fn validate(&self, request: &QueryRequest) -> Result<(), ValidationError> {
        if request.measures.is_empty() {
            return Err(ValidationError::NoMeasures);
        }
        if request.variables.is_empty() {
            return Err(ValidationError::NoVariables);
        }
        let mut seen = HashSet::new();
        for axis in &request.row_dimensions {
            let key = axis.key();
            if !seen.insert(key.clone()) {
                return Err(ValidationError::DuplicateHierarchy(key));
            }
        }
        Ok(())
    }
}

/// `{a, b, ...}`; works unchanged for a single element.
fn set_literal<I: Iterator<Item = String>>(items: I) -> String {
    format!("{{{}}}", items.collect::<Vec<_>>().join(", "))
}

/// The ROWS-axis member expression for one grouping selection.
///
/// The syntax depends on how much the catalog told us about the level:
/// an explicit schema level is addressed through its full path, a recovered
/// name through the hierarchy, a synthesized one positionally via
/// `.Levels(n)`, and a flat hierarchy directly.
fn axis_path(selection: &RowDimensionSelection) -> String {
    let hierarchy = bracket(&selection.hierarchy);
    if selection.single_level && !selection.level.explicit() {
        return format!("{hierarchy}.MEMBERS");
    }

    let level = &selection.level;
    match level.source {
        LevelNameSource::Schema | LevelNameSource::Recovered => {
            if degenerate_level_name(&level.name) {
                // Old cubes report "All"/"UNKNOWNMEMBER" captions as level
                // names; the hierarchy's own tail segment is the real level.
                let tail = tail_segment(&selection.hierarchy);
                return format!("{hierarchy}.{}.MEMBERS", bracket(&tail));
            }
            if level.source == LevelNameSource::Schema {
                format!(
                    "{}.{hierarchy}.{}.MEMBERS",
                    bracket(&selection.dimension),
                    bracket(&level.name)
                )
            } else {
                format!("{hierarchy}.{}.MEMBERS", bracket(&level.name))
            }
        }
        LevelNameSource::Synthesized => format!("{hierarchy}.Levels({}).MEMBERS", level.depth),
    }
}

fn degenerate_level_name(name: &str) -> bool {
    name == "All" || name == "(All)" || name.contains("UNKNOWNMEMBER")
}

/// Ancestor level paths to carry as DIMENSION PROPERTIES.
///
/// Emitted only for inferred levels with ancestors: grouping by such a level
/// drops the ancestor captions from the axis, so each ancestor with a
/// recovered name is listed to keep its caption retrievable. Synthesized
/// ancestor labels are placeholders and are not addressable.
pub fn ancestor_properties(hierarchy: &Hierarchy, level: &Level) -> Vec<String> {
    if level.explicit() {
        return Vec::new();
    }
    hierarchy
        .ancestors_of(level)
        .into_iter()
        .filter(|ancestor| ancestor.source == LevelNameSource::Recovered)
        .map(|ancestor| {
            format!(
                "{}.{}",
                bracket(&hierarchy.hierarchy),
                bracket(&ancestor.name)
            )
        })
        .collect()
}
