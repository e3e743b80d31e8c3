// src/schema/inference.rs
//! Level inference for one `(dimension, hierarchy)` pair.

use crate::mdx::escape::{strip_brackets, tail_segment};
use crate::model::{Level, Member, LEVEL_SEPARATOR};

/// Derives the ordered level list for one hierarchy from its member rows.
///
/// Two paths:
/// - explicit schema: members carry a level name; distinct non-root names in
///   appearance order become levels.
/// - inferred: depth is the separator count of a member unique name. The
///   `sample_size` longest unique names establish the hierarchy's max depth;
///   a human-readable name is recovered for depth 1 where the unique-name
///   structure exposes one, deeper levels get a generic label.
#[derive(Debug, Clone, Copy)]
pub struct LevelInferenceEngine {
    sample_size: usize,
}

impl LevelInferenceEngine {
    pub fn new(sample_size: usize) -> Self {
        Self { sample_size }
    }

    /// Infer the ordered levels of `hierarchy_name` from its members.
    ///
    /// An empty member set yields an empty level list, not an error; callers
    /// decide whether that is fatal.
    pub fn infer(&self, members: &[&Member], hierarchy_name: &str) -> Vec<Level> {
        if members.iter().any(|m| m.level_name.is_some()) {
            self.from_explicit_schema(members)
        } else {
            self.from_unique_names(members, hierarchy_name)
        }
    }

    /// Distinct non-root level names, in their natural appearance order.
    fn from_explicit_schema(&self, members: &[&Member]) -> Vec<Level> {
        let mut levels: Vec<Level> = Vec::new();
        for member in members {
            let Some(name) = member.level_name.as_deref() else {
                continue;
            };
            if name == "All" || name == "(All)" {
                continue;
            }
            if levels.iter().any(|l| l.name == name) {
                continue;
            }
            let depth = levels.len() + 1;
            levels.push(Level::schema(name, depth));
        }
        levels
    }

    /// Recover levels from unique-name structure alone.
    fn from_unique_names(&self, members: &[&Member], hierarchy_name: &str) -> Vec<Level> {
        let mut candidates: Vec<&str> = members
            .iter()
            .filter(|m| !m.is_root())
            .map(|m| m.unique_name.as_str())
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        // The deepest members carry the full level structure; sampling the
        // longest unique names is robust against sparse shallow rows.
        candidates.sort_by(|a, b| b.len().cmp(&a.len()));
        candidates.truncate(self.sample_size);

        let hierarchy_tail = tail_segment(hierarchy_name);
        let mut max_depth = 0usize;
        let mut first_level_name: Option<String> = None;

        for unique_name in &candidates {
            let depth = unique_name.matches(LEVEL_SEPARATOR).count();
            max_depth = max_depth.max(depth);

            if first_level_name.is_some() {
                continue;
            }
            // `[Dim].[Hier].[Entidad].&[9]...`: the segment right before the
            // first separator names the first level, unless it is just the
            // hierarchy repeating itself.
            let prefix = unique_name
                .split(LEVEL_SEPARATOR)
                .next()
                .unwrap_or(unique_name);
            if let Some((_, last)) = prefix.rsplit_once("].[") {
                let segment = strip_brackets(last);
                if segment != hierarchy_tail {
                    first_level_name = Some(segment);
                }
            }
        }

        (1..=max_depth)
            .map(|depth| match (depth, &first_level_name) {
                (1, Some(name)) => Level::recovered(name, 1),
                _ => Level::synthesized(depth),
            })
            .collect()
    }
}
