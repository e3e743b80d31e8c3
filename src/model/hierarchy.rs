// src/model/hierarchy.rs
use serde::{Deserialize, Serialize};

/// Map key for one navigable `(dimension, hierarchy)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HierarchyKey {
    pub dimension: String,
    pub hierarchy: String,
}

impl HierarchyKey {
    pub fn new(dimension: &str, hierarchy: &str) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: hierarchy.into(),
        }
    }
}

impl std::fmt::Display for HierarchyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dimension, self.hierarchy)
    }
}

/// Where a level's name came from.
///
/// `Schema` is the only source that counts as explicit metadata. `Recovered`
/// names were read out of unique-name path segments; `Synthesized` names are
/// generic placeholders for depths with no recoverable name. The MDX
/// synthesizer picks its level-path syntax based on this split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelNameSource {
    /// The snapshot provided the level name directly.
    Schema,
    /// Recovered from the unique-name segment preceding the first separator.
    Recovered,
    /// Generic `"Level {depth}"` placeholder.
    Synthesized,
}

/// A rank within a hierarchy. Depth is 1-based; the implicit "All" root sits
/// at depth 0 and is never represented as a `Level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub depth: usize,
    pub source: LevelNameSource,
}

impl Level {
    pub fn schema(name: &str, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            source: LevelNameSource::Schema,
        }
    }

    pub fn recovered(name: &str, depth: usize) -> Self {
        Self {
            name: name.into(),
            depth,
            source: LevelNameSource::Recovered,
        }
    }

    pub fn synthesized(depth: usize) -> Self {
        Self {
            name: format!("Level {depth}"),
            depth,
            source: LevelNameSource::Synthesized,
        }
    }

    /// True when the source provided the level name directly.
    pub fn explicit(&self) -> bool {
        self.source == LevelNameSource::Schema
    }
}

/// A navigable path within a dimension, with its ordered levels.
///
/// Invariant: `levels` is ascending by depth and depth equals the number of
/// level-separator tokens in a member's unique name at that level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub dimension: String,
    pub hierarchy: String,
    pub levels: Vec<Level>,
}

impl Hierarchy {
    pub fn key(&self) -> HierarchyKey {
        HierarchyKey::new(&self.dimension, &self.hierarchy)
    }

    pub fn level_by_name(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn level_at_depth(&self, depth: usize) -> Option<&Level> {
        self.levels.iter().find(|l| l.depth == depth)
    }

    /// Levels strictly above the given one (smaller depth), ascending.
    pub fn ancestors_of(&self, level: &Level) -> Vec<&Level> {
        self.levels.iter().filter(|l| l.depth < level.depth).collect()
    }
}
