//! Hierarchy and level recovery from flat member snapshots.
//!
//! Cube generations disagree about how much structure they publish: newer
//! catalogs carry an explicit level name per member, older ones expose only
//! the member unique names. This module recovers a consistent
//! dimension → hierarchy → level structure either way.

pub mod builder;
pub mod cache;
pub mod grouping;
pub mod inference;

pub use builder::HierarchyCatalogBuilder;
pub use cache::HierarchyCache;
pub use grouping::{GroupEntry, GroupingClassifier, MarkerClassifier, VariableEntry};
pub use inference::LevelInferenceEngine;
