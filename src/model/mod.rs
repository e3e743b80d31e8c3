//! Core OLAP schema types shared across the crate.

pub mod hierarchy;
pub mod member;
pub mod selection;

pub use hierarchy::{Hierarchy, HierarchyKey, Level, LevelNameSource};
pub use member::{member_depth, Member, SchemaVariant, LEVEL_SEPARATOR, ROOT_CAPTION};
pub use selection::{FilterSelection, MeasureSelection, RowDimensionSelection};
