//! Member snapshots and the external collaborator contracts.
//!
//! The core never talks to an analytical server. A [`CatalogLoader`] hands it
//! an immutable [`MemberCatalog`] snapshot (live query or cached file, the
//! core does not care), and the synthesized MDX string is handed back to a
//! [`QueryExecutor`] as an opaque value.

use serde::{Deserialize, Serialize};

use crate::model::{Member, SchemaVariant};

/// Errors surfaced by snapshot construction and the loader contract.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Catalog '{0}' is not available")]
    CatalogNotFound(String),

    #[error("Snapshot for catalog '{0}' contains no members")]
    EmptySnapshot(String),

    #[error("Snapshot row is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Failed to load snapshot: {0}")]
    LoadFailed(String),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// An immutable, in-memory snapshot of one catalog's member rowset.
///
/// The schema variant is decided exactly once here; downstream code matches
/// on it instead of probing optional columns ad hoc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCatalog {
    pub catalog_id: String,
    members: Vec<Member>,
    variant: SchemaVariant,
}

impl MemberCatalog {
    pub fn new(catalog_id: &str, members: Vec<Member>) -> Self {
        let variant = if members.iter().any(|m| m.level_name.is_some()) {
            SchemaVariant::ExplicitLevels
        } else {
            SchemaVariant::Legacy
        };
        Self {
            catalog_id: catalog_id.into(),
            members,
            variant,
        }
    }

    pub fn variant(&self) -> SchemaVariant {
        self.variant
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// All members of one `(dimension, hierarchy)` pair, in snapshot order.
    pub fn members_of(&self, dimension: &str, hierarchy: &str) -> Vec<&Member> {
        self.members
            .iter()
            .filter(|m| m.dimension == dimension && m.hierarchy == hierarchy)
            .collect()
    }
}

/// External collaborator that materializes member snapshots.
///
/// Pooling, retries and cache files all live behind this seam.
pub trait CatalogLoader {
    fn load_members(&self, catalog: &str) -> SnapshotResult<MemberCatalog>;
}

/// External collaborator that runs a synthesized MDX statement.
///
/// Execution-time failures surface here and are never reinterpreted by the
/// core.
pub trait QueryExecutor {
    type Output;
    type Error;

    fn execute(&self, catalog: &str, mdx: &str) -> Result<Self::Output, Self::Error>;
}
