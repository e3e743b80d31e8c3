//! MDX statement synthesis.
//!
//! The sink of the whole pipeline: turns a validated selection of measures,
//! variables, row dimensions and filters into exactly one MDX `SELECT`
//! string. Synthesis is all-or-nothing: no partial or structurally invalid
//! statement is ever returned.

pub mod escape;
pub mod query;

pub use query::{ancestor_properties, MdxSynthesizer, QueryRequest};

use crate::model::HierarchyKey;
use crate::resolve::ResolutionError;

/// Structural problems caught before any query text is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No measures selected for COLUMNS")]
    NoMeasures,

    #[error("No variables selected for ROWS")]
    NoVariables,

    #[error("Hierarchy '{0}' appears more than once among row dimensions")]
    DuplicateHierarchy(HierarchyKey),
}

/// Any failure that short-circuits synthesis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

pub type SynthesisResult<T> = Result<T, SynthesisError>;
