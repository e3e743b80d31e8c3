//! # Cubist
//!
//! An OLAP schema resolver that synthesizes MDX from dimensional selections.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          MemberCatalog (flat MDSCHEMA snapshot)          │
//! │   (dimension, hierarchy, unique_name, caption, ...)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [schema: level inference]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Hierarchy map (dimension → hierarchy → levels)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [resolve + session + estimate]
//! ┌─────────────────────────────────────────────────────────┐
//! │    Validated selection (measures, variables, axes,       │
//! │    filters) with a cardinality advisory                  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [mdx synthesizer]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 One MDX SELECT statement                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot itself is loaded by an external collaborator (see
//! [`catalog::CatalogLoader`]); executing the synthesized statement is the
//! concern of [`catalog::QueryExecutor`]. Everything in between is pure,
//! synchronous computation over the in-memory snapshot.

pub mod catalog;
pub mod config;
pub mod estimate;
pub mod mdx;
pub mod model;
pub mod resolve;
pub mod schema;
pub mod selection;
pub mod session;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::MemberCatalog;
    pub use crate::config::Settings;
    pub use crate::estimate::{CardinalityEstimate, CardinalityEstimator, CardinalityWarning};
    pub use crate::mdx::{MdxSynthesizer, QueryRequest, SynthesisError, ValidationError};
    pub use crate::model::{
        FilterSelection, Hierarchy, HierarchyKey, Level, LevelNameSource, Member,
        RowDimensionSelection, SchemaVariant,
    };
    pub use crate::resolve::{MemberFilterResolver, OrderingStrategy, ResolvedMember};
    pub use crate::schema::{
        GroupingClassifier, HierarchyCache, HierarchyCatalogBuilder, MarkerClassifier,
    };
    pub use crate::selection::{parse_ranges, ParseError, ParsePolicy};
    pub use crate::session::{BuilderSession, SessionError, SessionState};
}

// Also export the workhorse types at the crate root.
pub use catalog::MemberCatalog;
pub use mdx::{MdxSynthesizer, QueryRequest};
pub use model::{Hierarchy, HierarchyKey, Level, Member};
