//! Member resolution for selection and filtering.

pub mod members;
pub mod ordering;

pub use members::{MemberFilterResolver, ResolutionError, ResolutionResult, ResolvedMember};
pub use ordering::OrderingStrategy;
