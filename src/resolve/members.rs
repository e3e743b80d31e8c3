// src/resolve/members.rs
use serde::{Deserialize, Serialize};

use crate::catalog::MemberCatalog;
use crate::model::{Level, Member, SchemaVariant};
use crate::resolve::ordering::OrderingStrategy;

/// A requested hierarchy or level could not be matched against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("Hierarchy '{dimension}.{hierarchy}' is not present in catalog '{catalog}'")]
    UnknownHierarchy {
        catalog: String,
        dimension: String,
        hierarchy: String,
    },

    #[error("Level '{level}' is not a known level of hierarchy '{hierarchy}'")]
    UnknownLevel { hierarchy: String, level: String },
}

pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// One selectable member: what the user sees and what the query needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMember {
    pub caption: String,
    pub unique_name: String,
}

/// Returns the ordered, root-excluded candidate members of a resolved level.
#[derive(Debug, Clone, Copy)]
pub struct MemberFilterResolver<'a> {
    catalog: &'a MemberCatalog,
}

impl<'a> MemberFilterResolver<'a> {
    pub fn new(catalog: &'a MemberCatalog) -> Self {
        Self { catalog }
    }

    /// Candidate members of `level` within one hierarchy, ordered by the
    /// fixed strategy chain and with the "All" root excluded.
    pub fn members_at_level(
        &self,
        dimension: &str,
        hierarchy: &str,
        level: &Level,
    ) -> Vec<ResolvedMember> {
        let mut rows: Vec<&Member> = self
            .catalog
            .members_of(dimension, hierarchy)
            .into_iter()
            .filter(|m| !m.is_root())
            .filter(|m| self.matches_level(m, level))
            .collect();

        let strategy = OrderingStrategy::choose(&rows);
        strategy.sort(&mut rows);

        rows.into_iter()
            .map(|m| ResolvedMember {
                caption: m.caption.clone(),
                unique_name: m.unique_name.clone(),
            })
            .collect()
    }

    /// Non-root member count of a whole hierarchy, for estimates where a
    /// single level cannot be pinned down.
    pub fn hierarchy_member_count(&self, dimension: &str, hierarchy: &str) -> usize {
        self.catalog
            .members_of(dimension, hierarchy)
            .into_iter()
            .filter(|m| !m.is_root())
            .count()
    }

    fn matches_level(&self, member: &Member, level: &Level) -> bool {
        match self.catalog.variant() {
            SchemaVariant::ExplicitLevels => member.level_name.as_deref() == Some(&level.name),
            SchemaVariant::Legacy => member.depth() == level.depth,
        }
    }
}
