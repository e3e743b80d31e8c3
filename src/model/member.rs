// src/model/member.rs
use serde::{Deserialize, Serialize};

/// The token that separates key segments in a member unique name.
///
/// `[Dim].[Hier].[Entity]` has depth 0, `[Dim].[Hier].[Entity].&[12]` depth 1,
/// `[Dim].[Hier].[Entity].&[12].&[3]` depth 2. The count of this token is the
/// most reliable depth signal on cubes that do not publish level names.
pub const LEVEL_SEPARATOR: &str = ".&[";

/// Caption of the implicit hierarchy root. Never a selectable member.
pub const ROOT_CAPTION: &str = "All";

/// One flat row of the MDSCHEMA_MEMBERS snapshot.
///
/// Required fields are always present; the optional ones differ per cube
/// generation (older catalogs omit `level_name` and the ordinal columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub dimension: String,
    pub hierarchy: String,
    /// Globally unique within a catalog.
    pub unique_name: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_ordinal: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_unique_name: Option<String>,
}

impl Member {
    /// Minimal constructor for the required field contract.
    pub fn new(dimension: &str, hierarchy: &str, unique_name: &str, caption: &str) -> Self {
        Self {
            dimension: dimension.into(),
            hierarchy: hierarchy.into(),
            unique_name: unique_name.into(),
            caption: caption.into(),
            level_name: None,
            ordinal: None,
            generic_ordinal: None,
            key: None,
            parent_unique_name: None,
        }
    }

    pub fn with_level_name(mut self, level_name: &str) -> Self {
        self.level_name = Some(level_name.into());
        self
    }

    pub fn with_ordinal(mut self, ordinal: i64) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    pub fn with_generic_ordinal(mut self, ordinal: i64) -> Self {
        self.generic_ordinal = Some(ordinal);
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_parent(mut self, parent_unique_name: &str) -> Self {
        self.parent_unique_name = Some(parent_unique_name.into());
        self
    }

    /// Separator-derived depth of this member's unique name.
    pub fn depth(&self) -> usize {
        member_depth(&self.unique_name)
    }

    /// Is this the implicit hierarchy root?
    pub fn is_root(&self) -> bool {
        self.caption == ROOT_CAPTION
    }
}

/// Depth of a unique name: the number of level-separator occurrences.
pub fn member_depth(unique_name: &str) -> usize {
    unique_name.matches(LEVEL_SEPARATOR).count()
}

/// Capability descriptor for a member snapshot, decided once at load time.
///
/// Spares the resolvers from re-probing optional columns on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaVariant {
    /// The snapshot carries an explicit level name per member.
    ExplicitLevels,
    /// Older cube generations: levels must be inferred from unique names.
    Legacy,
}
