//! Core types used throughout tagmigrate
//!
//! Column kinds as they appear in the generated migration, and the option
//! set (`null`, `limit`, `default`) attached to each column.

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// Conventional name of the implicit identity column.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Suffix dropped from reference column names (`OwnerId` → `Owner`).
pub const REFERENCE_SUFFIX: &str = "Id";

// ============================================================================
// ColumnKind
// ============================================================================

/// Semantic column type, rendered as the migration method name (`t.integer`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Boolean,
    Integer,
    String,
    Binary,
    Float,
    Timestamp,
    /// Foreign key to another table
    References,
}

impl ColumnKind {
    /// Migration DSL token for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Boolean => "boolean",
            ColumnKind::Integer => "integer",
            ColumnKind::String => "string",
            ColumnKind::Binary => "binary",
            ColumnKind::Float => "float",
            ColumnKind::Timestamp => "timestamp",
            ColumnKind::References => "references",
        }
    }

    /// Check if this kind is a foreign key reference
    pub fn is_reference(&self) -> bool {
        matches!(self, ColumnKind::References)
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ColumnOptions
// ============================================================================

/// Column options emitted after the column name.
///
/// Values are kept verbatim: `limit` and `default` come straight from the
/// struct tag and are not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOptions {
    /// `"true"` or `"false"`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub null: Option<String>,

    /// Byte width
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<String>,

    /// Literal default value
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<String>,
}

impl ColumnOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a `NOT NULL` column
    pub fn not_null() -> Self {
        Self::new().with_null(false)
    }

    /// Set the nullability flag
    pub fn with_null(mut self, nullable: bool) -> Self {
        self.null = Some(nullable.to_string());
        self
    }

    /// Set the byte width
    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Check whether no option is set
    pub fn is_empty(&self) -> bool {
        self.null.is_none() && self.limit.is_none() && self.default.is_none()
    }
}

// ============================================================================
// Naming
// ============================================================================

/// Convert a declaration name to `snake_case` (e.g. "HiddenPk" → "hidden_pk").
pub fn snake(name: &str) -> String {
    name.to_snake_case()
}

/// Drop a trailing `Id` from a reference name (e.g. "PiyoId" → "Piyo").
pub fn strip_reference_suffix(name: &str) -> &str {
    name.strip_suffix(REFERENCE_SUFFIX).unwrap_or(name)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_kind_tokens() {
        assert_eq!(ColumnKind::Integer.as_str(), "integer");
        assert_eq!(ColumnKind::References.to_string(), "references");
        assert!(ColumnKind::References.is_reference());
        assert!(!ColumnKind::String.is_reference());
    }

    #[test]
    fn test_options_builder() {
        let opts = ColumnOptions::not_null().with_limit("8");
        assert_eq!(opts.null.as_deref(), Some("false"));
        assert_eq!(opts.limit.as_deref(), Some("8"));
        assert!(opts.default.is_none());
        assert!(!opts.is_empty());
        assert!(ColumnOptions::new().is_empty());
    }

    #[test]
    fn test_nullable_with_default() {
        let opts = ColumnOptions::new().with_null(true).with_default("0");
        assert_eq!(opts.null.as_deref(), Some("true"));
        assert_eq!(opts.default.as_deref(), Some("0"));
        assert_eq!(opts.limit, None);
    }

    #[test]
    fn test_snake() {
        assert_eq!(snake("HiddenPk"), "hidden_pk");
        assert_eq!(snake("PiyoId"), "piyo_id");
        assert_eq!(snake("Fragments"), "fragments");
        assert_eq!(snake("Id"), "id");
    }

    #[test]
    fn test_strip_reference_suffix() {
        assert_eq!(strip_reference_suffix("PiyoId"), "Piyo");
        assert_eq!(strip_reference_suffix("Owner"), "Owner");
        assert_eq!(strip_reference_suffix("Id"), "");
    }
}
