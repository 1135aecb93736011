//! Column definitions
//!
//! A `Column` is produced for every exported, non-skipped field of an
//! entity struct.

use serde::{Deserialize, Serialize};
use tagmigrate_core::{ColumnKind, ColumnOptions, strip_reference_suffix};

/// A single table column (maps to one struct field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name in declaration form (e.g. `HiddenPk`), after renames
    pub name: String,

    /// Mapped column kind; `None` when the Go type has no mapping
    pub kind: Option<ColumnKind>,

    /// Column options (`null`, `limit`, `default`)
    #[serde(skip_serializing_if = "ColumnOptions::is_empty", default)]
    pub options: ColumnOptions,

    /// Go type expression as written in the source
    pub source_type: String,

    /// Association name for `references` columns
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reference: Option<String>,
}

impl Column {
    /// Create a column with a mapped kind
    pub fn new(name: impl Into<String>, kind: ColumnKind, options: ColumnOptions) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
            options,
            source_type: String::new(),
            reference: None,
        }
    }

    /// Create a column whose Go type could not be mapped
    pub fn unmapped(name: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            options: ColumnOptions::default(),
            source_type: source_type.into(),
            reference: None,
        }
    }

    /// Record the Go type expression
    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    /// Turn this column into a foreign key reference.
    ///
    /// An empty target derives the association from the current name
    /// (`PiyoId` → `Piyo`); otherwise the column is renamed to the target.
    pub fn make_reference(&mut self, target: &str) {
        self.kind = Some(ColumnKind::References);
        self.options.null = None;
        if target.is_empty() {
            self.reference = Some(strip_reference_suffix(&self.name).to_string());
        } else {
            self.name = target.to_string();
            self.reference = Some(target.to_string());
        }
    }

    /// Check whether the Go type was mapped
    pub fn is_mapped(&self) -> bool {
        self.kind.is_some()
    }

    /// Check whether this column is a foreign key reference
    pub fn is_reference(&self) -> bool {
        self.kind.is_some_and(|k| k.is_reference())
    }

    /// Name used in the migration: the association (with any trailing `Id`
    /// dropped) for references, the column name otherwise.
    pub fn schema_name(&self) -> &str {
        if self.is_reference() {
            let base = self.reference.as_deref().unwrap_or(&self.name);
            strip_reference_suffix(base)
        } else {
            &self.name
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_column() {
        let col = Column::new("Size", ColumnKind::Integer, ColumnOptions::not_null().with_limit("4"))
            .with_source_type("int32");
        assert!(col.is_mapped());
        assert!(!col.is_reference());
        assert_eq!(col.schema_name(), "Size");
        assert_eq!(col.source_type, "int32");
    }

    #[test]
    fn test_unmapped_column() {
        let col = Column::unmapped("Tags", "[]string");
        assert!(!col.is_mapped());
        assert!(col.options.is_empty());
    }

    #[test]
    fn test_reference_derived_from_name() {
        let mut col = Column::new("PiyoId", ColumnKind::Integer, ColumnOptions::not_null().with_limit("8"));
        col.make_reference("");
        assert!(col.is_reference());
        assert_eq!(col.name, "PiyoId");
        assert_eq!(col.reference.as_deref(), Some("Piyo"));
        assert_eq!(col.schema_name(), "Piyo");
        assert!(col.options.null.is_none());
        assert_eq!(col.options.limit.as_deref(), Some("8"));
    }

    #[test]
    fn test_reference_with_explicit_target() {
        let mut col = Column::new("Author", ColumnKind::Integer, ColumnOptions::not_null());
        col.make_reference("WriterId");
        assert_eq!(col.name, "WriterId");
        assert_eq!(col.schema_name(), "Writer");
    }

    #[test]
    fn test_reference_on_unmapped_type() {
        let mut col = Column::unmapped("OwnerId", "*User");
        col.make_reference("");
        assert!(col.is_mapped());
        assert_eq!(col.schema_name(), "Owner");
    }
}
