//! Scan results
//!
//! The scanner never fails on a single bad field. Problems are collected as
//! [`Diagnostic`]s next to the tables so the caller decides what is fatal.

use serde::{Deserialize, Serialize};
use tagmigrate_core::TagError;

use crate::Table;

/// A non-fatal problem found while scanning a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The field's Go type has no column mapping
    UnknownType {
        table: String,
        field: String,
        type_name: String,
    },

    /// The field's struct tag could not be parsed; the field was dropped
    MalformedAnnotation {
        table: String,
        field: String,
        message: String,
    },
}

impl Diagnostic {
    /// Table the diagnostic belongs to
    pub fn table(&self) -> &str {
        match self {
            Diagnostic::UnknownType { table, .. } | Diagnostic::MalformedAnnotation { table, .. } => {
                table
            }
        }
    }

    /// Field the diagnostic belongs to
    pub fn field(&self) -> &str {
        match self {
            Diagnostic::UnknownType { field, .. } | Diagnostic::MalformedAnnotation { field, .. } => {
                field
            }
        }
    }

    /// Convert into the matching error
    pub fn to_error(&self) -> TagError {
        match self {
            Diagnostic::UnknownType {
                table,
                field,
                type_name,
            } => TagError::unknown_type(table, field, type_name),
            Diagnostic::MalformedAnnotation {
                table,
                field,
                message,
            } => TagError::malformed(table, field, message),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_error())
    }
}

/// Tables and diagnostics accumulated over one or more source files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Tables in scan order
    pub tables: Vec<Table>,

    /// Diagnostics in scan order
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another report
    pub fn merge(&mut self, other: ScanReport) {
        self.tables.extend(other.tables);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Number of tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Check if there are any diagnostics
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Look up a table by Go type name
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

// ============================================================================
// Tests
// ============================================================================
