//! Table definitions
//!
//! A `Table` is built once per entity struct. Columns are appended in field
//! declaration order; the renderers only ever read it.

use serde::{Deserialize, Serialize};
use tagmigrate_core::{DEFAULT_PRIMARY_KEY, snake};

use crate::Column;

/// One entity struct mapped to a database table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Go type name (e.g. `Fragments`)
    pub name: String,

    /// Columns in field declaration order
    pub columns: Vec<Column>,

    /// Primary key column name; empty when the table has none
    #[serde(default)]
    pub primary_key: String,

    /// Columns covered by the unique index, in declaration order
    #[serde(default)]
    pub unique_index_columns: Vec<String>,
}

impl Table {
    /// Create an empty table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Append a column
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Set the primary key
    pub fn set_primary_key(&mut self, name: impl Into<String>) {
        self.primary_key = name.into();
    }

    /// Append a column to the unique index, returning its position
    pub fn add_unique(&mut self, name: impl Into<String>) -> usize {
        self.unique_index_columns.push(name.into());
        self.unique_index_columns.len() - 1
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether a primary key was declared
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Whether the primary key is the conventional `id` column
    pub fn has_default_primary_key(&self) -> bool {
        snake(&self.primary_key) == DEFAULT_PRIMARY_KEY
    }

    /// Whether `column` is the primary key
    pub fn is_primary_key(&self, column: &Column) -> bool {
        self.has_primary_key() && column.name == self.primary_key
    }

    /// The single inline-unique column, when exactly one is declared
    pub fn single_unique(&self) -> Option<&str> {
        match self.unique_index_columns.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Whether the unique index spans two or more columns
    pub fn has_composite_unique(&self) -> bool {
        self.unique_index_columns.len() > 1
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns emitted in the migration (everything except the primary key)
    pub fn schema_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !self.is_primary_key(c))
    }

    /// `snake_case` table name
    pub fn snake_name(&self) -> String {
        snake(&self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
