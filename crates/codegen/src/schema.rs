//! # Migration Rendering
//!
//! Renders tables in ActiveRecord migration syntax:
//!
//! ```text
//! create_table 'fragments', primary_key:'hidden_pk' do |t|
//!   t.integer :id, null:false, limit:8
//!   t.references :piyo, limit:8
//! end
//! add_index :fragments, [:id, :version, :addr], unique:true
//! ```
//!
//! ## Rules
//!
//! - No primary key → `id:false`; a primary key other than `id` →
//!   `primary_key:'<name>'`. The primary key column itself is not listed.
//! - Options follow in a fixed order: `unique`, `null`, `default`, `limit`.
//! - A single unique column is flagged inline; two or more produce one
//!   composite `add_index` and no inline flags.
//! - Every identifier is `snake_case`.
//! - A column whose Go type has no mapping is left out with a warning, or
//!   fails the whole script under [`UnknownTypePolicy::Error`].

use tagmigrate_core::{TagError, TagResult, snake};
use tagmigrate_ir::{Column, Table};

/// What to do with a column whose Go type has no mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownTypePolicy {
    /// Leave the column out of the migration
    #[default]
    Skip,
    /// Fail with [`TagError::UnknownType`]
    Error,
}

/// Render the migration script for all tables, in order
pub fn render_schema(tables: &[Table], policy: UnknownTypePolicy) -> TagResult<String> {
    let mut content = String::with_capacity(tables.len() * 256);
    for table in tables {
        content.push_str(&render_table(table, policy)?);
    }
    Ok(content)
}

/// Render one `create_table` block, its index statement and a blank line
pub fn render_table(table: &Table, policy: UnknownTypePolicy) -> TagResult<String> {
    let table_name = table.snake_name();
    let mut content = String::with_capacity(256);

    content.push_str(&format!("create_table '{}'", table_name));
    if !table.has_primary_key() {
        content.push_str(", id:false");
    } else if !table.has_default_primary_key() {
        content.push_str(&format!(", primary_key:'{}'", snake(&table.primary_key)));
    }
    content.push_str(" do |t|\n");

    for column in table.schema_columns() {
        match column_line(table, column) {
            Some(line) => {
                content.push_str("  ");
                content.push_str(&line);
                content.push('\n');
            }
            None if policy == UnknownTypePolicy::Skip => {
                tracing::warn!(
                    table = %table.name,
                    column = %column.name,
                    "column with unknown type '{}' left out of the migration",
                    column.source_type,
                );
            }
            None => {
                return Err(TagError::unknown_type(
                    &table.name,
                    &column.name,
                    &column.source_type,
                ));
            }
        }
    }
    content.push_str("end\n");

    if table.has_composite_unique() {
        let columns: Vec<String> = table
            .unique_index_columns
            .iter()
            .map(|c| format!(":{}", snake(c)))
            .collect();
        content.push_str(&format!(
            "add_index :{}, [{}], unique:true\n",
            table_name,
            columns.join(", ")
        ));
    }

    content.push('\n');
    Ok(content)
}

/// `t.<kind> :<name>, <options>`, or `None` for an unmapped column
fn column_line(table: &Table, column: &Column) -> Option<String> {
    let kind = column.kind?;
    let mut line = format!("t.{} :{}", kind, snake(column.schema_name()));

    if table.single_unique() == Some(column.name.as_str()) {
        line.push_str(", unique:true");
    }
    let options = [
        ("null", &column.options.null),
        ("default", &column.options.default),
        ("limit", &column.options.limit),
    ];
    for (key, value) in options {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            line.push_str(&format!(", {}:{}", key, value));
        }
    }

    Some(line)
}

// ============================================================================
// Tests
// ============================================================================
