//! # Accessor Rendering
//!
//! Renders a Go file with one method per column returning the column's
//! database name, so queries can refer to columns without string literals:
//!
//! ```go
//! package main
//!
//! // Fragments
//! func (*Fragments) hidden_pk() string {
//! 	return "hidden_pk"
//! }
//! ```
//!
//! Every column gets an accessor, including the primary key and columns
//! whose type could not be mapped.

use tagmigrate_core::snake;
use tagmigrate_ir::Table;

/// Package name used when none is given
pub const DEFAULT_PACKAGE: &str = "main";

/// Render accessors for all tables into a single Go file
pub fn render_accessors(tables: &[Table], package: &str) -> String {
    let mut content = String::with_capacity(64 + tables.len() * 256);

    content.push_str(&format!("package {}\n", package));
    for table in tables {
        content.push('\n');
        content.push_str(&render_table_accessors(table));
    }

    content
}

/// Render the comment line and the methods for one table
pub fn render_table_accessors(table: &Table) -> String {
    let mut content = format!("// {}\n", table.name);

    for column in &table.columns {
        let name = snake(&column.name);
        content.push_str(&format!(
            "func (*{}) {}() string {{\n\treturn {}\n}}\n",
            table.name,
            name,
            go_quote(&name)
        ));
    }

    content
}

/// Interpreted Go string literal
fn go_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(src: &str) -> Vec<Table> {
        tagmigrate_scan::scan_source(src).unwrap().tables
    }

    #[test]
    fn test_fragments_accessors() {
        let tables = scan(
            r#"package sample
// db:"entity"
type Fragments struct {
	HiddenPk int64  `db:"pk"`
	Addr     string `db:"unique"`
	PiyoId   int64  `refer:""`
	Cache    []byte `db:"-"`
}
"#,
        );
        assert_eq!(
            render_accessors(&tables, DEFAULT_PACKAGE),
            "package main

// Fragments
func (*Fragments) hidden_pk() string {
\treturn \"hidden_pk\"
}
func (*Fragments) addr() string {
\treturn \"addr\"
}
func (*Fragments) piyo_id() string {
\treturn \"piyo_id\"
}
"
        );
    }

    #[test]
    fn test_tables_are_separated() {
        let tables = scan(
            "package p\n// db:\"entity\"\ntype A struct {\n\tX int\n}\n// db:\"entity\"\ntype B struct {\n\tY int\n}\n",
        );
        let out = render_accessors(&tables, "models");
        assert!(out.starts_with("package models\n\n// A\n"));
        assert!(out.contains("}\n\n// B\nfunc (*B) y() string {"));
    }

    #[test]
    fn test_renamed_column_uses_new_name() {
        let tables = scan(
            "package p\n// db:\"entity\"\ntype User struct {\n\tName string `column:\"DisplayName\"`\n}\n",
        );
        let out = render_accessors(&tables, DEFAULT_PACKAGE);
        assert!(out.contains("func (*User) display_name() string {\n\treturn \"display_name\"\n}"));
    }

    #[test]
    fn test_no_tables() {
        assert_eq!(render_accessors(&[], "main"), "package main\n");
    }

    #[test]
    fn test_go_quote() {
        assert_eq!(go_quote("plain"), "\"plain\"");
        assert_eq!(go_quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
