//! # Entity Scanner
//!
//! Finds struct declarations marked with a `db:"entity"` comment and turns
//! each one into a [`Table`], one column per exported field.
//!
//! ```go
//! // db:"entity"
//! type Fragments struct {
//!     HiddenPk int64  `db:"pk"`
//!     Addr     string `db:"unique"`
//!     PiyoId   int64  `refer:""`
//! }
//! ```

use tagmigrate_ir::{Column, Diagnostic, ScanReport, Table};
use tagmigrate_syntax::{FieldDecl, SourceFile, TypeDecl};

use crate::tags::{Flow, interpret, parse_directives};
use crate::type_map::map_type;

/// Comment marker selecting a struct for extraction
pub const ENTITY_MARKER: &str = r#"db:"entity""#;

/// Scan every entity struct in a parsed file
pub fn scan_source_file(file: &SourceFile) -> ScanReport {
    let mut report = ScanReport::new();

    for decl in &file.types {
        if !decl.has_marker(ENTITY_MARKER) {
            continue;
        }
        let Some(fields) = decl.struct_fields() else {
            tracing::debug!(name = %decl.name, "entity marker on a non-struct type, ignored");
            continue;
        };
        let (table, diagnostics) = scan_struct(decl, fields);
        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            "scanned entity",
        );
        report.tables.push(table);
        report.diagnostics.extend(diagnostics);
    }

    report
}

/// Build a table from a struct's fields, in declaration order
fn scan_struct(decl: &TypeDecl, fields: &[FieldDecl]) -> (Table, Vec<Diagnostic>) {
    let mut table = Table::new(&decl.name);
    let mut diagnostics = Vec::new();

    for field in fields {
        if field.is_embedded() {
            tracing::debug!(
                table = %table.name,
                ty = %field.ty,
                "embedded field skipped",
            );
            continue;
        }

        for name in field.names.iter().filter(|n| is_exported(n)) {
            let source_type = field.ty.to_string();
            let mut column = match map_type(&field.ty) {
                Ok(mapping) => {
                    Column::new(name, mapping.kind, mapping.options).with_source_type(&source_type)
                }
                Err(_) => Column::unmapped(name, &source_type),
            };

            let directives = match field.tag.as_deref().map(parse_directives) {
                None => Vec::new(),
                Some(Ok(directives)) => directives,
                Some(Err(e)) => {
                    tracing::warn!(
                        table = %table.name,
                        field = %name,
                        line = field.line,
                        "malformed tag: {}",
                        e,
                    );
                    diagnostics.push(Diagnostic::MalformedAnnotation {
                        table: table.name.clone(),
                        field: name.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if interpret(&directives, &mut column, &mut table) == Flow::SkipField {
                continue;
            }

            if !column.is_mapped() {
                tracing::warn!(
                    table = %table.name,
                    field = %name,
                    line = field.line,
                    "no column type for Go type '{}'",
                    source_type,
                );
                diagnostics.push(Diagnostic::UnknownType {
                    table: table.name.clone(),
                    field: name.clone(),
                    type_name: source_type,
                });
            }

            table.add_column(column);
        }
    }

    (table, diagnostics)
}

/// Go's export rule: the identifier starts with an upper-case letter
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagmigrate_core::ColumnKind;
    use tagmigrate_syntax::parse_file;

    const FRAGMENTS: &str = r#"
package sample

// Not target
type Dummy struct {
	foo int
}

// db:"entity"
type Piyo struct {
	Id        int64 `db:"pk"`
	SomeValue string
}

// db:"entity"
type Fragments struct {
	HiddenPk int64  `db:"pk"`
	Id       int64  `db:"unique"`
	Version  uint16 `db:"unique" default:"0"`
	Size     int32
	Addr     string `db:"unique"`
	PiyoId   int64  `refer:""`
}
"#;

    fn scan(src: &str) -> ScanReport {
        scan_source_file(&parse_file(src).unwrap())
    }

    #[test]
    fn test_scan_fragments() {
        let report = scan(FRAGMENTS);
        assert_eq!(report.table_count(), 2);
        assert!(!report.has_diagnostics());

        let table = report.table("Fragments").unwrap();
        assert_eq!(table.primary_key, "HiddenPk");
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.unique_index_columns, vec!["Id", "Version", "Addr"]);

        let version = table.column("Version").unwrap();
        assert_eq!(version.options.default.as_deref(), Some("0"));
        assert_eq!(version.options.limit.as_deref(), Some("2"));

        let piyo = table.column("PiyoId").unwrap();
        assert_eq!(piyo.kind, Some(ColumnKind::References));
        assert_eq!(piyo.schema_name(), "Piyo");
    }

    #[test]
    fn test_tables_in_declaration_order() {
        let report = scan(FRAGMENTS);
        let names: Vec<_> = report.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Piyo", "Fragments"]);
    }

    #[test]
    fn test_unexported_and_skipped_fields() {
        let report = scan(
            r#"package p
// db:"entity"
type User struct {
	Id       int64
	password string
	Cache    []string `db:"-"`
	Token    string   `db:"pk" db:"-"`
}
"#,
        );
        let table = &report.tables[0];
        let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Id"]);
        assert_eq!(table.primary_key, "Token");
        // skipped fields never report their type
        assert!(!report.has_diagnostics());
    }

    #[test]
    fn test_unknown_type_is_reported_but_kept() {
        let report = scan(
            "package p\n// db:\"entity\"\ntype Post struct {\n\tTags []string\n\tScore float32\n}\n",
        );
        let table = &report.tables[0];
        assert_eq!(table.columns.len(), 2);
        assert!(table.columns.iter().all(|c| !c.is_mapped()));
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(
            report.diagnostics[0],
            Diagnostic::UnknownType {
                table: "Post".to_string(),
                field: "Tags".to_string(),
                type_name: "[]string".to_string(),
            }
        );
    }

    #[test]
    fn test_reference_rescues_unknown_type() {
        let report = scan(
            "package p\n// db:\"entity\"\ntype Post struct {\n\tAuthorId *User `refer:\"\"`\n}\n",
        );
        assert!(!report.has_diagnostics());
        let col = &report.tables[0].columns[0];
        assert_eq!(col.kind, Some(ColumnKind::References));
        assert_eq!(col.schema_name(), "Author");
    }

    #[test]
    fn test_malformed_tag_drops_only_that_field() {
        let report = scan(
            "package p\n// db:\"entity\"\ntype Post struct {\n\tA int64 `db:pk`\n\tB int64 `db:\"unique\"`\n}\n",
        );
        let table = &report.tables[0];
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "B");
        assert!(matches!(
            report.diagnostics[0],
            Diagnostic::MalformedAnnotation { ref field, .. } if field == "A"
        ));
    }

    #[test]
    fn test_multiple_names_per_field() {
        let report = scan("package p\n// db:\"entity\"\ntype Point struct {\n\tX, Y int32\n}\n");
        let names: Vec<_> = report.tables[0]
            .columns
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_marker_on_non_struct_is_ignored() {
        let report = scan("package p\n// db:\"entity\"\ntype Code int\n");
        assert_eq!(report.table_count(), 0);
    }

    #[test]
    fn test_is_exported() {
        assert!(is_exported("Name"));
        assert!(is_exported("Éclair"));
        assert!(!is_exported("name"));
        assert!(!is_exported("_Name"));
        assert!(!is_exported(""));
    }
}
