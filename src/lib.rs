//! tagmigrate
//!
//! Generates Rails migrations and column-name accessors from Go structs
//! marked with a `// db:"entity"` comment.
//!
//! The work is split across the workspace crates, re-exported here:
//!
//! - [`syntax`]: Go lexer and declaration parser
//! - [`scan`]: entity discovery, type mapping and struct tag directives
//! - [`ir`]: the `Table` / `Column` model and its JSON form
//! - [`codegen`]: migration and accessor renderers
//! - [`core`]: shared types and `TagError`
//!
//! The `tagmigrate` binary lives in the `tagmigrate_cli` crate.

pub use tagmigrate_codegen as codegen;
pub use tagmigrate_core as core;
pub use tagmigrate_ir as ir;
pub use tagmigrate_scan as scan;
pub use tagmigrate_syntax as syntax;

pub use tagmigrate_codegen::{RenderConfig, UnknownTypePolicy};
pub use tagmigrate_core::{TagError, TagResult};

/// Migration script and accessor file rendered from one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub schema: String,
    pub accessors: String,
}

/// Scan Go source text and render both outputs in memory
pub fn render_source(src: &str, package: &str, config: &RenderConfig) -> TagResult<Rendered> {
    let report = tagmigrate_scan::scan_source(src).map_err(|e| TagError::Parse {
        path: "<source>".into(),
        message: e.to_string(),
    })?;

    Ok(Rendered {
        schema: codegen::render_schema(&report.tables, config.unknown_types)?,
        accessors: codegen::render_accessors(&report.tables, package),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"
package sample

// Not target
type Dummy struct {
	foo int
}

// db:"entity"
type Piyo struct {
	Id			int64  `db:"pk"`
	SomeValue	string
}

// db:"entity"
type Fragments struct {
	HiddenPk int64  `db:"pk"`
	Id       int64  `db:"unique"`
	Version  uint16  `db:"unique" default:"0"`
	Size     int32
	Addr     string `db:"unique"`
	PiyoId	 int64  `refer:""`
}
"#;

    #[test]
    fn test_renders_migration_for_entity_structs_only() {
        let rendered = render_source(SOURCE, "main", &RenderConfig::default()).unwrap();
        assert_eq!(
            rendered.schema,
            "create_table 'piyo' do |t|
  t.string :some_value, null:false
end

create_table 'fragments', primary_key:'hidden_pk' do |t|
  t.integer :id, null:false, limit:8
  t.integer :version, null:false, default:0, limit:2
  t.integer :size, null:false, limit:4
  t.string :addr, null:false
  t.references :piyo, limit:8
end
add_index :fragments, [:id, :version, :addr], unique:true

"
        );
    }

    #[test]
    fn test_renders_accessors_for_every_column() {
        let rendered = render_source(SOURCE, "main", &RenderConfig::default()).unwrap();
        assert_eq!(
            rendered.accessors,
            "package main

// Piyo
func (*Piyo) id() string {
\treturn \"id\"
}
func (*Piyo) some_value() string {
\treturn \"some_value\"
}

// Fragments
func (*Fragments) hidden_pk() string {
\treturn \"hidden_pk\"
}
func (*Fragments) id() string {
\treturn \"id\"
}
func (*Fragments) version() string {
\treturn \"version\"
}
func (*Fragments) size() string {
\treturn \"size\"
}
func (*Fragments) addr() string {
\treturn \"addr\"
}
func (*Fragments) piyo_id() string {
\treturn \"piyo_id\"
}
"
        );
        assert!(!rendered.accessors.contains("Dummy"));
    }

    #[test]
    fn test_output_is_stable_across_runs() {
        let first = render_source(SOURCE, "main", &RenderConfig::default()).unwrap();
        let second = render_source(SOURCE, "main", &RenderConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_type_is_skipped_unless_strict() {
        let src =
            "package p\n// db:\"entity\"\ntype Post struct {\n\tTitle string\n\tTags []string\n}\n";

        let rendered = render_source(src, "main", &RenderConfig::default()).unwrap();
        assert_eq!(
            rendered.schema,
            "create_table 'post', id:false do |t|\n  t.string :title, null:false\nend\n\n"
        );

        let err = render_source(src, "main", &RenderConfig::new().strict()).unwrap_err();
        assert!(matches!(err, TagError::UnknownType { ref field, .. } if field == "Tags"));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let err = render_source("package p\ntype A struct {\n", "main", &RenderConfig::default())
            .unwrap_err();
        assert!(matches!(err, TagError::Parse { .. }));
    }
}
