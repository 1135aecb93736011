//! # Type Mapping
//!
//! Maps a Go field type to a migration column kind and its initial options.
//!
//! | Go type | column | options |
//! |---|---|---|
//! | `bool` | boolean | `null:false` |
//! | `int`, `int64`, `uint`, `uint64` | integer | `null:false, limit:8` |
//! | `int32`, `uint32` | integer | `null:false, limit:4` |
//! | `int16`, `uint16` | integer | `null:false, limit:2` |
//! | `int8`, `uint8`, `byte` | integer | `null:false, limit:1` |
//! | `string` | string | `null:false` |
//! | `[]byte` | binary | |
//! | `float`, `float64` | float | `null:false` |
//! | `time.Time` | timestamp | `null:true, default:0` |
//! | `sql.NullBool` / `NullInt64` / `NullFloat64` / `NullString` | boolean / integer / float / string | |
//!
//! Qualified names map by their selector, so `sql.NullString` and a bare
//! `NullString` are treated alike.

use tagmigrate_core::{ColumnKind, ColumnOptions};
use tagmigrate_syntax::TypeExpr;
use thiserror::Error;

/// Column kind and initial options for a mapped Go type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub kind: ColumnKind,
    pub options: ColumnOptions,
}

impl TypeMapping {
    fn new(kind: ColumnKind, options: ColumnOptions) -> Self {
        Self { kind, options }
    }
}

/// The Go type has no column mapping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no column mapping for Go type '{0}'")]
pub struct UnknownType(pub String);

/// Map a field's type expression
pub fn map_type(ty: &TypeExpr) -> Result<TypeMapping, UnknownType> {
    let mapped = match ty {
        TypeExpr::Ident(name) => map_type_name(name),
        TypeExpr::Qualified { name, .. } => map_type_name(name),
        TypeExpr::Array { elem, .. } => match elem.as_ref() {
            TypeExpr::Ident(name) if name == "byte" => {
                Some(TypeMapping::new(ColumnKind::Binary, ColumnOptions::new()))
            }
            _ => None,
        },
        _ => None,
    };
    mapped.ok_or_else(|| UnknownType(ty.to_string()))
}

/// Map a simplified (unqualified, non-array) type name
pub fn map_type_name(name: &str) -> Option<TypeMapping> {
    let not_null = ColumnOptions::not_null;
    let mapping = match name {
        "bool" => TypeMapping::new(ColumnKind::Boolean, not_null()),
        "int" | "int64" | "uint" | "uint64" => {
            TypeMapping::new(ColumnKind::Integer, not_null().with_limit("8"))
        }
        "int32" | "uint32" => TypeMapping::new(ColumnKind::Integer, not_null().with_limit("4")),
        "int16" | "uint16" => TypeMapping::new(ColumnKind::Integer, not_null().with_limit("2")),
        "int8" | "uint8" | "byte" => {
            TypeMapping::new(ColumnKind::Integer, not_null().with_limit("1"))
        }
        "string" => TypeMapping::new(ColumnKind::String, not_null()),
        "float" | "float64" => TypeMapping::new(ColumnKind::Float, not_null()),
        "Time" => TypeMapping::new(
            ColumnKind::Timestamp,
            ColumnOptions::new().with_null(true).with_default("0"),
        ),
        "NullBool" => TypeMapping::new(ColumnKind::Boolean, ColumnOptions::new()),
        "NullInt64" => TypeMapping::new(ColumnKind::Integer, ColumnOptions::new()),
        "NullFloat64" => TypeMapping::new(ColumnKind::Float, ColumnOptions::new()),
        "NullString" => TypeMapping::new(ColumnKind::String, ColumnOptions::new()),
        _ => return None,
    };
    Some(mapping)
}

// ============================================================================
// Tests
// ============================================================================
