//! Syntax tree for Go type declarations
//!
//! Only type declarations are kept. Functions, variables, constants and
//! imports are skipped by the parser, but still bound which comments belong
//! to which declaration.

use std::fmt;

// ============================================================================
// Comments
// ============================================================================

/// A single `//` or `/* */` comment, including its delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub line: usize,
    pub end_line: usize,
    pub offset: usize,
    pub end_offset: usize,
}

/// Adjacent comments with no token or blank line between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: Vec<Comment>,
}

impl CommentGroup {
    /// First line of the group
    pub fn line(&self) -> usize {
        self.comments.first().map_or(0, |c| c.line)
    }

    /// Last line of the group
    pub fn end_line(&self) -> usize {
        self.comments.last().map_or(0, |c| c.end_line)
    }

    pub fn offset(&self) -> usize {
        self.comments.first().map_or(0, |c| c.offset)
    }

    pub fn end_offset(&self) -> usize {
        self.comments.last().map_or(0, |c| c.end_offset)
    }

    /// Raw comment text, one comment per line
    pub fn text(&self) -> String {
        self.comments
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any comment in the group contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.comments.iter().any(|c| c.text.contains(needle))
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A parsed Go source file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Package clause name
    pub package: String,

    /// Type declarations in source order
    pub types: Vec<TypeDecl>,
}

/// One `type Name <expr>` spec, standalone or inside a `type ( ... )` group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub ty: TypeExpr,

    /// Comment groups attached to the declaration
    pub comments: Vec<CommentGroup>,

    pub line: usize,
}

impl TypeDecl {
    /// Fields when the declared type is a struct
    pub fn struct_fields(&self) -> Option<&[FieldDecl]> {
        match &self.ty {
            TypeExpr::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Whether an attached comment contains `marker`
    pub fn has_marker(&self, marker: &str) -> bool {
        self.comments.iter().any(|g| g.contains(marker))
    }
}

/// A struct field declaration. `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeExpr,

    /// Tag literal exactly as written, delimiters included
    pub tag: Option<String>,

    pub line: usize,
}

impl FieldDecl {
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Type expressions
// ============================================================================

/// A Go type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `int64`, `Time`
    Ident(String),

    /// `time.Time`, `sql.NullString`
    Qualified { package: String, name: String },

    /// `[]T` (`len == None`) or `[N]T`
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },

    /// `*T`
    Pointer(Box<TypeExpr>),

    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },

    /// Inline `struct { ... }`
    Struct(Vec<FieldDecl>),

    /// Anything else (channels, functions, interfaces, generic instances),
    /// kept as source text
    Other(String),
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn qualified(package: impl Into<String>, name: impl Into<String>) -> Self {
        TypeExpr::Qualified {
            package: package.into(),
            name: name.into(),
        }
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Array {
            len: None,
            elem: Box::new(elem),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Ident(name) => f.write_str(name),
            TypeExpr::Qualified { package, name } => write!(f, "{}.{}", package, name),
            TypeExpr::Array { len, elem } => {
                write!(f, "[{}]{}", len.as_deref().unwrap_or(""), elem)
            }
            TypeExpr::Pointer(inner) => write!(f, "*{}", inner),
            TypeExpr::Map { key, value } => write!(f, "map[{}]{}", key, value),
            TypeExpr::Struct(_) => f.write_str("struct{...}"),
            TypeExpr::Other(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!(TypeExpr::ident("int64").to_string(), "int64");
        assert_eq!(TypeExpr::qualified("time", "Time").to_string(), "time.Time");
        assert_eq!(TypeExpr::slice(TypeExpr::ident("byte")).to_string(), "[]byte");
        let map = TypeExpr::Map {
            key: Box::new(TypeExpr::ident("string")),
            value: Box::new(TypeExpr::Pointer(Box::new(TypeExpr::ident("User")))),
        };
        assert_eq!(map.to_string(), "map[string]*User");
    }
}
