//! # tagmigrate Syntax
//!
//! A small Go front end: tokenizes a source file and recovers its type
//! declarations, struct fields, field tags and the comment groups attached
//! to each declaration. Function bodies and other declarations are skipped.
//!
//! ```rust,ignore
//! let file = tagmigrate_syntax::parse_file(source)?;
//! for decl in &file.types {
//!     if decl.has_marker(r#"db:"entity""#) { /* ... */ }
//! }
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod parser;

pub use ast::{Comment, CommentGroup, FieldDecl, SourceFile, TypeDecl, TypeExpr};
pub use error::{SyntaxError, SyntaxResult};
pub use literal::unquote;
pub use parser::parse_file;
