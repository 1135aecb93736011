//! Error types for tagmigrate
//!
//! This module provides unified error handling across the scanner, the
//! renderers and the command line, covering IO failures, Go syntax errors,
//! malformed struct tags and unmapped field types.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tagmigrate
#[derive(Debug, Error)]
pub enum TagError {
    // ========================================================================
    // Annotation Errors
    // ========================================================================
    /// A struct tag could not be split into `key:"value"` directives
    #[error("Malformed annotation on '{table}.{field}': {message}")]
    MalformedAnnotation {
        table: String,
        field: String,
        message: String,
    },

    /// A field's Go type has no column mapping
    #[error("Unknown type '{type_name}' for column '{table}.{field}'")]
    UnknownType {
        table: String,
        field: String,
        type_name: String,
    },

    // ========================================================================
    // Source Errors
    // ========================================================================
    /// The Go source could not be parsed
    #[error("Failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// Input path does not exist or cannot be inspected
    #[error("Input not found: {0}")]
    InputNotFound(PathBuf),

    // ========================================================================
    // IO Errors
    // ========================================================================
    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    /// Output destination could not be opened or written
    #[error("Failed to write '{target}': {message}")]
    OutputWrite { target: String, message: String },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl TagError {
    /// Create a malformed annotation error
    pub fn malformed(
        table: impl Into<String>,
        field: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        TagError::MalformedAnnotation {
            table: table.into(),
            field: field.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown type error
    pub fn unknown_type(
        table: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        TagError::UnknownType {
            table: table.into(),
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Create an output write error
    pub fn output(target: impl Into<String>, msg: impl Into<String>) -> Self {
        TagError::OutputWrite {
            target: target.into(),
            message: msg.into(),
        }
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        TagError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error comes from a field annotation or type
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            TagError::MalformedAnnotation { .. } | TagError::UnknownType { .. }
        )
    }

    /// Check if this error is an IO error
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            TagError::Io(_)
                | TagError::FileRead { .. }
                | TagError::OutputWrite { .. }
                | TagError::InputNotFound(_)
        )
    }
}

/// Result type alias using TagError
pub type TagResult<T> = Result<T, TagError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> TagResult<T>;
}

impl<T, E: Into<TagError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> TagResult<T> {
        self.map_err(|e| {
            let err: TagError = e.into();
            TagError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_annotation_error() {
        let err = TagError::malformed("User", "Email", "missing ':' in 'db'");
        assert!(err.is_annotation());
        assert!(!err.is_io());
        assert_eq!(
            err.to_string(),
            "Malformed annotation on 'User.Email': missing ':' in 'db'"
        );
    }

    #[test]
    fn test_unknown_type_error() {
        let err = TagError::unknown_type("User", "Tags", "[]string");
        assert!(err.is_annotation());
        assert_eq!(
            err.to_string(),
            "Unknown type '[]string' for column 'User.Tags'"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = TagError::with_context("Writing schema", "Permission denied");
        assert_eq!(err.to_string(), "Writing schema: Permission denied");
    }

    #[test]
    fn test_result_ext_wraps_io() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.with_context("Opening names file").unwrap_err();
        assert_eq!(err.to_string(), "Opening names file: IO error: denied");
    }

    #[test]
    fn test_io_error_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TagError = io_err.into();
        assert!(err.is_io());
        assert!(TagError::InputNotFound(PathBuf::from("/nope")).is_io());
        assert!(TagError::output("schema.rb", "read-only").is_io());
    }
}
