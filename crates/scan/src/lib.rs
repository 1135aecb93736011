//! # tagmigrate Scan
//!
//! Extracts tables from Go sources.
//!
//! ## Pipeline
//!
//! ```text
//! path (file or directory)
//!         │
//!         ▼
//!   tagmigrate_syntax::parse_file()   → SourceFile
//!         │
//!         ▼
//!   scanner::scan_source_file()
//!         ├──► type_map::map_type()   Go type → column kind + options
//!         └──► tags::interpret()      struct tag → renames, keys, options
//!         │
//!         ▼
//!   ScanReport { tables, diagnostics }
//! ```
//!
//! A directory is scanned one level deep: every `.go` file directly inside
//! it, in file name order, merged into a single report.

pub mod scanner;
pub mod tags;
pub mod type_map;

pub use scanner::{ENTITY_MARKER, is_exported, scan_source_file};
pub use tags::{Directive, Flow, TagPair, TagSyntaxError, interpret, parse_directives, parse_tag};
pub use type_map::{TypeMapping, UnknownType, map_type, map_type_name};

use std::path::Path;
use tagmigrate_core::{TagError, TagResult};
use tagmigrate_ir::ScanReport;
use walkdir::WalkDir;

/// Extension of scanned source files
pub const SOURCE_EXTENSION: &str = "go";

/// Scan Go source text
pub fn scan_source(src: &str) -> Result<ScanReport, tagmigrate_syntax::SyntaxError> {
    let file = tagmigrate_syntax::parse_file(src)?;
    Ok(scan_source_file(&file))
}

/// Scan a file, or every Go file directly inside a directory.
///
/// # Errors
///
/// A missing or unreadable input is fatal. A file that does not parse is
/// fatal when it was named explicitly; inside a directory it is logged and
/// skipped.
pub fn scan_path(path: impl AsRef<Path>) -> TagResult<ScanReport> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TagError::InputNotFound(path.to_path_buf()),
        _ => TagError::Io(e),
    })?;

    if metadata.is_dir() {
        scan_dir(path)
    } else {
        scan_file(path)
    }
}

/// Scan a single Go file
pub fn scan_file(path: impl AsRef<Path>) -> TagResult<ScanReport> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|e| TagError::FileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let report = scan_source(&src).map_err(|e| TagError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        tables = report.table_count(),
        "scanned file",
    );
    Ok(report)
}

/// Scan every `.go` file directly inside `dir`, in file name order
pub fn scan_dir(dir: impl AsRef<Path>) -> TagResult<ScanReport> {
    let dir = dir.as_ref();
    let mut report = ScanReport::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| TagError::with_context(dir.display().to_string(), e.to_string()))?;
        let is_source = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|ext| ext == SOURCE_EXTENSION);
        if !is_source {
            continue;
        }

        match scan_file(entry.path()) {
            Ok(file_report) => report.merge(file_report),
            Err(e @ TagError::Parse { .. }) => {
                tracing::warn!("skipping file: {}", e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
