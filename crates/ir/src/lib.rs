//! # tagmigrate IR (Intermediate Representation)
//!
//! The normalized table model produced by the scanner and consumed by both
//! renderers.
//!
//! ## Core Concepts
//!
//! - **Table**: one entity struct (e.g. `Fragments`)
//! - **Column**: one exported struct field, with its kind and options
//! - **Diagnostic**: a per-field problem that did not stop the scan
//! - **ScanReport**: tables plus diagnostics for a whole input
//!

// Module declarations
pub mod column;
pub mod report;
pub mod serialization;
pub mod table;

// Re-export commonly used types at crate root
pub use column::Column;
pub use report::{Diagnostic, ScanReport};
pub use serialization::{TableFile, tables_from_string, tables_to_string, write_tables};
pub use table::Table;

// Re-export core types that are commonly used with IR
pub use tagmigrate_core::{ColumnKind, ColumnOptions, TagError, TagResult};

/// Current schema version for exported table files
pub const SCHEMA_VERSION: u32 = 1;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        assert_eq!(SCHEMA_VERSION, 1);
    }
}
