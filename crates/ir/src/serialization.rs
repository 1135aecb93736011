//! JSON export of scanned tables
//!
//! The scanned model can be dumped alongside the migration so other tools
//! can consume the same column information without re-parsing Go sources.

use crate::{SCHEMA_VERSION, Table};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tagmigrate_core::{ResultExt, TagError, TagResult};

// ============================================================================
// Table File Wrapper
// ============================================================================

/// Wrapper for exported tables that includes version information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFile {
    /// Schema version of the exported model
    pub schema_version: u32,

    /// The scanned tables, in scan order
    pub tables: Vec<Table>,
}

impl TableFile {
    /// Wrap a table sequence
    pub fn new(tables: &[Table]) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            tables: tables.to_vec(),
        }
    }
}

// ============================================================================
// Save Functions
// ============================================================================

/// Serialize tables to a pretty JSON string
pub fn tables_to_string(tables: &[Table]) -> TagResult<String> {
    Ok(serde_json::to_string_pretty(&TableFile::new(tables))?)
}

/// Write tables as pretty JSON to a sink
pub fn write_tables<W: Write + ?Sized>(tables: &[Table], out: &mut W) -> TagResult<()> {
    let json = tables_to_string(tables)?;
    out.write_all(json.as_bytes())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

// ============================================================================
// Load Functions
// ============================================================================

/// Load tables from a JSON string produced by [`tables_to_string`]
pub fn tables_from_string(json: &str) -> TagResult<Vec<Table>> {
    let file: TableFile = serde_json::from_str(json).with_context("Loading tables")?;
    if file.schema_version > SCHEMA_VERSION {
        return Err(TagError::with_context(
            "Loading tables",
            format!(
                "unsupported schema version {} (expected {})",
                file.schema_version, SCHEMA_VERSION
            ),
        ));
    }
    Ok(file.tables)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;
    use tagmigrate_core::{ColumnKind, ColumnOptions};

    fn sample_tables() -> Vec<Table> {
        let mut table = Table::new("Piyo");
        table.add_column(Column::new(
            "Id",
            ColumnKind::Integer,
            ColumnOptions::not_null().with_limit("8"),
        ));
        table.add_column(Column::unmapped("Tags", "[]string"));
        table.set_primary_key("Id");
        vec![table]
    }

    #[test]
    fn test_json_shape() {
        let json = tables_to_string(&sample_tables()).unwrap();
        assert!(json.contains("\"schema_version\": 1"));
        assert!(json.contains("\"kind\": \"integer\""));
        assert!(json.contains("\"kind\": null"));
        assert!(json.contains("\"primary_key\": \"Id\""));
        assert!(!json.contains("\"default\""));
        // the unmapped column carries no options
        assert_eq!(json.matches("\"options\"").count(), 1);
    }

    #[test]
    fn test_write_and_load() {
        let tables = sample_tables();
        let mut out = tempfile::tempfile().unwrap();
        write_tables(&tables, &mut out).unwrap();

        let json = tables_to_string(&tables).unwrap();
        let loaded = tables_from_string(&json).unwrap();
        assert_eq!(loaded, tables);
    }

    #[test]
    fn test_reject_newer_version() {
        let json = r#"{"schema_version": 99, "tables": []}"#;
        let err = tables_from_string(json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 99"));
    }

    #[test]
    fn test_reject_invalid_json() {
        let err = tables_from_string("not json").unwrap_err();
        assert!(matches!(err, TagError::WithContext { ref context, .. } if context == "Loading tables"));
        assert!(err.to_string().starts_with("Loading tables: "));
    }
}
