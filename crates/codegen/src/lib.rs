//! # tagmigrate Codegen
//!
//! Renders extracted tables into their outputs.
//!
//! ## Outputs
//!
//! - **Migration script**: ActiveRecord `create_table` / `add_index` statements
//! - **Accessors**: a Go file with one column-name method per column
//! - **Tables JSON**: the extracted tables, for other tooling
//!
//! Outputs are independent: a failure rendering or writing one is recorded
//! in the [`RenderOutcome`] and the rest are still produced.

// ============================================================================
// Modules
// ============================================================================

pub mod accessors;
pub mod schema;
pub mod targets;

// ============================================================================
// Re-exports
// ============================================================================

pub use accessors::{DEFAULT_PACKAGE, render_accessors, render_table_accessors};
pub use schema::{UnknownTypePolicy, render_schema, render_table};
pub use targets::{RenderTargets, Sink};

use tagmigrate_core::{TagError, TagResult};
use tagmigrate_ir::Table;

// ============================================================================
// RenderConfig
// ============================================================================

/// Rendering options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderConfig {
    /// Handling of columns with unmapped types
    pub unknown_types: UnknownTypePolicy,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the migration on columns with unknown types
    pub fn strict(mut self) -> Self {
        self.unknown_types = UnknownTypePolicy::Error;
        self
    }
}

// ============================================================================
// RenderOutcome
// ============================================================================

/// Result of each requested output; `None` when it was not requested
#[derive(Debug, Default)]
pub struct RenderOutcome {
    pub schema: Option<TagResult<()>>,
    pub accessors: Option<TagResult<()>>,
    pub tables_json: Option<TagResult<()>>,
}

impl RenderOutcome {
    /// Check that every requested output was written
    pub fn is_success(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Errors of the outputs that failed
    pub fn errors(&self) -> impl Iterator<Item = &TagError> {
        [&self.schema, &self.accessors, &self.tables_json]
            .into_iter()
            .filter_map(|r| r.as_ref().and_then(|r| r.as_ref().err()))
    }

    /// Number of outputs written
    pub fn written(&self) -> usize {
        [&self.schema, &self.accessors, &self.tables_json]
            .into_iter()
            .filter(|r| matches!(r, Some(Ok(()))))
            .count()
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render every requested output into its sink
pub fn render_all(
    tables: &[Table],
    targets: &mut RenderTargets,
    config: &RenderConfig,
) -> RenderOutcome {
    let package = targets.package.as_str();
    let schema = targets.schema.as_mut().map(|sink| -> TagResult<()> {
        let content = render_schema(tables, config.unknown_types)?;
        sink.write_text(&content)?;
        tracing::debug!(target_name = sink.label(), tables = tables.len(), "wrote migration");
        Ok(())
    });

    let accessors = targets.accessors.as_mut().map(|sink| -> TagResult<()> {
        sink.write_text(&render_accessors(tables, package))?;
        tracing::debug!(target_name = sink.label(), tables = tables.len(), "wrote accessors");
        Ok(())
    });

    let tables_json = targets.tables_json.as_mut().map(|sink| -> TagResult<()> {
        let label = sink.label().to_string();
        tagmigrate_ir::write_tables(tables, sink.writer_mut()).map_err(|e| match e {
            TagError::Io(io) => TagError::output(&label, io.to_string()),
            other => other,
        })?;
        tracing::debug!(target_name = %label, tables = tables.len(), "wrote tables json");
        Ok(())
    });

    RenderOutcome {
        schema,
        accessors,
        tables_json,
    }
}

// ============================================================================
// Tests
// ============================================================================
