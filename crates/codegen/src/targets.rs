//! Output sinks
//!
//! Each output is opened on its own so that one unwritable destination does
//! not keep the others from being produced.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tagmigrate_core::{TagError, TagResult};

use crate::accessors::DEFAULT_PACKAGE;

/// A named output destination
pub struct Sink {
    label: String,
    writer: Box<dyn Write>,
}

impl Sink {
    /// Wrap any writer; `label` names it in error messages
    pub fn new(label: impl Into<String>, writer: Box<dyn Write>) -> Self {
        Self {
            label: label.into(),
            writer,
        }
    }

    /// Standard output
    pub fn stdout() -> Self {
        Self::new("<stdout>", Box::new(io::stdout()))
    }

    /// Create (or truncate) a file
    pub fn create(path: impl AsRef<Path>) -> TagResult<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|e| TagError::output(path.display().to_string(), e.to_string()))?;
        Ok(Self::new(
            path.display().to_string(),
            Box::new(BufWriter::new(file)),
        ))
    }

    /// Standard output for `-`, a file otherwise
    pub fn open(target: &str) -> TagResult<Self> {
        if target == "-" {
            Ok(Self::stdout())
        } else {
            Self::create(target)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Write the whole text and flush
    pub fn write_text(&mut self, text: &str) -> TagResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| TagError::output(&self.label, e.to_string()))
    }

    /// Borrow the underlying writer
    pub fn writer_mut(&mut self) -> &mut dyn Write {
        self.writer.as_mut()
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").field("label", &self.label).finish()
    }
}

/// Where rendered outputs go, and the package the accessors belong to.
///
/// A `None` sink means the output was not requested, or could not be opened.
#[derive(Debug)]
pub struct RenderTargets {
    /// Migration script
    pub schema: Option<Sink>,

    /// Go accessor file
    pub accessors: Option<Sink>,

    /// JSON dump of the extracted tables
    pub tables_json: Option<Sink>,

    /// Go package name of the accessor file
    pub package: String,
}

impl Default for RenderTargets {
    fn default() -> Self {
        Self {
            schema: None,
            accessors: None,
            tables_json: None,
            package: DEFAULT_PACKAGE.to_string(),
        }
    }
}

impl RenderTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Migration script to standard output, nothing else
    pub fn stdout() -> Self {
        Self::new().with_schema(Sink::stdout())
    }

    pub fn with_schema(mut self, sink: Sink) -> Self {
        self.schema = Some(sink);
        self
    }

    pub fn with_accessors(mut self, sink: Sink) -> Self {
        self.accessors = Some(sink);
        self
    }

    pub fn with_tables_json(mut self, sink: Sink) -> Self {
        self.tables_json = Some(sink);
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
