//! # tagmigrate Core
//!
//! Core types and error handling for tagmigrate.
//!
//! - **Types**: `ColumnKind`, `ColumnOptions` and the naming helpers shared
//!   by the scanner and both renderers
//! - **Errors**: unified error handling with `TagError` and `TagResult`
//!

pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{ResultExt, TagError, TagResult};
pub use types::{
    ColumnKind, ColumnOptions, DEFAULT_PRIMARY_KEY, REFERENCE_SUFFIX, snake,
    strip_reference_suffix,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
