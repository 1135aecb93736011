//! # tagmigrate CLI
//!
//! Command-line front end: scans a Go file or directory and writes the
//! migration script, the accessor file and the tables JSON.
//!
//! ```text
//! tagmigrate models/ -o db/migrate/create_tables.rb -n models/columns.go -p models
//! ```
//!
//! Diagnostics and the summary go to stderr; with no `-o` the migration
//! script goes to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tagmigrate_codegen::{DEFAULT_PACKAGE, RenderConfig, RenderTargets, Sink, render_all};
use tagmigrate_core::TagError;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Arguments
// ============================================================================

/// Generate Rails migrations and column-name accessors from Go structs
/// marked with a `db:"entity"` comment
#[derive(Debug, Clone, Parser)]
#[command(name = "tagmigrate", version, about, long_about = None)]
pub struct Args {
    /// Go source file, or directory of Go files
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Migration script destination (`-` for stdout)
    #[arg(short, long, value_name = "PATH", default_value = "-")]
    pub output: String,

    /// Accessor file destination; not written when absent
    #[arg(short = 'n', long = "names", value_name = "PATH")]
    pub names: Option<String>,

    /// Package name of the accessor file
    #[arg(short, long, value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    pub package: String,

    /// Fail the migration when a column's Go type has no mapping
    #[arg(long)]
    pub strict: bool,

    /// Also write the scanned tables as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors and skip the summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level selected by `-v` / `-q`
    pub fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    /// Rendering options selected by the flags
    pub fn render_config(&self) -> RenderConfig {
        if self.strict {
            RenderConfig::new().strict()
        } else {
            RenderConfig::new()
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Install the stderr log subscriber; `RUST_LOG` overrides `level`
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// Run
// ============================================================================

/// Scan the input and write every requested output.
///
/// Failing to scan the input is an error. Output failures are reported one
/// by one and make the run unsuccessful (`Ok(false)`) without stopping the
/// other outputs.
pub fn run(args: &Args) -> Result<bool> {
    let report = tagmigrate_scan::scan_path(&args.input)
        .with_context(|| format!("cannot scan {}", args.input.display()))?;

    if report.tables.is_empty() {
        tracing::warn!(input = %args.input.display(), "no entity structs found");
    }

    let mut failures: Vec<TagError> = Vec::new();
    let mut targets = RenderTargets::new().with_package(&args.package);
    targets.schema = open_sink(&args.output, &mut failures);
    targets.accessors = args
        .names
        .as_deref()
        .and_then(|path| open_sink(path, &mut failures));
    targets.tables_json = args
        .json
        .as_deref()
        .and_then(|path| open_sink(path, &mut failures));

    let outcome = render_all(&report.tables, &mut targets, &args.render_config());

    let errors: Vec<&TagError> = failures.iter().chain(outcome.errors()).collect();
    for error in &errors {
        eprintln!("{} {}", "error:".red().bold(), error);
        if let Some(hint) = hint(error) {
            eprintln!("  {} {}", "hint:".cyan().bold(), hint);
        }
    }

    tracing::info!(
        tables = report.table_count(),
        diagnostics = report.diagnostics.len(),
        outputs = outcome.written(),
        "done",
    );

    if !args.quiet {
        print_summary(report.table_count(), report.diagnostics.len(), errors.len());
    }

    Ok(errors.is_empty())
}

/// Exit code for the outcome of [`run`], printing a fatal error
pub fn exit_code(result: Result<bool>) -> ExitCode {
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Open a destination, recording the error instead of returning it
fn open_sink(target: &str, failures: &mut Vec<TagError>) -> Option<Sink> {
    match Sink::open(target) {
        Ok(sink) => Some(sink),
        Err(e) => {
            failures.push(e);
            None
        }
    }
}

/// Follow-up advice printed under an output error
fn hint(error: &TagError) -> Option<&'static str> {
    if error.is_annotation() {
        Some("without --strict such columns are left out of the migration")
    } else if error.is_io() {
        Some("the other outputs were still written")
    } else {
        None
    }
}

fn print_summary(tables: usize, warnings: usize, errors: usize) {
    let mut line = format!("{} table(s)", tables);
    if warnings > 0 {
        line.push_str(&format!(", {}", format!("{} warning(s)", warnings).yellow()));
    }
    if errors > 0 {
        line.push_str(&format!(", {}", format!("{} failed output(s)", errors).red()));
        eprintln!("{} {}", "✗".red().bold(), line);
    } else {
        eprintln!("{} {}", "✓".green().bold(), line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const USER: &str = "package models\n\n// db:\"entity\"\ntype User struct {\n\tId    int64  `db:\"pk\"`\n\tEmail string `db:\"unique\"`\n}\n";

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tagmigrate").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["models.go"]);
        assert_eq!(args.input, PathBuf::from("models.go"));
        assert_eq!(args.output, "-");
        assert_eq!(args.names, None);
        assert_eq!(args.package, "main");
        assert!(!args.strict);
        assert_eq!(args.log_level(), "info");
        assert_eq!(args.render_config(), RenderConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let args = parse(&[
            "models", "-o", "schema.rb", "-n", "names.go", "-p", "models", "-vv",
        ]);
        assert_eq!(args.output, "schema.rb");
        assert_eq!(args.names.as_deref(), Some("names.go"));
        assert_eq!(args.package, "models");
        assert_eq!(args.log_level(), "trace");
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        let result =
            Args::try_parse_from(["tagmigrate", "models.go", "--quiet", "--verbose"]);
        assert!(result.is_err());
        assert_eq!(parse(&["models.go", "-q"]).log_level(), "error");
    }

    #[test]
    fn test_strict_flag() {
        let args = parse(&["models.go", "--strict"]);
        assert_eq!(args.render_config(), RenderConfig::new().strict());
    }

    #[test]
    fn test_hint_follows_error_kind() {
        let unknown = TagError::unknown_type("Post", "Tags", "[]string");
        assert!(hint(&unknown).unwrap().contains("--strict"));
        assert!(hint(&TagError::output("schema.rb", "read-only")).is_some());
        assert_eq!(hint(&TagError::with_context("Loading tables", "bad")), None);
    }

    #[test]
    fn test_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("user.go");
        fs::write(&input, USER).unwrap();
        let schema = dir.path().join("schema.rb");
        let names = dir.path().join("names.go");

        let args = parse(&[
            input.to_str().unwrap(),
            "-q",
            "-o",
            schema.to_str().unwrap(),
            "-n",
            names.to_str().unwrap(),
            "-p",
            "models",
        ]);
        assert!(run(&args).unwrap());

        assert_eq!(
            fs::read_to_string(&schema).unwrap(),
            "create_table 'user' do |t|\n  t.string :email, unique:true, null:false\nend\n\n"
        );
        let accessors = fs::read_to_string(&names).unwrap();
        assert!(accessors.starts_with("package models\n\n// User\n"));
        assert!(accessors.contains("func (*User) id() string {"));
    }

    #[test]
    fn test_unopenable_output_still_writes_others() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("user.go");
        fs::write(&input, USER).unwrap();
        let names = dir.path().join("names.go");
        let schema = dir.path().join("missing").join("schema.rb");

        let args = parse(&[
            input.to_str().unwrap(),
            "-q",
            "-o",
            schema.to_str().unwrap(),
            "-n",
            names.to_str().unwrap(),
        ]);
        assert!(!run(&args).unwrap());
        assert!(names.exists());
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nope.go");
        let args = parse(&[input.to_str().unwrap(), "-q"]);
        let err = run(&args).unwrap_err();
        assert!(format!("{:#}", err).contains("Input not found"));
    }
}
