//! Error types for the report pipeline.
//!
//! - [`LoadError`] - input file could not be read or parsed as CSV
//! - [`ShapeError`] - the rows do not have the shape a report expects
//! - [`RenderError`] - chart drawing or image encoding failed
//! - [`ConfigError`] - settings file could not be read
//! - [`ReportError`] - top-level error returned by every report
//!
//! Conversion is automatic via `From`, so `?` works across boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Load Errors
// =============================================================================

/// Errors while reading an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Input file is missing or unreadable.
    #[error("The file '{}' was not found or is unreadable: {source}", path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text.
    #[error("Invalid CSV in '{}': {message}", path.display())]
    Csv { path: PathBuf, message: String },
}

impl LoadError {
    /// True when the input file itself could not be opened.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, LoadError::DataUnavailable { .. })
    }
}

// =============================================================================
// Shape Errors
// =============================================================================

/// Errors raised when rows do not match the declared report schema.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Column expected by the report is not in the header.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two header cells trim to the same name.
    #[error("Duplicate column after trimming: {0}")]
    DuplicateColumn(String),

    /// Numeric coercion failed.
    #[error("Line {line}, column '{column}': value '{value}' is not numeric")]
    NotNumeric {
        line: usize,
        column: String,
        value: String,
    },

    /// Date coercion failed.
    #[error("Line {line}, column '{column}': value '{value}' is not a date")]
    NotDate {
        line: usize,
        column: String,
        value: String,
    },

    /// Strict categorical ordering met a value outside the declared sequence.
    #[error("Line {line}, column '{column}': '{value}' is not one of [{expected}]")]
    UnmatchedCategory {
        line: usize,
        column: String,
        value: String,
        expected: String,
    },

    /// Input has no header row.
    #[error("Input '{0}' is empty")]
    EmptyInput(String),

    /// Grouping patterns are encoded in a 32-bit mask.
    #[error("At most 32 grouping columns are supported, got {0}")]
    TooManyGroupingColumns(usize),
}

// =============================================================================
// Render Errors
// =============================================================================

/// Errors while producing image artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Plotters backend or drawing failure.
    #[error("Drawing failed for '{}': {message}", path.display())]
    Draw { path: PathBuf, message: String },

    /// Frame decode or GIF encode failure.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Output directory or file IO.
    #[error("Output IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to compose.
    #[error("No frames to compose into '{}'", .0.display())]
    NoFrames(PathBuf),
}

impl RenderError {
    pub fn draw(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        RenderError::Draw {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Report Errors (top-level)
// =============================================================================

/// Top-level error returned by reports and the CLI.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("Data shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Unknown report id on the command line or in settings.
    #[error("Unknown report: {0}")]
    UnknownReport(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

pub type ShapeResult<T> = Result<T, ShapeError>;

pub type RenderResult<T> = Result<T, RenderError>;

pub type ReportResult<T> = Result<T, ReportError>;
