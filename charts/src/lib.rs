//! # querychart - chart reports from rollup query results
//!
//! querychart reads CSV results of rollup / grouping-set queries over a
//! search log, splits them into disjoint views, orders each view and draws
//! the charts to disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────┐
//! │ CSV File │──▶│ Normalize │──▶│  Partition  │──▶│  Order   │──▶│  Render  │
//! │(auto-enc)│   │ ([NULL])  │   │ (rollup lvl)│   │(sequence)│   │(PNG/GIF) │
//! └──────────┘   └───────────┘   └─────────────┘   └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use querychart::{reports, ReportId, Settings};
//!
//! let settings = Settings::default().apply_env();
//! let outcome = reports::run(ReportId::SearchVolume, &settings)?;
//! println!("Wrote {} charts", outcome.artifacts.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells, schema and record sets
//! - [`parser`] - CSV loading with encoding and delimiter detection
//! - [`transform`] - Normalization, partitioning, ordering and reshaping
//! - [`render`] - plotters charts and GIF animation
//! - [`reports`] - The five concrete reports
//! - [`config`] - Run settings
//! - [`logs`] - Run log

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Shaping
pub mod transform;

// Drawing
pub mod render;

// Reports
pub mod reports;

// Settings and run log
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError,
    LoadError,
    RenderError,
    ReportError,
    ReportResult,
    ShapeError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Cell, Record, RecordSet, Schema};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    load_csv,
    parse_bytes,
    parse_str,
    ParseResult,
};

// =============================================================================
// Re-exports - Shaping
// =============================================================================

pub use transform::{
    ColumnOp,
    LabelBuilder,
    Normalizer,
    OrderingSequence,
    Orderer,
    Partition,
    Partitioner,
    Shaping,
    UnmatchedPolicy,
    ViewKey,
    NULL_SENTINEL,
};

// =============================================================================
// Re-exports - Rendering
// =============================================================================

pub use render::{ChartStyle, Titles};

// =============================================================================
// Re-exports - Reports
// =============================================================================

pub use config::Settings;
pub use reports::{ReportId, ReportOutcome};
pub use logs::{log_error, log_info, log_success, log_warning, LogEntry, LogLevel, JOURNAL};
