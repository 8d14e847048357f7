//! Run settings.
//!
//! Sources, lowest precedence first: built-in defaults, a JSON settings
//! file, the environment (including a `.env` file), command-line flags.
//!
//! ```json
//! {
//!   "data_dir": "data",
//!   "out_dir": "charts-out",
//!   "ticker": "EBAY",
//!   "unmatched": "strict",
//!   "delete_intermediate_files": true,
//!   "style": { "primary": "#097157" }
//! }
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::ChartStyle;
use crate::transform::UnmatchedPolicy;

pub const ENV_DATA_DIR: &str = "QUERYCHART_DATA_DIR";
pub const ENV_OUT_DIR: &str = "QUERYCHART_OUT_DIR";
pub const ENV_TICKER: &str = "QUERYCHART_TICKER";

/// Settings shared by every report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the input CSV files
    pub data_dir: PathBuf,
    /// Root of the `questionN` output directories
    pub out_dir: PathBuf,
    /// Ticker selected by the correlation report
    pub ticker: String,
    /// What to do with values outside a declared ordering sequence
    pub unmatched: UnmatchedPolicy,
    /// Delete animation frames once the GIF is written
    pub delete_intermediate_files: bool,
    pub style: ChartStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            out_dir: PathBuf::from("."),
            ticker: "EBAY".to_string(),
            unmatched: UnmatchedPolicy::Skip,
            delete_intermediate_files: false,
            style: ChartStyle::default(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Override from `QUERYCHART_*` environment variables.
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Override from any variable lookup; blank values are ignored.
    pub fn apply_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(dir) = get(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get(ENV_OUT_DIR) {
            self.out_dir = PathBuf::from(dir);
        }
        if let Some(ticker) = get(ENV_TICKER) {
            self.ticker = ticker;
        }
        self
    }

    /// Path of an input file in the data directory.
    pub fn input(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Output directory of one report.
    pub fn report_dir(&self, subdir: &str) -> PathBuf {
        self.out_dir.join(subdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.ticker, "EBAY");
        assert_eq!(s.unmatched, UnmatchedPolicy::Skip);
        assert!(!s.delete_intermediate_files);
        assert_eq!(s.input("q1_rollup_results.csv"), Path::new("data/q1_rollup_results.csv"));
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ticker": "AAPL", "unmatched": "strict"}}"#).unwrap();

        let s = Settings::load(file.path()).unwrap();
        assert_eq!(s.ticker, "AAPL");
        assert_eq!(s.unmatched, UnmatchedPolicy::Strict);
        assert_eq!(s.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Settings::load(file.path()), Err(ConfigError::Json(_))));
        assert!(matches!(Settings::load("no/such/settings.json"), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_vars_override_file_values() {
        let vars: HashMap<&str, &str> = [(ENV_TICKER, " MSFT "), (ENV_OUT_DIR, ""), (ENV_DATA_DIR, "/srv/data")]
            .into_iter()
            .collect();

        let s = Settings {
            out_dir: PathBuf::from("out"),
            ..Settings::default()
        }
        .apply_vars(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(s.ticker, "MSFT");
        assert_eq!(s.out_dir, PathBuf::from("out"));
        assert_eq!(s.data_dir, PathBuf::from("/srv/data"));
    }
}
