//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory for the lifetime of a session
//! - exported to JSON alongside chart descriptions
//! - constructed directly in tests without going through the CSV loader

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical answer label for the approval series.
pub const ANSWER_APPROVE: &str = "Approve";
/// Canonical answer label for the disapproval series.
pub const ANSWER_DISAPPROVE: &str = "Disapprove";

/// One row of the approval-average dataset.
///
/// `lo <= pct_estimate <= hi` is expected but not enforced. Numeric fields that
/// failed to parse hold `NaN`; downstream geometry skips non-finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub institution: String,
    pub date: NaiveDate,
    pub answer: String,
    pub pct_estimate: f64,
    pub lo: f64,
    pub hi: f64,
}

/// Observations for one institution and one answer category, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub answer: String,
    pub points: Vec<Observation>,
}

/// Where the dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a resource identifier: `http(s)://` prefixes are URLs, anything else a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Outer size and margins of an exported chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            margin_top: 50,
            margin_right: 20,
            margin_bottom: 50,
            margin_left: 50,
        }
    }
}

/// Resolved run configuration.
///
/// This is derived from CLI flags, `.env` values, and defaults.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    pub source: DataSource,
    /// Institutions to pre-select in the filter panel (unknown names are ignored).
    pub initial_selection: Vec<String>,
    pub geometry: ChartGeometry,
    pub log_file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(
            DataSource::parse(" https://example.org/a.csv "),
            DataSource::Url("https://example.org/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("datasets/approval_averages.csv"),
            DataSource::Path(PathBuf::from("datasets/approval_averages.csv"))
        );
    }

    #[test]
    fn default_geometry_is_400_by_300() {
        let g = ChartGeometry::default();
        assert_eq!((g.width, g.height), (400, 300));
        assert_eq!((g.margin_top, g.margin_right, g.margin_bottom, g.margin_left), (50, 20, 50, 50));
    }
}
