//! CSV ingest for the approval-average dataset.
//!
//! This module turns a CSV resource (local file or HTTP URL) into typed
//! `Observation`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (bad dates exclude a row, bad numbers degrade to `NaN`)
//! - **Single shot**: one read per session, no retries

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use log::{info, warn};

use crate::domain::{DataSource, Observation};
use crate::error::AppError;

/// Header names accepted for the institution column, in priority order.
const INSTITUTION_COLUMNS: [&str; 3] = ["politician/institution", "institution", "politician"];
const REQUIRED_COLUMNS: [&str; 5] = ["date", "answer", "pct_estimate", "lo", "hi"];

/// How a malformed row was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIssue {
    /// The row was dropped (unusable date/institution, or CSV-level parse error).
    Excluded,
    /// The row was kept with `NaN` in one or more numeric fields.
    Degraded,
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub issue: RowIssue,
    pub message: String,
}

/// Ingest output: observations + row errors + counts.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub source: String,
    pub observations: Vec<Observation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl LoadReport {
    pub fn excluded(&self) -> usize {
        self.row_errors
            .iter()
            .filter(|e| e.issue == RowIssue::Excluded)
            .count()
    }

    pub fn degraded(&self) -> usize {
        self.row_errors
            .iter()
            .filter(|e| e.issue == RowIssue::Degraded)
            .count()
    }
}

/// Load the dataset from `source`. Fails when the resource cannot be read or has no usable rows.
pub fn load_dataset(source: &DataSource) -> Result<LoadReport, AppError> {
    info!("loading dataset from {source}");
    let report = match source {
        DataSource::Path(path) => {
            let path = validate_csv_path(path)?;
            let file = File::open(path).map_err(|e| {
                AppError::data_load(format!("Failed to open CSV '{}': {e}", path.display()))
            })?;
            parse_csv(file, &source.to_string())?
        }
        DataSource::Url(url) => {
            let body = fetch_url(url)?;
            parse_csv(body.as_bytes(), url)?
        }
    };

    info!(
        "loaded {} of {} rows ({} excluded, {} degraded)",
        report.rows_used,
        report.rows_read,
        report.excluded(),
        report.degraded()
    );
    Ok(report)
}

/// Validate the provided path points to an existing file.
pub fn validate_csv_path(path: &Path) -> Result<&Path, AppError> {
    if !path.exists() {
        return Err(AppError::data_load(format!(
            "CSV file not found: {}",
            path.display()
        )));
    }
    if path.is_dir() {
        return Err(AppError::data_load(format!(
            "Expected a file, got a directory: {}",
            path.display()
        )));
    }
    Ok(path)
}

fn fetch_url(url: &str) -> Result<String, AppError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| AppError::data_load(format!("Failed to fetch '{url}': {e}")))?;
    response
        .text()
        .map_err(|e| AppError::data_load(format!("Failed to read body of '{url}': {e}")))
}

/// Parse CSV text into a `LoadReport`.
///
/// Missing columns and unreadable headers are fatal; everything row-level is recorded in
/// `row_errors` and never aborts the load.
pub fn parse_csv<R: Read>(input: R, source: &str) -> Result<LoadReport, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::data_load(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let columns = Columns::resolve(&headers)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                push_row_error(&mut row_errors, line, RowIssue::Excluded, format!("CSV parse error: {e}"));
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok((obs, bad_fields)) => {
                if !bad_fields.is_empty() {
                    push_row_error(
                        &mut row_errors,
                        line,
                        RowIssue::Degraded,
                        format!("Non-numeric {} (kept as NaN).", bad_fields.join(", ")),
                    );
                }
                observations.push(obs);
            }
            Err(message) => push_row_error(&mut row_errors, line, RowIssue::Excluded, message),
        }
    }

    let rows_used = observations.len();
    if rows_used == 0 {
        return Err(AppError::no_data(format!(
            "No usable rows in '{source}' ({rows_read} read)."
        )));
    }

    Ok(LoadReport {
        source: source.to_string(),
        observations,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn push_row_error(errors: &mut Vec<RowError>, line: usize, issue: RowIssue, message: String) {
    warn!("line {line}: {message}");
    errors.push(RowError {
        line,
        issue,
        message,
    });
}

/// Column indexes resolved from the header row.
struct Columns {
    institution: usize,
    date: usize,
    answer: usize,
    pct_estimate: usize,
    lo: usize,
    hi: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, AppError> {
        let map = build_header_map(headers);

        let institution = INSTITUTION_COLUMNS
            .iter()
            .find_map(|name| map.get(*name).copied())
            .ok_or_else(|| {
                AppError::data_load("Missing required column: `politician/institution`")
            })?;

        let mut found = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in found.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = *map
                .get(name)
                .ok_or_else(|| AppError::data_load(format!("Missing required column: `{name}`")))?;
        }
        let [date, answer, pct_estimate, lo, hi] = found;

        Ok(Self {
            institution,
            date,
            answer,
            pct_estimate,
            lo,
            hi,
        })
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // Keep the first occurrence when a header is duplicated.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Parse one record. Returns the observation plus the names of numeric fields that fell back to `NaN`.
fn parse_row(record: &StringRecord, columns: &Columns) -> Result<(Observation, Vec<&'static str>), String> {
    let institution = get_required(record, columns.institution, "politician/institution")?;
    let date = parse_date(get_required(record, columns.date, "date")?)?;
    let answer = get_required(record, columns.answer, "answer")?;

    let mut bad_fields = Vec::new();
    let mut number = |idx: usize, name: &'static str| match parse_f64(record.get(idx)) {
        Some(v) => v,
        None => {
            bad_fields.push(name);
            f64::NAN
        }
    };
    let pct_estimate = number(columns.pct_estimate, "pct_estimate");
    let lo = number(columns.lo, "lo");
    let hi = number(columns.hi, "hi");

    Ok((
        Observation {
            institution: institution.to_string(),
            date,
            answer: answer.to_string(),
            pct_estimate,
            lo,
            hi,
        },
        bad_fields,
    ))
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

fn parse_f64(s: Option<&str>) -> Option<f64> {
    let v = s?.trim().parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "politician/institution,date,answer,pct_estimate,lo,hi\n";

    #[test]
    fn parses_well_formed_rows() {
        let csv = format!(
            "{HEADER}Joe Biden,2024-01-01,Approve,40.1,38.0,42.2\nJoe Biden,2024-01-01,Disapprove,55.0,53.1,57.0\n"
        );
        let report = parse_csv(csv.as_bytes(), "test").unwrap();
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.rows_used, 2);
        assert!(report.row_errors.is_empty());

        let first = &report.observations[0];
        assert_eq!(first.institution, "Joe Biden");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.answer, "Approve");
        assert!((first.hi - 42.2).abs() < 1e-12);
    }

    #[test]
    fn bad_dates_exclude_and_bad_numbers_degrade() {
        let csv = format!(
            "{HEADER}A,2024-13-45,Approve,40,38,42\nA,2024-01-02,Approve,n/a,38,42\n,2024-01-03,Approve,1,1,1\nA,2024-01-04,Approve,41,39,43\n"
        );
        let report = parse_csv(csv.as_bytes(), "test").unwrap();
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_used, 2);
        assert_eq!(report.excluded(), 2);
        assert_eq!(report.degraded(), 1);
        assert_eq!(report.row_errors[0].line, 2);
        assert!(report.observations[0].pct_estimate.is_nan());
        assert_eq!(report.observations[0].hi, 42.0);
    }

    #[test]
    fn accepts_bom_and_alias_headers() {
        let csv = "\u{feff}Institution,Date,Answer,PCT_ESTIMATE,lo,hi\nCongress,2024-02-01,Approve,20,18,22\n";
        let report = parse_csv(csv.as_bytes(), "test").unwrap();
        assert_eq!(report.observations[0].institution, "Congress");
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let csv = "politician/institution,date,answer,pct_estimate,lo\nA,2024-01-01,Approve,1,1\n";
        let err = parse_csv(csv.as_bytes(), "test").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("`hi`"));
    }

    #[test]
    fn no_usable_rows_is_fatal() {
        let csv = format!("{HEADER}A,not-a-date,Approve,1,1,1\n");
        let err = parse_csv(csv.as_bytes(), "test").unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let source = DataSource::parse("definitely/not/here.csv");
        let err = load_dataset(&source).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
