//! Formatted dataset summaries.
//!
//! We keep formatting code in one place so:
//! - the `summary` subcommand and the TUI "Data" tab print the same facts
//! - output changes are localized

use crate::app::state::AppState;
use crate::io::ingest::{LoadReport, RowIssue};

/// Per-institution facts shown in summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct InstitutionSummary {
    pub institution: String,
    pub rows: usize,
    pub answers: Vec<String>,
    pub first: Option<chrono::NaiveDate>,
    pub last: Option<chrono::NaiveDate>,
    pub latest: Vec<(String, f64)>,
}

/// Summaries in institution order.
pub fn summarize_institutions(state: &AppState) -> Vec<InstitutionSummary> {
    state
        .institutions()
        .iter()
        .map(|name| {
            let chart = state.chart(name);
            let rows = chart.series.iter().map(|s| s.points.len()).sum();
            let latest = chart
                .series
                .iter()
                .filter_map(|s| s.points.last().map(|o| (s.answer.clone(), o.pct_estimate)))
                .collect();
            InstitutionSummary {
                institution: name.clone(),
                rows,
                answers: chart.series.iter().map(|s| s.answer.clone()).collect(),
                first: chart.x_domain.map(|(d0, _)| d0),
                last: chart.x_domain.map(|(_, d1)| d1),
                latest,
            }
        })
        .collect()
}

/// Short text for a load report's counts.
pub fn format_load_line(report: &LoadReport) -> String {
    format!(
        "{} rows read, {} used, {} excluded, {} degraded",
        report.rows_read,
        report.rows_used,
        report.excluded(),
        report.degraded()
    )
}

/// Full summary printed by `approval summary`.
pub fn format_summary(report: &LoadReport, state: &AppState) -> String {
    let mut out = String::new();

    out.push_str("=== approval - dataset summary ===\n");
    out.push_str(&format!("Source: {}\n", report.source));
    out.push_str(&format!("Rows: {}\n", format_load_line(report)));
    out.push_str(&format!("Answers: {}\n", state.dataset().answers().join(", ")));

    out.push_str(&format!("\nInstitutions ({}):\n", state.institutions().len()));
    for s in summarize_institutions(state) {
        let range = match (s.first, s.last) {
            (Some(a), Some(b)) => format!("{a} .. {b}"),
            _ => "-".to_string(),
        };
        let latest = s
            .latest
            .iter()
            .map(|(answer, v)| format!("{answer} {}", fmt_pct(*v)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "  {:<28} {:>6} rows  {range}  latest: {latest}\n",
            s.institution, s.rows
        ));
    }

    if !report.row_errors.is_empty() {
        out.push_str(&format!("\nMalformed rows ({}):\n", report.row_errors.len()));
        for e in &report.row_errors {
            let tag = match e.issue {
                RowIssue::Excluded => "excluded",
                RowIssue::Degraded => "degraded",
            };
            out.push_str(&format!("  line {:>5} [{tag}] {}\n", e.line, e.message));
        }
    }

    out
}

fn fmt_pct(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.1}%")
    } else {
        "n/a".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::session_from_report;
    use crate::io::ingest::parse_csv;

    const CSV: &str = "politician/institution,date,answer,pct_estimate,lo,hi
Congress,2024-01-01,Approve,20,18,22
Congress,2024-02-01,Approve,21.5,19,24
Congress,2024-02-01,Disapprove,70,68,72
Joe Biden,bad-date,Approve,40,38,42
Joe Biden,2024-01-01,Approve,41,39,43
";

    #[test]
    fn summary_lists_institutions_and_bad_rows() {
        let session = session_from_report(parse_csv(CSV.as_bytes(), "test.csv").unwrap());
        let text = format_summary(&session.report, &session.state);
        assert!(text.contains("Source: test.csv"));
        assert!(text.contains("5 rows read, 4 used, 1 excluded, 0 degraded"));
        assert!(text.contains("Congress"));
        assert!(text.contains("Approve 21.5%"));
        assert!(text.contains("line     5 [excluded]"));
    }

    #[test]
    fn institution_summaries_follow_first_seen_order() {
        let session = session_from_report(parse_csv(CSV.as_bytes(), "test.csv").unwrap());
        let summaries = summarize_institutions(&session.state);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].institution, "Congress");
        assert_eq!(summaries[0].rows, 3);
        assert_eq!(summaries[0].answers, vec!["Approve", "Disapprove"]);
        assert_eq!(summaries[1].rows, 1);
    }
}
