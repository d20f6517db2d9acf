//! Shared "load and plan" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load CSV -> extract institutions -> apply initial selection -> lay out charts
//!
//! The CLI and the TUI can then focus on presentation (files vs widgets).

use log::info;

use crate::app::state::AppState;
use crate::domain::{Dataset, ViewConfig};
use crate::error::AppError;
use crate::filter::FilterPanel;
use crate::io::ingest::{LoadReport, load_dataset};
use crate::layout::{GridView, LayoutController};

/// Everything produced by loading a dataset once.
#[derive(Debug, Clone)]
pub struct Session {
    pub state: AppState,
    pub report: LoadReport,
}

/// Load the configured dataset and build the session state.
pub fn load_session(config: &ViewConfig) -> Result<Session, AppError> {
    let report = load_dataset(&config.source)?;
    Ok(session_from_report(report))
}

/// Build session state from an already-loaded report.
pub fn session_from_report(report: LoadReport) -> Session {
    let state = AppState::new(Dataset::new(report.observations.clone()));
    info!(
        "{} institution(s): {}",
        state.institutions().len(),
        state.institutions().join(", ")
    );
    Session { state, report }
}

/// Build a filter panel for the session, pre-checking `initial_selection`.
pub fn build_filter(state: &AppState, initial_selection: &[String]) -> FilterPanel {
    let mut filter = FilterPanel::new();
    filter.build(state.institutions());
    for name in initial_selection {
        filter.set_checked(name, true);
    }
    filter
}

/// Lay out the grid for a one-shot (non-interactive) run.
pub fn plan_grid(state: &AppState, initial_selection: &[String]) -> GridView {
    let filter = build_filter(state, initial_selection);
    let mut layout = LayoutController::new();
    layout.apply(state, &filter.selection()).clone()
}
