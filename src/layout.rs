//! Grid layout controller.
//!
//! Turns the current filter selection into a grid of chart descriptions:
//!
//! - nothing selected: every institution, 2 columns
//! - otherwise: the selected institutions, `min(selected, 2)` columns
//!
//! Charts always follow institution (first-seen) order, never click order, and
//! every `apply` rebuilds the whole grid from scratch.

use log::debug;
use serde::Serialize;

use crate::app::state::AppState;
use crate::chart::ChartSpec;

/// Upper bound on grid columns; further charts add rows.
pub const MAX_COLUMNS: usize = 2;

/// Column count for a selection of `selected` institutions.
pub fn column_count(selected: usize) -> usize {
    if selected == 0 {
        MAX_COLUMNS
    } else {
        selected.min(MAX_COLUMNS)
    }
}

/// Institutions to chart: all of them for an empty selection, otherwise the
/// selected ones in `institutions` order. Selected names that are not known
/// institutions are dropped.
pub fn planned_institutions(institutions: &[String], selection: &[String]) -> Vec<String> {
    if selection.is_empty() {
        return institutions.to_vec();
    }
    institutions
        .iter()
        .filter(|name| selection.contains(name))
        .cloned()
        .collect()
}

/// A laid-out grid of charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GridView {
    pub columns: usize,
    pub charts: Vec<ChartSpec>,
}

impl GridView {
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            return 0;
        }
        self.charts.len().div_ceil(self.columns)
    }

    /// Charts in row `row`, left to right.
    pub fn row(&self, row: usize) -> &[ChartSpec] {
        let start = (row * self.columns).min(self.charts.len());
        let end = (start + self.columns).min(self.charts.len());
        &self.charts[start..end]
    }
}

/// Owns the grid currently on screen.
#[derive(Debug, Default)]
pub struct LayoutController {
    view: GridView,
}

impl LayoutController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current grid and build a new one for `selection`.
    pub fn apply(&mut self, state: &AppState, selection: &[String]) -> &GridView {
        let names = planned_institutions(state.institutions(), selection);
        let columns = column_count(selection.len());
        let charts = names.iter().map(|name| state.chart(name)).collect();

        debug!(
            "layout: {} chart(s) in {} column(s) for {} selected",
            names.len(),
            columns,
            selection.len()
        );
        self.view = GridView { columns, charts };
        &self.view
    }

    pub fn view(&self) -> &GridView {
        &self.view
    }
}
