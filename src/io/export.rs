//! Export planned grids as JSON.
//!
//! The export is the declarative chart description itself, meant for other
//! renderers or for diffing two datasets. Non-finite numbers are written as `null`.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::layout::GridView;

/// Pretty JSON for a grid.
pub fn grid_json(grid: &GridView) -> Result<String, AppError> {
    serde_json::to_string_pretty(grid)
        .map_err(|e| AppError::render(format!("Failed to serialize charts: {e}")))
}

/// Write a grid to a JSON file.
pub fn write_grid_json(path: &Path, grid: &GridView) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, grid)
        .map_err(|e| AppError::render(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{plan_grid, session_from_report};
    use crate::io::ingest::parse_csv;

    #[test]
    fn json_carries_layout_and_series() {
        let csv = "politician/institution,date,answer,pct_estimate,lo,hi\nA,2024-01-01,Approve,50,45,55\nA,2024-02-01,Approve,x,47,57\n";
        let session = session_from_report(parse_csv(csv.as_bytes(), "test").unwrap());
        let grid = plan_grid(&session.state, &[]);
        let value: serde_json::Value = serde_json::from_str(&grid_json(&grid).unwrap()).unwrap();

        assert_eq!(value["columns"], 2);
        let chart = &value["charts"][0];
        assert_eq!(chart["title"], "A");
        assert_eq!(chart["y_domain"][1], 57.0);
        assert_eq!(chart["x_domain"][0], "2024-01-01");
        assert_eq!(chart["series"][0]["color"], "#4CAF50");
        assert!(chart["series"][0]["points"][1]["pct_estimate"].is_null());
    }
}
