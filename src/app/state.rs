//! Session state shared by the layout controller and the filter panel.

use crate::chart::{ChartSpec, ColorMap};
use crate::domain::Dataset;

/// Built once after the dataset loads and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppState {
    dataset: Dataset,
    institutions: Vec<String>,
    colors: ColorMap,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        let institutions = dataset.institutions();
        let colors = ColorMap::from_answers(dataset.answers());
        Self {
            dataset,
            institutions,
            colors,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Institutions in first-seen order.
    pub fn institutions(&self) -> &[String] {
        &self.institutions
    }

    pub fn colors(&self) -> &ColorMap {
        &self.colors
    }

    pub fn chart(&self, institution: &str) -> ChartSpec {
        ChartSpec::build(self.dataset.observations(), institution, &self.colors)
    }
}
