//! The immutable in-memory dataset and the pure derivations over it.
//!
//! Nothing here caches: institution lists, per-institution subsets, and
//! per-answer groupings are recomputed from the loaded observations on demand.

use std::collections::HashSet;

use super::types::{Observation, Series};

/// All observations loaded for a session. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn institutions(&self) -> Vec<String> {
        extract_institutions(&self.observations)
    }

    /// Distinct answer categories in first-seen order.
    pub fn answers(&self) -> Vec<String> {
        first_seen(self.observations.iter().map(|o| o.answer.as_str()))
    }
}

/// Unique institutions in order of first occurrence.
pub fn extract_institutions(observations: &[Observation]) -> Vec<String> {
    first_seen(observations.iter().map(|o| o.institution.as_str()))
}

/// Observations belonging to `institution`, in input order.
pub fn subset(observations: &[Observation], institution: &str) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| o.institution == institution)
        .cloned()
        .collect()
}

/// Partition observations by answer (first-seen category order), each series sorted by date.
///
/// The sort is stable, so observations sharing a date keep their input order.
pub fn group_by_answer(observations: &[Observation]) -> Vec<Series> {
    let mut groups: Vec<Series> = Vec::new();
    for obs in observations {
        match groups.iter_mut().find(|s| s.answer == obs.answer) {
            Some(series) => series.points.push(obs.clone()),
            None => groups.push(Series {
                answer: obs.answer.clone(),
                points: vec![obs.clone()],
            }),
        }
    }
    for series in &mut groups {
        series.points.sort_by_key(|o| o.date);
    }
    groups
}

fn first_seen<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}
