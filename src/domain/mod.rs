//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - dataset rows (`Observation`) and per-answer groupings (`Series`)
//! - the immutable session dataset (`Dataset`) and its pure derivations
//! - resolved run configuration (`ViewConfig`, `DataSource`, `ChartGeometry`)

pub mod dataset;
pub mod types;

pub use dataset::*;
pub use types::*;
