//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - chart-description JSON export (`export`)
//! - SVG chart files (`svg`)

pub mod export;
pub mod ingest;
pub mod svg;

pub use export::*;
pub use ingest::*;
pub use svg::*;
