//! `approval-charts` library crate.
//!
//! The binary (`approval`) is a thin wrapper around this library so that:
//!
//! - loading, filtering, and layout are testable without a terminal
//! - the TUI and the file renderers share one chart description (`chart::ChartSpec`)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod domain;
pub mod error;
pub mod filter;
pub mod io;
pub mod layout;
pub mod logging;
pub mod report;
pub mod tabs;
pub mod tui;
