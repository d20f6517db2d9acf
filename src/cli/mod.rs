//! Command-line parsing for the approval chart viewer.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading, layout, and rendering.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "approval", version, about = "Approval-rating trend charts from a CSV dataset")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal view (the default).
    Tui(DataArgs),
    /// Write one SVG chart per planned institution.
    Render(RenderArgs),
    /// Write the planned grid (layout + chart descriptions) as JSON.
    Export(ExportArgs),
    /// Print a summary of the dataset and of any malformed rows.
    Summary(DataArgs),
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// CSV file path or http(s) URL. Defaults to `APPROVAL_DATASET`, then
    /// `datasets/approval_averages.csv`.
    #[arg(short = 'd', long, value_name = "PATH|URL")]
    pub data: Option<String>,

    /// Institution to select initially (repeatable). Nothing selected means all.
    #[arg(short = 's', long = "select", value_name = "NAME")]
    pub select: Vec<String>,

    /// Log file used by the terminal view. Defaults to `APPROVAL_LOG`, then `approval.log`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for `approval render`.
#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output directory for the SVG files (created if missing).
    #[arg(short = 'o', long, value_name = "DIR", default_value = "charts")]
    pub out: PathBuf,

    /// Chart width in pixels, margins included.
    #[arg(long, default_value_t = 400)]
    pub width: u32,

    /// Chart height in pixels, margins included.
    #[arg(long, default_value_t = 300)]
    pub height: u32,
}

/// Options for `approval export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Destination JSON file; stdout when omitted.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: Option<PathBuf>,
}
