//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and `.env` defaults
//! - initialises logging
//! - loads the dataset once
//! - hands the session to the TUI or to a one-shot writer

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cli::{Command, DataArgs, ExportArgs, RenderArgs};
use crate::domain::{ChartGeometry, DataSource, ViewConfig};
use crate::error::AppError;
use crate::logging::LogTarget;

pub mod pipeline;
pub mod state;

/// Dataset used when neither `--data` nor `APPROVAL_DATASET` is set.
pub const DEFAULT_DATASET: &str = "datasets/approval_averages.csv";
/// TUI log file used when neither `--log-file` nor `APPROVAL_LOG` is set.
pub const DEFAULT_LOG_FILE: &str = "approval.log";

/// Entry point for the `approval` binary.
pub fn run() -> Result<(), AppError> {
    // `approval` and `approval -s Congress` behave like `approval tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    dotenvy::dotenv().ok();

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Render(args) => handle_render(args),
        Command::Export(args) => handle_export(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn handle_tui(args: DataArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args, ChartGeometry::default());
    crate::logging::init(LogTarget::File(&config.log_file))?;
    let session = pipeline::load_session(&config)?;
    crate::tui::run(session, &config)
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let geometry = ChartGeometry {
        width: args.width,
        height: args.height,
        ..ChartGeometry::default()
    };
    let config = view_config_from_args(&args.data, geometry);
    crate::logging::init(LogTarget::Stderr)?;

    let session = pipeline::load_session(&config)?;
    let grid = pipeline::plan_grid(&session.state, &config.initial_selection);
    let written = crate::io::svg::write_grid_svgs(&args.out, &grid, &config.geometry)?;
    for path in &written {
        println!("{}", path.display());
    }
    info!("wrote {} chart(s) to {}", written.len(), args.out.display());
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args.data, ChartGeometry::default());
    crate::logging::init(LogTarget::Stderr)?;

    let session = pipeline::load_session(&config)?;
    let grid = pipeline::plan_grid(&session.state, &config.initial_selection);
    match &args.out {
        Some(path) => {
            crate::io::export::write_grid_json(path, &grid)?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", crate::io::export::grid_json(&grid)?),
    }
    Ok(())
}

fn handle_summary(args: DataArgs) -> Result<(), AppError> {
    let config = view_config_from_args(&args, ChartGeometry::default());
    crate::logging::init(LogTarget::Stderr)?;

    let session = pipeline::load_session(&config)?;
    println!("{}", crate::report::format_summary(&session.report, &session.state));
    Ok(())
}

/// Resolve CLI flags against `.env` defaults.
pub fn view_config_from_args(args: &DataArgs, geometry: ChartGeometry) -> ViewConfig {
    let source = args
        .data
        .clone()
        .or_else(|| std::env::var("APPROVAL_DATASET").ok())
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());
    let log_file = args
        .log_file
        .clone()
        .or_else(|| std::env::var_os("APPROVAL_LOG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    ViewConfig {
        source: DataSource::parse(&source),
        initial_selection: args.select.clone(),
        geometry,
        log_file,
    }
}

/// Rewrite argv so `approval` defaults to `approval tui`.
///
/// Rules:
/// - `approval`                       -> `approval tui`
/// - `approval -s Congress ...`       -> `approval tui -s Congress ...`
/// - `approval --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "export" | "summary");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_the_tui() {
        assert_eq!(rewrite_args(argv(&["approval"])), argv(&["approval", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["approval", "-s", "Congress"])),
            argv(&["approval", "tui", "-s", "Congress"])
        );
        assert_eq!(
            rewrite_args(argv(&["approval", "summary"])),
            argv(&["approval", "summary"])
        );
        assert_eq!(rewrite_args(argv(&["approval", "--help"])), argv(&["approval", "--help"]));
    }

    #[test]
    fn explicit_flags_win_over_defaults() {
        let args = DataArgs {
            data: Some("https://example.org/x.csv".to_string()),
            select: vec!["Congress".to_string()],
            log_file: Some(PathBuf::from("x.log")),
        };
        let config = view_config_from_args(&args, ChartGeometry::default());
        assert_eq!(config.source, DataSource::Url("https://example.org/x.csv".to_string()));
        assert_eq!(config.initial_selection, vec!["Congress"]);
        assert_eq!(config.log_file, PathBuf::from("x.log"));
    }
}
