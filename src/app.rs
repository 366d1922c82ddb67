//! Top-level application orchestration.
//!
//! `src/main.rs` is tiny; this module is the "real main" that:
//! - parses CLI arguments and validates them into a `DashConfig`
//! - sets up logging
//! - dispatches to the dashboard, a text report, an export or the route table

use clap::Parser;

use crate::cli::{Command, DashArgs, ExportArgs, ShowArgs, TuiArgs};
use crate::domain::{DashConfig, ShapeOptions};
use crate::error::AppError;
use crate::views::{ViewKind, spec_for};

pub mod pipeline;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // `dash` and `dash --source x` behave like `dash tui ...`. Clap needs a
    // subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Show(args) => handle_show(args),
        Command::Export(args) => handle_export(args),
        Command::Routes => {
            print!("{}", crate::report::format_routes());
            Ok(())
        }
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.dash)?;
    crate::logging::init(crate::logging::target(config.log_file.as_deref(), true))?;
    let start = parse_view(&args.view)?;
    crate::tui::run(config, start)
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.dash)?;
    crate::logging::init(crate::logging::target(config.log_file.as_deref(), false))?;
    let spec = spec_for(parse_view(&args.view)?);

    let fetcher = crate::data::fetcher_for(&config.source)?;
    let output = pipeline::load_view(fetcher.as_ref(), &spec, &config.shape);

    println!("{}", crate::report::format_view_report(&spec, &output, &config.shape));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.dash)?;
    crate::logging::init(crate::logging::target(config.log_file.as_deref(), false))?;
    let spec = spec_for(parse_view(&args.view)?);

    let fetcher = crate::data::fetcher_for(&config.source)?;
    let output = pipeline::load_view(fetcher.as_ref(), &spec, &config.shape);
    crate::io::export::write_view_json(&args.out, &spec, &output, &config.shape)
}

/// Resolve a route argument, redirecting `/` to the default view.
pub fn parse_view(path: &str) -> Result<ViewKind, AppError> {
    ViewKind::from_path(path).ok_or_else(|| {
        let known: Vec<&str> = ViewKind::ALL.iter().map(|k| k.path()).collect();
        AppError::new(2, format!("Unknown view '{path}'. Known views: {}", known.join(", ")))
    })
}

pub fn dash_config_from_args(args: &DashArgs) -> Result<DashConfig, AppError> {
    let shape = ShapeOptions::from_raw(
        args.recovery_bucket,
        args.depth_bucket,
        args.heat_max,
        args.compact_years,
        args.benchmark,
    )?;
    Ok(DashConfig {
        source: crate::data::resolve_source(args.source.as_deref()),
        shape,
        log_file: args.log_file.clone(),
    })
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                      -> `dash tui`
/// - `dash --source x ...`       -> `dash tui --source x ...`
/// - `dash --help/--version/-h`  -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "export" | "routes");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_dashboard() {
        assert_eq!(rewrite_args(argv(&["dash"])), argv(&["dash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["dash", "--source", "data"])),
            argv(&["dash", "tui", "--source", "data"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        assert_eq!(rewrite_args(argv(&["dash", "routes"])), argv(&["dash", "routes"]));
        assert_eq!(rewrite_args(argv(&["dash", "--help"])), argv(&["dash", "--help"]));
    }

    #[test]
    fn unknown_view_is_usage_error() {
        assert_eq!(parse_view("/").unwrap(), ViewKind::Equity);
        let err = parse_view("/nowhere").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("/mobileheatmap"));
    }

    #[test]
    fn invalid_bucket_width_is_rejected() {
        let cli = crate::cli::Cli::parse_from(["dash", "show", "/recovery", "--recovery-bucket", "0", "-s", "x"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        let err = dash_config_from_args(&args.dash).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn explicit_source_wins() {
        let cli = crate::cli::Cli::parse_from(["dash", "show", "/monthly", "--source", "fixtures"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        let config = dash_config_from_args(&args.dash).unwrap();
        assert_eq!(config.source, "fixtures");
        assert!(!config.shape.show_benchmark);
    }
}
