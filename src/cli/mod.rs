//! Command-line parsing for the performance dashboard.
//!
//! Argument parsing and command dispatch stay separate from the loading and
//! shaping code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{
    DEFAULT_COMPACT_YEARS, DEFAULT_DEPTH_BUCKET_PCT, DEFAULT_HEAT_MAX, DEFAULT_RECOVERY_BUCKET_DAYS,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Terminal dashboard for strategy performance data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (the default).
    Tui(TuiArgs),
    /// Load one view and print a text summary.
    Show(ShowArgs),
    /// Load one view and write its shaped rows as JSON.
    Export(ExportArgs),
    /// Print the route table.
    Routes,
}

/// Options shared by every data-loading command.
#[derive(Debug, Parser, Clone)]
pub struct DashArgs {
    /// Base URL (http/https) or directory holding the JSON resources.
    /// Falls back to DASH_SOURCE, then `public`.
    #[arg(short = 's', long)]
    pub source: Option<String>,

    /// Recovery histogram bucket width, in days.
    #[arg(long, default_value_t = DEFAULT_RECOVERY_BUCKET_DAYS)]
    pub recovery_bucket: f64,

    /// Drawdown-depth bucket width, in percentage points.
    #[arg(long, default_value_t = DEFAULT_DEPTH_BUCKET_PCT)]
    pub depth_bucket: f64,

    /// Heatmap color domain half-width (0.10 = ±10%).
    #[arg(long, default_value_t = DEFAULT_HEAT_MAX)]
    pub heat_max: f64,

    /// Years shown by the compact heatmap.
    #[arg(long, default_value_t = DEFAULT_COMPACT_YEARS)]
    pub compact_years: usize,

    /// Overlay the S&P 500 benchmark where a view has one.
    #[arg(short = 'b', long)]
    pub benchmark: bool,

    /// Append logs to this file (the dashboard never logs to the terminal).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for the interactive dashboard.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Route to open first (`/` redirects to /equity).
    #[arg(long, default_value = "/")]
    pub view: String,

    #[command(flatten)]
    pub dash: DashArgs,
}

/// Options for a text report.
#[derive(Debug, Parser, Clone)]
pub struct ShowArgs {
    /// Route, e.g. `/drawdown` or `monthly`.
    pub view: String,

    #[command(flatten)]
    pub dash: DashArgs,
}

/// Options for a JSON export.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Route, e.g. `/recovery`.
    pub view: String,

    /// Output file; `-` writes to stdout.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: PathBuf,

    #[command(flatten)]
    pub dash: DashArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_shared_flags() {
        let cli = Cli::parse_from([
            "dash",
            "show",
            "/recovery",
            "--source",
            "http://localhost:8000",
            "--recovery-bucket",
            "5",
            "-b",
        ]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.view, "/recovery");
        assert_eq!(args.dash.source.as_deref(), Some("http://localhost:8000"));
        assert_eq!(args.dash.recovery_bucket, 5.0);
        assert_eq!(args.dash.depth_bucket, DEFAULT_DEPTH_BUCKET_PCT);
        assert!(args.dash.benchmark);
    }

    #[test]
    fn export_requires_out() {
        assert!(Cli::try_parse_from(["dash", "export", "/monthly"]).is_err());
        let cli = Cli::try_parse_from(["dash", "export", "/monthly", "--out", "m.json"]).unwrap();
        assert!(matches!(cli.command, Command::Export(_)));
    }

    #[test]
    fn tui_defaults_to_root_route() {
        let cli = Cli::parse_from(["dash", "tui"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(args.view, "/");
        assert_eq!(args.dash.compact_years, DEFAULT_COMPACT_YEARS);
    }
}
