//! Command-line interface.

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::backend::{Backend, StdioBackend};
use crate::error::{LensError, Result};
use crate::tui::{self, TuiOptions};

/// Browse AI-agent blame, edit timelines, and session transcripts.
#[derive(Debug, Parser)]
#[command(name = "blamelens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory to open on startup.
    #[arg(short, long, env = "BLAMELENS_PROJECT")]
    pub project: Option<String>,

    /// Command line spawning the desktop backend helper.
    #[arg(short, long, env = "BLAMELENS_BACKEND")]
    pub backend: Option<String>,

    /// Page size for timeline and transcript loads.
    #[arg(short, long, env = "BLAMELENS_LIMIT")]
    pub limit: Option<usize>,

    /// Count trace files and exit instead of launching the TUI.
    #[arg(long)]
    pub scan: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, default_value = "warn", env = "BLAMELENS_LOG_LEVEL")]
    pub log_level: LogLevel,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

impl LogLevel {
    /// Convert to a tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

fn init_logging(level: LogLevel) {
    // Logs go to stderr so they never corrupt the TUI on stdout.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("blamelens={}", level.to_filter_string())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse arguments and run.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    if cli.scan {
        return scan(&cli);
    }

    tui::run(TuiOptions {
        project: cli.project,
        backend_cmd: cli.backend,
        limit: cli.limit,
    })
}

fn scan(cli: &Cli) -> Result<()> {
    let Some(cmd) = cli.backend.as_deref() else {
        return Err(LensError::BackendUnavailable);
    };
    let backend = StdioBackend::spawn(cmd)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LensError::io("Failed to build async runtime", e))?;
    let result = rt.block_on(backend.scan_traces(cli.project.as_deref()))?;

    match result.trace_dir {
        Some(dir) => println!("{} trace files in {dir}", result.trace_count),
        None => println!("{} trace files", result.trace_count),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["blamelens"]);
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(cli.project.is_none());
        assert!(!cli.scan);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "blamelens",
            "--project",
            "/work/app",
            "--backend",
            "blamelens-backend --traces ~/.agent",
            "--limit",
            "25",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.project.as_deref(), Some("/work/app"));
        assert_eq!(cli.limit, Some(25));
        assert_eq!(cli.log_level, LogLevel::Debug);
    }
}
