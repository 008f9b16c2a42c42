//! CLI definitions for the `fhembot` binary.
//!
//! Uses clap derive macros for argument parsing. Global flags control
//! verbosity, telemetry and where configuration and data live.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Menu-driven information assistant for the Fhemig hospital network.
#[derive(Parser)]
#[command(name = "fhembot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through the OpenTelemetry stdout exporter.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Configuration file (defaults to fhembot.toml in the data directory).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Data directory holding the session database and catalogs.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect to the chat platform and answer messages until interrupted.
    Serve,

    /// Validate configuration and catalogs, then exit.
    Check,
}

impl Cli {
    /// Map verbosity flags to a tracing filter directive. `RUST_LOG` still
    /// overrides whatever this returns.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,fhembot=debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn default_filter_is_warn() {
        let cli = parse(&["fhembot", "check"]);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn quiet_filter_is_error() {
        let cli = parse(&["fhembot", "--quiet", "check"]);
        assert_eq!(cli.log_filter(), "error");
    }

    #[test]
    fn verbose_enables_crate_debug() {
        let cli = parse(&["fhembot", "-v", "serve"]);
        assert_eq!(cli.log_filter(), "info,fhembot=debug");
    }

    #[test]
    fn double_verbose_is_trace() {
        let cli = parse(&["fhembot", "-vv", "serve"]);
        assert_eq!(cli.log_filter(), "trace");
    }

    #[test]
    fn verbose_wins_over_quiet() {
        let cli = parse(&["fhembot", "--quiet", "-v", "check"]);
        assert_eq!(cli.log_filter(), "info,fhembot=debug");
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = parse(&["fhembot", "serve", "--data-dir", "/tmp/zeca"]);
        assert_eq!(cli.data_dir.as_deref(), Some(std::path::Path::new("/tmp/zeca")));
        assert!(matches!(cli.command, Commands::Serve));

        let cli = parse(&["fhembot", "--config", "/etc/fhembot.toml", "check"]);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("/etc/fhembot.toml"))
        );
        assert!(matches!(cli.command, Commands::Check));
    }
}
