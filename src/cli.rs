// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tscbuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tscbuild",
    version,
    about = "Incrementally compile TypeScript sources, optionally watching for changes.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Tscbuild.toml` in the current working directory, or
    /// built-in defaults if that file does not exist.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep running and recompile whenever sources change.
    #[arg(long)]
    pub watch: bool,

    /// Skip up-to-date files on the first build too (by default the first
    /// build recompiles everything).
    #[arg(long)]
    pub incremental: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TSCBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved options and compiler flags, then exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
