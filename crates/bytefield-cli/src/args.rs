//! Command-line argument definitions for the bytefield CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, embedded output
//! mode, configuration file selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the bytefield diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram description, or '-' for standard input
    #[arg(default_value = "-")]
    pub input: String,

    /// Path to the output SVG file, or '-' for standard output
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Emit a bare <svg> element without an XML declaration, for inlining
    /// in another document
    #[arg(short, long)]
    pub embedded: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
