//! Command-line argument definitions for the c4c CLI.
//!
//! [`Args`] is parsed from the command line with [`clap`]. Arguments select
//! the entry file, where the JSON goes, the configuration file and the
//! logging verbosity.

use clap::Parser;

/// Command-line arguments for the c4c compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the entry workspace file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
