//! c4c CLI library
//!
//! This module contains the core CLI logic for the c4c compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use c4c::{C4cError, WorkspaceCompiler};

/// Run the c4c CLI application
///
/// Compiles the input workspace, with everything it includes, and writes
/// the JSON form to the output file or to standard output.
///
/// # Errors
///
/// Returns `C4cError` for:
/// - Configuration loading errors
/// - Lexing, parsing and include errors
/// - File I/O errors
/// - Serialization errors
pub fn run(args: &Args) -> Result<(), C4cError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Compiling workspace"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let compiler = WorkspaceCompiler::new(app_config);
    let workspace = compiler.compile(&args.input)?;
    let json = compiler.to_json(&workspace)?;

    match &args.output {
        Some(output) => {
            fs::write(output, json)?;
            info!(output_file = output.as_str(); "JSON exported successfully");
        }
        None => println!("{json}"),
    }

    Ok(())
}
