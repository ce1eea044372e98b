//! CLI logic for the bytefield diagram tool.
//!
//! Reads a diagram description from a file or standard input, renders it,
//! and writes the SVG to a file or standard output.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{Read, Write},
};

use log::info;

use bytefield::{BytefieldError, Generator, Options};

/// Run the bytefield CLI application
///
/// # Errors
///
/// Returns `BytefieldError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Evaluation and layout errors
pub fn run(args: &Args) -> Result<(), BytefieldError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        embedded = args.embedded;
        "Processing diagram"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = read_input(&args.input)?;

    let generator = Generator::new(app_config);
    let options = Options {
        embedded: args.embedded,
    };
    let svg = generator.generate(&source, &options)?;

    write_output(&args.output, &svg)?;

    info!(output = args.output; "SVG exported successfully");
    Ok(())
}

fn read_input(path: &str) -> std::io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        fs::read_to_string(path)
    }
}

fn write_output(path: &str, svg: &str) -> std::io::Result<()> {
    if path == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(svg.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    } else {
        fs::write(path, svg)
    }
}
