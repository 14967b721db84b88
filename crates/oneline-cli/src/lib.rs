//! Oneline CLI library
//!
//! Reads a network description, layers the configuration (defaults, file,
//! command-line overrides) and writes the rendered SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::{ConfigSource, Overrides};
pub use error_adapter::ErrorAdapter;

use std::fs;

use log::info;

use oneline::{DiagramBuilder, OnelineError, network::Network};

/// Run the Oneline CLI application
///
/// Reads the network description, builds the diagram and writes the
/// resulting SVG to the output file. Flags given on the command line take
/// precedence over the configuration file.
///
/// # Errors
///
/// Returns `OnelineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed network descriptions
/// - Unresolved references and invalid switch placements
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), OnelineError> {
    let input = args.input.display().to_string();
    let output = args.output.display().to_string();
    info!(input_path = input, output_path = output; "Processing network");

    let app_config = config::load_config(args.config.as_deref(), &args.overrides())?;

    let source = fs::read_to_string(&args.input)?;
    let network: Network = toml::from_str(&source)
        .map_err(|err| OnelineError::Network(format!("Failed to parse {input}: {err}")))?;

    let builder = DiagramBuilder::new(app_config);
    let diagram = builder.build(&network)?;
    builder.render_to_file(&diagram, &args.output)?;

    info!(output_file = output; "SVG exported successfully");

    Ok(())
}
