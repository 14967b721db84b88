//! Command-line arguments.
//!
//! Besides the input, output and configuration paths, [`Args`] carries
//! per-run overrides for the label toggles and a few layout values. They are
//! applied on top of whatever configuration file was found, see
//! [`Args::overrides`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

/// Renders a single-line diagram of a power network as SVG
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Network tables (TOML)
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Where the SVG drawing is written
    #[arg(short, long, value_name = "FILE", default_value = "out.svg")]
    pub output: PathBuf,

    /// Configuration file (TOML); searched for when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append the table index to every bus label
    #[arg(long)]
    pub indexes: bool,

    /// Show short-circuit currents on bus labels
    #[arg(long)]
    pub short_circuit: bool,

    /// Show load-flow voltages on bus labels
    #[arg(long)]
    pub voltage: bool,

    /// Label lines, transformers and external grids with their impedances
    #[arg(short = 'z', long)]
    pub impedance: bool,

    /// Incident elements above which a bus is drawn as a busbar
    #[arg(long, value_name = "COUNT")]
    pub busbar_threshold: Option<usize>,

    /// Spacing of the connection ports along a busbar
    #[arg(long, value_name = "UNITS")]
    pub busbar_pitch: Option<f32>,

    /// Distance of a switch from its bus along the connection
    #[arg(long, value_name = "UNITS")]
    pub switch_offset: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments for rendering `input` into `output` with everything else
    /// left at its default.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            config: None,
            indexes: false,
            short_circuit: false,
            voltage: false,
            impedance: false,
            busbar_threshold: None,
            busbar_pitch: None,
            switch_offset: None,
            log_level: "off".to_string(),
        }
    }

    /// Overrides requested on the command line.
    ///
    /// Label flags can only switch a label on; leaving a flag out keeps the
    /// configured value.
    pub fn overrides(&self) -> Overrides {
        let enable = |flag: bool| flag.then_some(true);
        Overrides {
            indexes: enable(self.indexes),
            short_circuit: enable(self.short_circuit),
            voltage: enable(self.voltage),
            line_impedance: enable(self.impedance),
            busbar_threshold: self.busbar_threshold,
            busbar_pitch: self.busbar_pitch,
            switch_offset: self.switch_offset,
        }
    }
}
