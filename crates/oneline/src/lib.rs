//! Oneline - single-line diagrams of electrical power networks.
//!
//! A network is described by per-category tables (buses with coordinates,
//! lines, switches, transformers, sources, shunts). Oneline resolves every
//! element against the buses it connects, places standard symbols and their
//! labels, and draws the result through an abstract backend. An SVG backend
//! ships with the crate.
//!
//! Symbols can also be registered one by one on a [`diagram::Diagram`] when
//! the network tables are not the right input.

pub mod color;
pub mod config;
pub mod diagram;
pub mod export;
pub mod identifier;
pub mod network;
pub mod symbol;

mod error;

pub use oneline_core::{backend, geometry};

pub use error::OnelineError;

use std::path::Path;

use log::{debug, info};

use backend::BackendError;
use config::AppConfig;
use diagram::Diagram;
use export::svg::SvgBuilder;
use network::Network;

/// Builder for laying out and rendering Oneline diagrams.
///
/// # Examples
///
/// ```rust
/// use oneline::{DiagramBuilder, network::Network};
///
/// let network: Network = toml::from_str(
///     r#"
///     [[bus]]
///     index = 0
///     name = "HV"
///     geo = { x = 0.0, y = 4.0 }
///
///     [[bus]]
///     index = 1
///     name = "LV"
///     geo = { x = 0.0, y = 0.0 }
///
///     [[line]]
///     index = 0
///     from_bus = 0
///     to_bus = 1
///     std_type = "NA2XS2Y"
///     length_km = 1.5
///     "#,
/// )
/// .expect("Failed to decode network");
///
/// let builder = DiagramBuilder::default();
/// let diagram = builder.build(&network).expect("Failed to build");
/// let svg = builder.render_svg(&diagram).expect("Failed to render");
/// assert!(svg.starts_with("<svg"));
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve a network description into a diagram.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError`] when a row references an element that does
    /// not exist, a bus has no coordinate, a switch does not sit at an end of
    /// its element, or an index is used twice.
    pub fn build(&self, network: &Network) -> Result<Diagram, OnelineError> {
        info!("Building diagram");
        let diagram = network.build_diagram(&self.config)?;
        debug!(symbols = diagram.len(); "Diagram built successfully");
        Ok(diagram)
    }

    /// Render a diagram to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError`] for invalid style colours or when a symbol
    /// fails to draw.
    pub fn render_svg(&self, diagram: &Diagram) -> Result<String, OnelineError> {
        let mut svg = SvgBuilder::new().with_style(&self.config.style).build()?;
        diagram.draw(&mut svg)?;

        let document = svg.into_document().ok_or_else(|| {
            OnelineError::Backend(BackendError::Render("document was not saved".to_string()))
        })?;

        info!("SVG rendered successfully");
        Ok(document)
    }

    /// Render a diagram and write the SVG document to `path`.
    ///
    /// Nothing is written when drawing fails.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError`] when rendering fails or the file cannot be
    /// written.
    pub fn render_to_file(
        &self,
        diagram: &Diagram,
        path: impl AsRef<Path>,
    ) -> Result<(), OnelineError> {
        let mut svg = SvgBuilder::new()
            .with_style(&self.config.style)
            .with_output(path)
            .build()?;
        diagram.draw(&mut svg)?;

        info!(output_file:? = svg.output(); "SVG exported successfully");
        Ok(())
    }
}
