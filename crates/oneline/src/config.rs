//! Diagram configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes.

use serde::Deserialize;

use oneline_core::text::TEXT_SIZE;

use crate::{OnelineError, color::Color};

/// Application configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Label content section
    #[serde(default)]
    pub labels: LabelConfig,

    /// Style configuration section
    #[serde(default)]
    pub style: StyleConfig,
}

/// Layout configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Label text height in diagram units
    pub text_size: f32,

    /// Row length of bus labels
    pub node_row_length: usize,

    /// Row length of line labels
    pub line_row_length: usize,

    /// Row length of transformer and impedance labels
    pub trafo_row_length: usize,

    /// Distance from a bus to the centre of a switch sitting on a connection
    pub switch_offset: f32,

    /// A bus with more incident elements than this is drawn as a busbar
    pub busbar_threshold: usize,

    /// Busbar length per incident element
    pub busbar_pitch: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            text_size: TEXT_SIZE,
            node_row_length: 10,
            line_row_length: 20,
            trafo_row_length: 6,
            switch_offset: 0.6,
            busbar_threshold: 3,
            busbar_pitch: 2.0,
        }
    }
}

/// Which optional rows labels carry
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Append the element index as `(n)`
    pub indexes: bool,

    /// Append the initial short-circuit current of buses that carry one
    pub short_circuit: bool,

    /// Append the voltage magnitude of buses that carry one
    pub voltage: bool,

    /// Draw lines as impedances labelled `r+jx Ohm`
    pub line_impedance: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            indexes: false,
            short_circuit: true,
            voltage: true,
            line_impedance: false,
        }
    }
}

/// Style configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color; transparent when unset
    background_color: Option<String>,

    stroke_color: String,

    text_color: String,

    /// Stroke width in pixels
    pub stroke_width: f32,

    pub font_family: String,

    /// Pixels per diagram unit
    pub scale: f32,

    /// Margin around the drawing in pixels
    pub margin: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            stroke_color: "black".to_string(),
            text_color: "black".to_string(),
            stroke_width: 1.5,
            font_family: "sans-serif".to_string(),
            scale: 50.0,
            margin: 20.0,
        }
    }
}

impl StyleConfig {
    /// Get the background color from configuration
    /// Returns None if no background color is configured
    pub fn background_color(&self) -> Result<Option<Color>, OnelineError> {
        self.background_color
            .as_deref()
            .map(Color::new)
            .transpose()
            .map_err(|err| OnelineError::Config(format!("Invalid background color: {err}")))
    }

    pub fn stroke_color(&self) -> Result<Color, OnelineError> {
        Color::new(&self.stroke_color)
            .map_err(|err| OnelineError::Config(format!("Invalid stroke color: {err}")))
    }

    pub fn text_color(&self) -> Result<Color, OnelineError> {
        Color::new(&self.text_color)
            .map_err(|err| OnelineError::Config(format!("Invalid text color: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            switch_offset = 0.8

            [labels]
            indexes = true

            [style]
            background_color = "white"
            "#,
        )
        .unwrap();

        assert_approx_eq!(f32, config.layout.switch_offset, 0.8);
        assert_eq!(config.layout.line_row_length, 20);
        assert!(config.labels.indexes);
        assert!(config.labels.voltage);
        assert!(config.style.background_color().unwrap().is_some());
        assert_approx_eq!(f32, config.style.scale, 50.0);
    }

    #[test]
    fn test_empty_config() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.layout.busbar_threshold, 3);
        assert!(config.style.background_color().unwrap().is_none());
    }

    #[test]
    fn test_invalid_color_is_config_error() {
        let config: AppConfig = toml::from_str("[style]\nstroke_color = \"nope\"").unwrap();
        assert!(matches!(config.style.stroke_color(), Err(OnelineError::Config(_))));
    }
}
