//! SVG backend.
//!
//! [`Svg`] implements [`Backend`] by recording every call and turning the
//! recording into one document on [`Backend::save`]. Diagram coordinates are
//! y-up and unit-less; the document maps them to pixels with
//! [`StyleConfig::scale`] and flips the y axis, so the drawing keeps its
//! orientation:
//!
//! ```text
//! px = (x - min_x) * scale + margin
//! py = (max_y - y) * scale + margin
//! ```
//!
//! The extent is taken from everything drawn, labels included. Output goes
//! to a file when one was configured with [`SvgBuilder::with_output`] and is
//! kept in memory either way.

mod layer;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, trace};
use svg::{Document, node::element as svg_element};

use oneline_core::{
    backend::{Backend, BackendError, Circle, DrawCall, Label},
    geometry::{Bounds, Point},
};

use crate::{OnelineError, color::Color, config::StyleConfig};

/// Approximate advance of one character relative to the text height
const CHAR_WIDTH: f32 = 0.6;

macro_rules! apply_stroke {
    ($element:expr, $svg:expr) => {
        $element
            .set("stroke", &$svg.stroke_color)
            .set("stroke-opacity", $svg.stroke_color.alpha())
            .set("stroke-width", $svg.stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round")
    };
}

/// Builder for [`Svg`].
///
/// # Examples
///
/// ```
/// use oneline::{config::StyleConfig, export::svg::SvgBuilder};
///
/// let style = StyleConfig::default();
/// let svg = SvgBuilder::new().with_style(&style).build().unwrap();
/// assert!(svg.document().is_none());
/// ```
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    style: Option<&'a StyleConfig>,
    output: Option<PathBuf>,
}

impl<'a> SvgBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    /// Writes the document to `path` on save
    pub fn with_output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    /// Resolves the style colours and creates the backend.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::Config`] when a colour of the style is not a
    /// valid CSS colour.
    pub fn build(self) -> Result<Svg, OnelineError> {
        let style = self.style.cloned().unwrap_or_default();

        Ok(Svg {
            output: self.output,
            stroke_color: style.stroke_color()?,
            text_color: style.text_color()?,
            background_color: style.background_color()?,
            stroke_width: style.stroke_width,
            font_family: style.font_family,
            scale: style.scale,
            margin: style.margin,
            calls: Vec::new(),
            document: None,
        })
    }
}

/// Maps diagram coordinates onto document pixels.
#[derive(Debug, Clone, Copy)]
struct Frame {
    min_x: f32,
    max_y: f32,
    scale: f32,
    margin: f32,
}

impl Frame {
    fn map(&self, point: Point) -> (f32, f32) {
        (
            (point.x() - self.min_x) * self.scale + self.margin,
            (self.max_y - point.y()) * self.scale + self.margin,
        )
    }
}

/// SVG drawing surface.
#[derive(Debug)]
pub struct Svg {
    output: Option<PathBuf>,
    stroke_color: Color,
    text_color: Color,
    background_color: Option<Color>,
    stroke_width: f32,
    font_family: String,
    scale: f32,
    margin: f32,
    calls: Vec<DrawCall>,
    document: Option<String>,
}

impl Svg {
    /// Target file, if any
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// The document produced by the last save
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn into_document(self) -> Option<String> {
        self.document
    }

    /// Extent of everything recorded so far, in diagram units.
    fn bounds(&self) -> Option<Bounds> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Circle(circle) => Some(Bounds::around(circle.center, circle.radius)),
                DrawCall::Lines { points, .. } => {
                    let (first, rest) = points.split_first()?;
                    let bounds = rest
                        .iter()
                        .fold(Bounds::from_point(*first), |bounds, point| bounds.include(*point));
                    Some(bounds)
                }
                DrawCall::Label(label) => Some(label_bounds(label)),
                DrawCall::Save => None,
            })
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    fn render(&self) -> Document {
        let bounds = self.bounds().unwrap_or_default();
        let frame = Frame {
            min_x: bounds.min_x(),
            max_y: bounds.max_y(),
            scale: self.scale,
            margin: self.margin,
        };
        let width = bounds.width().mul_add(self.scale, self.margin * 2.0);
        let height = bounds.height().mul_add(self.scale, self.margin * 2.0);
        debug!("SVG dimensions: {width}x{height}");

        let mut output = LayeredOutput::new();

        if let Some(color) = &self.background_color {
            let background = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", width)
                .set("height", height)
                .set("fill", color)
                .set("fill-opacity", color.alpha());
            output.add_to_layer(RenderLayer::Background, Box::new(background));
        }

        for call in &self.calls {
            match call {
                DrawCall::Circle(circle) => {
                    output.add_to_layer(RenderLayer::Symbol, self.render_circle(circle, &frame));
                }
                DrawCall::Lines { points, cycle } => {
                    output.merge(self.render_lines(points, *cycle, &frame));
                }
                DrawCall::Label(label) => {
                    output.add_to_layer(RenderLayer::Text, self.render_label(label, &frame));
                }
                DrawCall::Save => {}
            }
        }

        let mut doc = Document::new()
            .set("viewBox", (0.0, 0.0, width, height))
            .set("width", width)
            .set("height", height);
        for node in output.render() {
            doc = doc.add(node);
        }
        doc
    }

    fn render_circle(&self, circle: &Circle, frame: &Frame) -> SvgNode {
        let (cx, cy) = frame.map(circle.center);
        let radius = circle.radius * self.scale;
        let fill = if circle.filled {
            self.stroke_color.to_string()
        } else {
            "none".to_string()
        };

        match circle.arc.filter(|arc| arc.sweep() < 360.0) {
            None => {
                let element = svg_element::Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", radius);
                Box::new(apply_stroke!(element, self).set("fill", fill))
            }
            Some(arc) => {
                let (sx, sy) = frame.map(on_circle(circle.center, circle.radius, arc.start));
                let (ex, ey) = frame.map(on_circle(circle.center, circle.radius, arc.end));
                let large = u8::from(arc.sweep() > 180.0);
                // Counter-clockwise in y-up is the negative sweep direction once flipped
                let data = format!("M {sx} {sy} A {radius} {radius} 0 {large} 0 {ex} {ey}");
                let element = svg_element::Path::new().set("d", data);
                Box::new(apply_stroke!(element, self).set("fill", fill))
            }
        }
    }

    fn render_lines(&self, points: &[Point], cycle: bool, frame: &Frame) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        if points.len() < 2 {
            trace!(points = points.len(); "Skipping degenerate polyline");
            return output;
        }

        let coords = points
            .iter()
            .map(|point| {
                let (x, y) = frame.map(*point);
                format!("{x},{y}")
            })
            .collect::<Vec<_>>()
            .join(" ");

        if cycle {
            let element = svg_element::Polygon::new().set("points", coords);
            output.add_to_layer(
                RenderLayer::Symbol,
                Box::new(apply_stroke!(element, self).set("fill", "none")),
            );
        } else {
            let element = svg_element::Polyline::new().set("points", coords);
            output.add_to_layer(
                RenderLayer::Wiring,
                Box::new(apply_stroke!(element, self).set("fill", "none")),
            );
        }
        output
    }

    fn render_label(&self, label: &Label, frame: &Frame) -> SvgNode {
        let (x, y) = frame.map(label.position);

        let anchor = if label.place.is_east() {
            "start"
        } else if label.place.is_west() {
            "end"
        } else {
            "middle"
        };
        let baseline = if label.place.is_north() {
            "text-after-edge"
        } else if label.place.is_south() {
            "text-before-edge"
        } else {
            "central"
        };

        let mut text = svg_element::Text::new(label.text.as_str())
            .set("x", x)
            .set("y", y)
            .set("text-anchor", anchor)
            .set("dominant-baseline", baseline)
            .set("font-family", self.font_family.as_str())
            .set("font-size", label.size * self.scale)
            .set("fill", &self.text_color)
            .set("fill-opacity", self.text_color.alpha());

        if label.angle != 0.0 {
            // SVG rotates clockwise
            text = text.set("transform", format!("rotate({} {x} {y})", -label.angle));
        }

        Box::new(text)
    }
}

impl Backend for Svg {
    fn circle(&mut self, circle: Circle) {
        self.calls.push(DrawCall::Circle(circle));
    }

    fn lines(&mut self, points: &[Point], cycle: bool) {
        self.calls.push(DrawCall::Lines {
            points: points.to_vec(),
            cycle,
        });
    }

    fn label(&mut self, label: Label) {
        self.calls.push(DrawCall::Label(label));
    }

    fn save(&mut self) -> Result<(), BackendError> {
        let document = self.render().to_string();
        debug!(calls = self.calls.len(); "SVG document rendered");

        if let Some(path) = &self.output {
            write_document(path, &document)?;
        }

        self.document = Some(document);
        Ok(())
    }
}

/// Point on the circle around `center` at `degrees` counter-clockwise from +x.
fn on_circle(center: Point, radius: f32, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    center.add_point(Point::new(radius * cos, radius * sin))
}

/// Estimated extent of a label row.
///
/// Glyph widths are not measured; each character counts as
/// [`CHAR_WIDTH`] times the text height.
fn label_bounds(label: &Label) -> Bounds {
    let width = label.text.chars().count() as f32 * label.size * CHAR_WIDTH;
    let height = label.size;
    let position = label.position;

    if label.angle != 0.0 {
        return Bounds::around(position, width.max(height));
    }

    let (min_x, max_x) = if label.place.is_east() {
        (position.x(), position.x() + width)
    } else if label.place.is_west() {
        (position.x() - width, position.x())
    } else {
        (position.x() - width / 2.0, position.x() + width / 2.0)
    };
    let (min_y, max_y) = if label.place.is_north() {
        (position.y(), position.y() + height)
    } else if label.place.is_south() {
        (position.y() - height, position.y())
    } else {
        (position.y() - height / 2.0, position.y() + height / 2.0)
    };

    Bounds::from_point(Point::new(min_x, min_y)).include(Point::new(max_x, max_y))
}

fn write_document(path: &Path, document: &str) -> Result<(), BackendError> {
    let file_name = path.display().to_string();
    info!(file_name = file_name; "Writing SVG file");

    fs::write(path, document).map_err(|err| {
        error!(file_name = file_name, err:err; "Failed to write SVG file");
        BackendError::Io(err)
    })
}

#[cfg(test)]
mod tests {
    use oneline_core::backend::{ArcSpan, Place};

    use super::*;
    use crate::config::AppConfig;

    fn svg() -> Svg {
        SvgBuilder::new().build().unwrap()
    }

    #[test]
    fn test_empty_drawing_is_margin_only() {
        let mut svg = svg();
        svg.save().unwrap();

        let document = svg.document().unwrap();
        assert!(document.contains("width=\"40\""));
        assert!(document.contains("height=\"40\""));
    }

    #[test]
    fn test_y_axis_is_flipped() {
        let mut svg = svg();
        svg.lines(&[Point::new(0.0, 0.0), Point::new(0.0, 2.0)], false);
        svg.save().unwrap();

        // scale 50, margin 20: the upper end is at the top of the page
        let document = svg.document().unwrap();
        assert!(document.contains("points=\"20,120 20,20\""), "{document}");
    }

    #[test]
    fn test_arc_becomes_path() {
        let mut svg = svg();
        svg.circle(Circle::new(Point::new(0.0, 0.0), 1.0).with_arc(ArcSpan::new(0.0, 270.0)));
        svg.circle(Circle::new(Point::new(3.0, 0.0), 0.1).filled());
        svg.save().unwrap();

        let document = svg.into_document().unwrap();
        assert!(document.contains("<path"));
        assert!(document.contains(" 1 0 "), "large arc flag expected: {document}");
        assert!(document.contains("<circle"));
    }

    #[test]
    fn test_labels_render_above_wiring() {
        let mut svg = svg();
        svg.label(
            Label::new(Point::new(1.0, 1.0), "B1", 0.2)
                .with_place(Place::E)
                .with_angle(90.0),
        );
        svg.lines(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0)], false);
        svg.save().unwrap();

        let document = svg.document().unwrap();
        let wiring = document.find("data-layer=\"wiring\"").unwrap();
        let text = document.find("data-layer=\"text\"").unwrap();
        assert!(wiring < text);
        assert!(document.contains("text-anchor=\"start\""));
        assert!(document.contains("rotate(-90"));
        assert!(document.contains("B1"));
    }

    #[test]
    fn test_background_from_style() {
        let config: AppConfig = toml::from_str("[style]\nbackground_color = \"white\"").unwrap();
        let mut svg = SvgBuilder::new().with_style(&config.style).build().unwrap();
        svg.lines(&[Point::new(0.0, 0.0), Point::new(1.0, 0.0)], false);
        svg.save().unwrap();

        assert!(svg.document().unwrap().contains("data-layer=\"background\""));
    }

    #[test]
    fn test_invalid_style_color() {
        let config: AppConfig = toml::from_str("[style]\ntext_color = \"nope\"").unwrap();
        let result = SvgBuilder::new().with_style(&config.style).build();
        assert!(matches!(result, Err(OnelineError::Config(_))));
    }

    #[test]
    fn test_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");

        let mut svg = SvgBuilder::new().with_output(&path).build().unwrap();
        svg.lines(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)], false);
        svg.save().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Some(written.as_str()), svg.document());
    }

    #[test]
    fn test_unwritable_output_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.svg");

        let mut svg = SvgBuilder::new().with_output(&path).build().unwrap();
        assert!(matches!(svg.save(), Err(BackendError::Io(_))));
        assert!(svg.document().is_none());
    }
}
