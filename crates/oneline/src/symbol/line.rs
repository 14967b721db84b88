use log::{trace, warn};

use oneline_core::{
    backend::{Backend, Place},
    footprint::resistor::draw_resistor,
    geometry::{Point, axis_angle, reading_angle, rotate},
    route::Route,
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ElementKey, LineId},
    symbol::{Connection, Port, Seat, Symbol, invalid_switch, seat_stubs},
};

/// Label offset from a plain conductor
const PLAIN_LABEL_OFFSET: f32 = 0.2;

/// Label offset from a conductor carrying a resistor glyph
const IMPEDANCE_LABEL_OFFSET: f32 = 0.5;

/// How a line is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// A bare conductor
    #[default]
    Plain,
    /// A conductor with a resistor at its midpoint
    Impedance,
}

/// Parameters of a line between two buses.
///
/// # Examples
///
/// ```
/// # use oneline::{identifier::BusId, symbol::{LineSpec, LineStyle}};
/// # use oneline_core::geometry::Point;
/// let spec = LineSpec::new(BusId::new(0), BusId::new(1))
///     .with_text("NA2XS2Y 1x185 2.5 km")
///     .with_waypoints(vec![Point::new(2.0, 0.0)])
///     .with_style(LineStyle::Impedance);
/// assert_eq!(spec.to_bus, BusId::new(1));
/// ```
#[derive(Debug, Clone)]
pub struct LineSpec {
    pub from_bus: BusId,
    pub to_bus: BusId,
    pub text: String,
    /// Intermediate points between the two bus ends
    pub waypoints: Vec<Point>,
    /// Explicit label anchor, overriding the computed one
    pub label_anchor: Option<Point>,
    pub style: LineStyle,
}

impl LineSpec {
    pub fn new(from_bus: BusId, to_bus: BusId) -> Self {
        Self {
            from_bus,
            to_bus,
            text: String::new(),
            waypoints: Vec::new(),
            label_anchor: None,
            style: LineStyle::Plain,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn with_label_anchor(mut self, anchor: Point) -> Self {
        self.label_anchor = Some(anchor);
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }
}

/// A line or cable drawn along its route.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    from_bus: BusId,
    to_bus: BusId,
    route: Route,
    style: LineStyle,
    label: TextBlock,
}

impl Line {
    /// Routes `spec` from the `from` port through its waypoints to the
    /// `to` port.
    pub fn new(id: LineId, spec: LineSpec, from: Port, to: Port, layout: &LayoutConfig) -> Self {
        let start = from.point;
        let end = to.point;

        let mut points = Vec::with_capacity(spec.waypoints.len() + 2);
        points.push(start);
        points.extend_from_slice(&spec.waypoints);
        points.push(end);
        let route = Route::new(points).unwrap_or_else(|| {
            warn!(line = id.index(); "Line route collapses to a point");
            Route::straight(start, end)
        });

        let offset = match spec.style {
            LineStyle::Plain => PLAIN_LABEL_OFFSET,
            LineStyle::Impedance => IMPEDANCE_LABEL_OFFSET,
        };
        let (mid, index) = route.halfway();
        let (a, b) = route.segment(index);
        let angle = reading_angle(a, b);
        let anchor = spec
            .label_anchor
            .unwrap_or_else(|| rotate(mid.add_point(Point::new(0.0, offset)), mid, angle));
        let label = TextBlock::new(vec![spec.text], anchor)
            .with_angle(angle)
            .with_max_len(layout.line_row_length)
            .with_size(layout.text_size)
            .with_place(Place::C);

        Self {
            id,
            from_bus: spec.from_bus,
            to_bus: spec.to_bus,
            route,
            style: spec.style,
            label,
        }
    }

    pub fn id(&self) -> LineId {
        self.id
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn from_bus(&self) -> BusId {
        self.from_bus
    }

    pub fn to_bus(&self) -> BusId {
        self.to_bus
    }

    /// Draws the conductor of an impedance line with a resistor halfway.
    fn draw_with_resistor(backend: &mut dyn Backend, main: Vec<Point>) {
        let Some(conductor) = Route::new(main.clone()) else {
            backend.lines(&main, false);
            return;
        };
        let (mid, index) = conductor.halfway();
        let (a, b) = conductor.segment(index);
        let stubs = draw_resistor(backend, mid, axis_angle(a, b));
        let (before, after) = conductor.cut(index, stubs);
        backend.lines(&before, false);
        backend.lines(&after, false);
    }
}

impl Connection for Line {
    fn key(&self) -> ElementKey {
        ElementKey::Line(self.id)
    }

    fn get_coords_switch(&self, bus: BusId, offset: f32) -> Result<Seat, OnelineError> {
        if bus == self.from_bus {
            Ok(Seat::at_route_start(&self.route, offset))
        } else if bus == self.to_bus {
            Ok(Seat::at_route_end(&self.route, offset))
        } else {
            Err(invalid_switch(self.key(), bus))
        }
    }
}

impl Symbol for Line {
    fn category(&self) -> Category {
        Category::Line
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        let key = self.key();
        let at_start = seat_stubs(diagram, key, self.from_bus);
        let at_end = if self.to_bus == self.from_bus {
            None
        } else {
            seat_stubs(diagram, key, self.to_bus)
        };
        trace!(
            line = self.id.index(),
            switched_start = at_start.is_some(),
            switched_end = at_end.is_some();
            "Drawing line"
        );

        let mut pieces = self.route.split(at_start, at_end);
        match self.style {
            LineStyle::Plain => {
                for piece in &pieces {
                    backend.lines(piece, false);
                }
            }
            LineStyle::Impedance => {
                let main_index = usize::from(at_start.is_some());
                let main = pieces.remove(main_index);
                for piece in &pieces {
                    backend.lines(piece, false);
                }
                Self::draw_with_resistor(backend, main);
            }
        }

        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.route.start(), self.route.end()]
    }
}
