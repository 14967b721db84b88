//! Diagram symbols.
//!
//! A symbol is one network element placed on the diagram. It resolves its
//! geometry from the buses it connects when it is created, and emits its
//! footprint and label when drawn.
//!
//! All symbols implement [`Symbol`]. Elements that carry a connection a
//! switch can sit on (lines and transformer leads) also implement
//! [`Connection`]: they compute the switch seat and, when drawn, split their
//! own conductors around the switches registered on their ends.

mod bus;
mod impedance;
mod line;
mod shunt;
mod source;
mod switch;
mod transformer;
mod transformer3w;

pub use bus::{BusSymbol, Busbar, Node, Port};
pub use impedance::Impedance;
pub use line::{Line, LineSpec, LineStyle};
pub use shunt::Shunt;
pub use source::{ExtGrid, Generator};
pub use switch::{Switch, SwitchPlacement, SwitchSpec};
pub use transformer::{Transformer, TransformerSpec, TransformerStyle};
pub use transformer3w::{Transformer3w, Transformer3wSpec};

use std::fmt;

use oneline_core::{
    backend::Backend,
    footprint::{Stubs, switch::switch_stubs},
    geometry::Point,
    route::Route,
    text::TextBlock,
};

use crate::{
    OnelineError,
    diagram::Diagram,
    identifier::{BusId, Category, ElementKey},
};

/// Common interface of every drawable element.
pub trait Symbol: fmt::Debug {
    fn category(&self) -> Category;

    /// Row index within the category
    fn index(&self) -> usize;

    /// Emits the footprint, connecting conductors and label.
    ///
    /// `diagram` is consulted for switches sitting on this symbol's
    /// connections.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError`] when a registered neighbour cannot be
    /// resolved.
    fn draw(&self, diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError>;

    /// The label drawn next to the symbol
    fn label(&self) -> &TextBlock;

    /// Points where other symbols attach
    fn connection_points(&self) -> Vec<Point>;
}

/// Where a switch sits on a connection.
///
/// `angle` points along the connection away from the bus, so the switch's
/// `start` stub faces the bus.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seat {
    pub center: Point,
    pub angle: f32,
}

impl Seat {
    /// Seat `offset` units into the route from its start
    pub fn at_route_start(route: &Route, offset: f32) -> Self {
        Self {
            center: route.from_start(offset),
            angle: route.start_angle(),
        }
    }

    /// Seat `offset` units into the route from its end
    pub fn at_route_end(route: &Route, offset: f32) -> Self {
        Self {
            center: route.from_end(offset),
            angle: route.end_angle(),
        }
    }

    pub fn stubs(&self) -> Stubs {
        switch_stubs(self.center, self.angle)
    }
}

/// An element whose conductors a switch can interrupt.
pub trait Connection {
    /// The key switches use to reference this element
    fn key(&self) -> ElementKey;

    /// Computes the seat of a switch between `bus` and this element,
    /// `offset` units from the bus along the conductor.
    ///
    /// # Errors
    ///
    /// Returns [`OnelineError::InvalidSwitchGeometry`] if `bus` is not one
    /// of this element's ends.
    fn get_coords_switch(&self, bus: BusId, offset: f32) -> Result<Seat, OnelineError>;
}

/// Stubs of the switch registered between `key` and `bus`, if any.
fn seat_stubs(diagram: &Diagram, key: ElementKey, bus: BusId) -> Option<Stubs> {
    diagram.switch_at(key, bus).map(Switch::stubs)
}

/// Draws a conductor route starting at `bus`, split around its switch.
fn draw_lead(
    diagram: &Diagram,
    backend: &mut dyn Backend,
    key: ElementKey,
    bus: BusId,
    route: &Route,
) {
    for piece in route.split(seat_stubs(diagram, key, bus), None) {
        backend.lines(&piece, false);
    }
}

fn invalid_switch(element: ElementKey, bus: BusId) -> OnelineError {
    OnelineError::InvalidSwitchGeometry { element, bus }
}
