//! Generator footprint.

use crate::{
    backend::{Backend, Circle, Label, Place},
    footprint::NODE_RADIUS,
    geometry::Point,
    text::TEXT_SIZE,
};

/// Radius of the machine circle.
pub const MACHINE_RADIUS: f32 = NODE_RADIUS * 4.0;

/// Draws a rotating machine hanging below the bus point `bus`.
///
/// Emits the drop lead, the machine circle and the `G` / `~` glyphs inside
/// it. Returns the machine centre.
pub fn draw_generator(backend: &mut dyn Backend, bus: Point) -> Point {
    let center = machine_center(bus);

    backend.lines(
        &[
            bus.add_point(Point::new(0.0, -NODE_RADIUS)),
            bus.add_point(Point::new(0.0, -MACHINE_RADIUS)),
        ],
        false,
    );
    backend.circle(Circle::new(center, MACHINE_RADIUS));
    backend.label(Label::new(center, "G", TEXT_SIZE).with_place(Place::C));
    backend.label(Label::new(center, "~", TEXT_SIZE).with_place(Place::S));

    center
}

/// Centre of the machine circle hanging below `bus`
pub fn machine_center(bus: Point) -> Point {
    bus.add_point(Point::new(0.0, -MACHINE_RADIUS * 2.0))
}

/// Anchor of the generator label, east of the machine.
pub fn label_anchor(center: Point) -> Point {
    center.add_point(Point::new(NODE_RADIUS + MACHINE_RADIUS, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;

    #[test]
    fn test_generator_glyphs() {
        let mut backend = RecordingBackend::new();
        let center = draw_generator(&mut backend, Point::new(2.0, 0.0));

        assert!(center.approx_eq(Point::new(2.0, -0.8), 1e-6));
        let texts: Vec<_> = backend.labels().map(|label| label.text.as_str()).collect();
        assert_eq!(texts, ["G", "~"]);
        assert_eq!(backend.labels().nth(1).unwrap().place, Place::S);
        assert_eq!(backend.circles().count(), 1);
    }
}
