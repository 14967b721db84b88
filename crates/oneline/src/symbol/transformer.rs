use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::{
        reactor::draw_reactor,
        transformer::{self, RING_RADIUS, draw_transformer, transformer_stubs},
        winding::VectorGroup,
    },
    geometry::{Point, axis_angle},
    route::Route,
    text::TextBlock,
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ElementKey, TrafoId},
    symbol::{
        Connection, Port, Seat, Symbol, draw_lead, impedance::SeriesReactor, invalid_switch,
    },
};

/// How a transformer is drawn.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TransformerStyle {
    /// Two winding rings with vector group marks
    #[default]
    Windings,
    /// Its short-circuit impedance, as a series reactor
    Impedance,
}

/// Parameters of a two-winding transformer.
#[derive(Debug, Clone)]
pub struct TransformerSpec {
    pub hv_bus: BusId,
    pub lv_bus: BusId,
    /// Vector group code such as `Dyn11`
    pub vector_group: Option<String>,
    pub text: Vec<String>,
    pub style: TransformerStyle,
}

impl TransformerSpec {
    pub fn new(hv_bus: BusId, lv_bus: BusId) -> Self {
        Self {
            hv_bus,
            lv_bus,
            vector_group: None,
            text: Vec::new(),
            style: TransformerStyle::Windings,
        }
    }

    pub fn with_vector_group(mut self, code: impl Into<String>) -> Self {
        self.vector_group = Some(code.into());
        self
    }

    pub fn with_text(mut self, text: Vec<String>) -> Self {
        self.text = text;
        self
    }

    pub fn with_style(mut self, style: TransformerStyle) -> Self {
        self.style = style;
        self
    }
}

/// A two-winding transformer placed halfway between its buses.
///
/// The rings sit on the straight connection between the two bus points,
/// high voltage ring towards the high voltage bus. Each side has a lead from
/// its bus to the ring. In [`TransformerStyle::Impedance`] a reactor takes
/// the place of the rings.
#[derive(Debug, Clone)]
pub struct Transformer {
    id: TrafoId,
    hv_bus: BusId,
    lv_bus: BusId,
    center: Point,
    angle: f32,
    style: TransformerStyle,
    vector_group: Option<VectorGroup>,
    hv_lead: Route,
    lv_lead: Route,
    label: TextBlock,
}

impl Transformer {
    pub fn new(
        id: TrafoId,
        spec: TransformerSpec,
        hv: Port,
        lv: Port,
        layout: &LayoutConfig,
    ) -> Self {
        let (center, angle, hv_lead, lv_lead, anchor) = match spec.style {
            TransformerStyle::Windings => {
                let hv_start = hv.point.towards(lv.point, RING_RADIUS);
                let lv_start = lv.point.towards(hv.point, RING_RADIUS);
                let center = hv_start.midpoint(lv_start);
                let angle = axis_angle(lv_start, hv_start);

                let stubs = transformer_stubs(center, angle);
                (
                    center,
                    angle,
                    Route::straight(hv.point, stubs.start),
                    Route::straight(lv.point, stubs.end),
                    transformer::label_anchor(center, angle),
                )
            }
            TransformerStyle::Impedance => {
                let reactor = SeriesReactor::between(hv.point, lv.point);
                let anchor = reactor.label_anchor();
                (reactor.center, reactor.angle, reactor.from_lead, reactor.to_lead, anchor)
            }
        };

        let label = TextBlock::new(spec.text, anchor)
            .with_max_len(layout.trafo_row_length)
            .with_size(layout.text_size)
            .with_place(Place::E);

        Self {
            id,
            hv_bus: spec.hv_bus,
            lv_bus: spec.lv_bus,
            center,
            angle,
            style: spec.style,
            vector_group: spec.vector_group.as_deref().map(VectorGroup::parse),
            hv_lead,
            lv_lead,
            label,
        }
    }

    pub fn id(&self) -> TrafoId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn style(&self) -> TransformerStyle {
        self.style
    }

    pub fn vector_group(&self) -> Option<&VectorGroup> {
        self.vector_group.as_ref()
    }

    fn lead(&self, bus: BusId) -> Option<&Route> {
        if bus == self.hv_bus {
            Some(&self.hv_lead)
        } else if bus == self.lv_bus {
            Some(&self.lv_lead)
        } else {
            None
        }
    }
}

impl Connection for Transformer {
    fn key(&self) -> ElementKey {
        ElementKey::Trafo(self.id)
    }

    fn get_coords_switch(&self, bus: BusId, offset: f32) -> Result<Seat, OnelineError> {
        self.lead(bus)
            .map(|lead| Seat::at_route_start(lead, offset))
            .ok_or_else(|| invalid_switch(self.key(), bus))
    }
}

impl Symbol for Transformer {
    fn category(&self) -> Category {
        Category::Trafo
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(trafo = self.id.index(), angle = self.angle; "Drawing transformer");
        match self.style {
            TransformerStyle::Windings => {
                draw_transformer(backend, self.center, self.angle, self.vector_group.as_ref());
            }
            TransformerStyle::Impedance => {
                draw_reactor(backend, self.center, self.angle);
            }
        }

        let key = self.key();
        draw_lead(diagram, backend, key, self.hv_bus, &self.hv_lead);
        draw_lead(diagram, backend, key, self.lv_bus, &self.lv_lead);

        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.hv_lead.end(), self.lv_lead.end()]
    }
}

#[cfg(test)]
mod tests {
    use oneline_core::{
        backend::RecordingBackend,
        footprint::{reactor::REACTOR_RADIUS, transformer::STUB_OFFSET},
    };

    use super::*;

    fn port(index: usize, x: f32, y: f32) -> Port {
        Port::new(BusId::new(index), Point::new(x, y))
    }

    #[test]
    fn test_vertical_transformer_leads() {
        let trafo = Transformer::new(
            TrafoId::new(0),
            TransformerSpec::new(BusId::new(0), BusId::new(1)).with_vector_group("Dyn11"),
            port(0, 0.0, 4.0),
            port(1, 0.0, 0.0),
            &LayoutConfig::default(),
        );

        assert!(trafo.center().approx_eq(Point::new(0.0, 2.0), 1e-5));
        // leads run from each bus to the ring on its side
        assert!(trafo.hv_lead.start().approx_eq(Point::new(0.0, 4.0), 1e-6));
        assert!(trafo.hv_lead.end().approx_eq(Point::new(0.0, 2.0 + STUB_OFFSET), 1e-5));
        assert!(trafo.lv_lead.end().approx_eq(Point::new(0.0, 2.0 - STUB_OFFSET), 1e-5));
        assert_eq!(trafo.vector_group().unwrap().code(), "Dyn11");
    }

    #[test]
    fn test_switch_seat_on_lead() {
        let trafo = Transformer::new(
            TrafoId::new(3),
            TransformerSpec::new(BusId::new(0), BusId::new(1)),
            port(0, 0.0, 4.0),
            port(1, 0.0, 0.0),
            &LayoutConfig::default(),
        );

        let seat = trafo.get_coords_switch(BusId::new(1), 0.6).unwrap();
        assert!(seat.center.approx_eq(Point::new(0.0, 0.6), 1e-5));
        assert!(trafo.get_coords_switch(BusId::new(2), 0.6).is_err());
    }

    #[test]
    fn test_impedance_style_draws_reactor() {
        let trafo = Transformer::new(
            TrafoId::new(1),
            TransformerSpec::new(BusId::new(0), BusId::new(1))
                .with_vector_group("Dyn5")
                .with_style(TransformerStyle::Impedance),
            port(0, 0.0, 4.0),
            port(1, 0.0, 0.0),
            &LayoutConfig::default(),
        );
        let mut backend = RecordingBackend::new();
        trafo.draw(&Diagram::default(), &mut backend).unwrap();

        assert_eq!(trafo.style(), TransformerStyle::Impedance);
        assert!(trafo.center().approx_eq(Point::new(0.0, 2.0), 1e-5));
        assert!(trafo.hv_lead.end().approx_eq(Point::new(0.0, 2.0 + REACTOR_RADIUS), 1e-5));
        // one reactor arc, no rings
        let circles: Vec<_> = backend.circles().collect();
        assert_eq!(circles.len(), 1);
        assert!(circles[0].arc.is_some());

        // switches still seat on the leads
        let seat = trafo.get_coords_switch(BusId::new(0), 0.6).unwrap();
        assert!(seat.center.approx_eq(Point::new(0.0, 3.4), 1e-5));
    }
}
