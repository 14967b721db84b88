use log::trace;

use oneline_core::{
    backend::{Backend, Place},
    footprint::{
        transformer::RING_RADIUS,
        transformer3w::{draw_transformer3w, transformer3w_stubs},
        winding::VectorGroup,
    },
    geometry::Point,
    route::Route,
    text::{Growth, NO_WRAP, TextBlock},
};

use crate::{
    OnelineError,
    config::LayoutConfig,
    diagram::Diagram,
    identifier::{BusId, Category, ElementKey, Trafo3wId},
    symbol::{Connection, Port, Seat, Symbol, draw_lead, invalid_switch},
};

/// Parameters of a three-winding transformer.
#[derive(Debug, Clone)]
pub struct Transformer3wSpec {
    pub hv_bus: BusId,
    pub mv_bus: BusId,
    pub lv_bus: BusId,
    pub vector_group: Option<String>,
    pub text: Vec<String>,
}

impl Transformer3wSpec {
    pub fn new(hv_bus: BusId, mv_bus: BusId, lv_bus: BusId) -> Self {
        Self {
            hv_bus,
            mv_bus,
            lv_bus,
            vector_group: None,
            text: Vec::new(),
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
}

/// A three-winding transformer.
///
/// The footprint hangs below the high voltage bus, vertically halfway
/// between it and the higher of the two lower buses. The medium and low
/// voltage leads leave their rings sideways and turn down to their buses.
#[derive(Debug, Clone)]
pub struct Transformer3w {
    id: Trafo3wId,
    hv_bus: BusId,
    mv_bus: BusId,
    lv_bus: BusId,
    center: Point,
    vector_group: Option<VectorGroup>,
    hv_lead: Route,
    mv_lead: Route,
    lv_lead: Route,
    label: TextBlock,
}

impl Transformer3w {
    pub fn new(
        id: Trafo3wId,
        spec: Transformer3wSpec,
        hv: Port,
        mv: Port,
        lv: Port,
        layout: &LayoutConfig,
    ) -> Self {
        let (hv_point, mv_point, lv_point) = (hv.point, mv.point, lv.point);

        let y1 = hv_point.y() - RING_RADIUS;
        let y2 = mv_point.y() + RING_RADIUS;
        let y3 = lv_point.y() + RING_RADIUS;
        let y_mid = (y1 + y2.max(y3)) / 2.0;
        let center = Point::new(hv_point.x(), y_mid);

        let stubs = transformer3w_stubs(center);
        let hv_lead = Self::lead(vec![hv_point, stubs.high]);
        let mv_lead = Self::lead(vec![
            mv_point,
            Point::new(mv_point.x(), stubs.medium.y()),
            stubs.medium,
        ]);
        let lv_lead = Self::lead(vec![
            lv_point,
            Point::new(lv_point.x(), stubs.low.y()),
            stubs.low,
        ]);

        let anchor = Point::new(hv_point.x() + 0.5, y_mid + 0.1);
        let label = TextBlock::new(spec.text, anchor)
            .with_max_len(NO_WRAP)
            .with_size(layout.text_size)
            .with_place(Place::E)
            .with_growth(Growth::Down);

        Self {
            id,
            hv_bus: spec.hv_bus,
            mv_bus: spec.mv_bus,
            lv_bus: spec.lv_bus,
            center,
            vector_group: spec.vector_group.as_deref().map(VectorGroup::parse),
            hv_lead,
            mv_lead,
            lv_lead,
            label,
        }
    }

    /// Builds a lead, collapsing to a straight segment when the elbow
    /// coincides with an end.
    fn lead(points: Vec<Point>) -> Route {
        let start = points[0];
        let end = points[points.len() - 1];
        Route::new(points).unwrap_or_else(|| Route::straight(start, end))
    }

    pub fn id(&self) -> Trafo3wId {
        self.id
    }

    pub fn center(&self) -> Point {
        self.center
    }

    fn lead_at(&self, bus: BusId) -> Option<&Route> {
        if bus == self.hv_bus {
            Some(&self.hv_lead)
        } else if bus == self.mv_bus {
            Some(&self.mv_lead)
        } else if bus == self.lv_bus {
            Some(&self.lv_lead)
        } else {
            None
        }
    }
}

impl Connection for Transformer3w {
    fn key(&self) -> ElementKey {
        ElementKey::Trafo3w(self.id)
    }

    fn get_coords_switch(&self, bus: BusId, offset: f32) -> Result<Seat, OnelineError> {
        self.lead_at(bus)
            .map(|lead| Seat::at_route_start(lead, offset))
            .ok_or_else(|| invalid_switch(self.key(), bus))
    }
}

impl Symbol for Transformer3w {
    fn category(&self) -> Category {
        Category::Trafo3w
    }

    fn index(&self) -> usize {
        self.id.index()
    }

    fn draw(&self, diagram: &Diagram, backend: &mut dyn Backend) -> Result<(), OnelineError> {
        trace!(trafo3w = self.id.index(); "Drawing three-winding transformer");
        draw_transformer3w(backend, self.center, self.vector_group.as_ref());

        let key = self.key();
        draw_lead(diagram, backend, key, self.hv_bus, &self.hv_lead);
        draw_lead(diagram, backend, key, self.mv_bus, &self.mv_lead);
        draw_lead(diagram, backend, key, self.lv_bus, &self.lv_lead);

        self.label.draw(backend);
        Ok(())
    }

    fn label(&self) -> &TextBlock {
        &self.label
    }

    fn connection_points(&self) -> Vec<Point> {
        vec![self.hv_lead.end(), self.mv_lead.end(), self.lv_lead.end()]
    }
}
