//! Z-ordered collection of SVG nodes.
//!
//! Backend calls arrive in symbol order, which interleaves wiring, symbol
//! outlines and text. [`LayeredOutput`] sorts them back into bands so that
//! labels are never hidden under a conductor:
//!
//! ```text
//! background < wiring < symbol < text
//! ```

use svg::node::element as svg_element;

/// Boxed SVG node.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering band of an SVG node.
///
/// The `Ord` derive follows declaration order: the first variant is emitted
/// first and ends up at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Page fill
    Background,
    /// Open polylines: conductors, leads and stubs
    Wiring,
    /// Closed outlines, circles and arcs
    Symbol,
    /// Label rows
    Text,
}

impl RenderLayer {
    /// Value of the `data-layer` attribute on the layer group.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Wiring => "wiring",
            Self::Symbol => "symbol",
            Self::Text => "text",
        }
    }
}

/// SVG nodes tagged with their layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `node` to `layer`, after the nodes already in it.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends every node of `other`.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output and returns one `<g data-layer="...">` per
    /// non-empty layer, bottom layer first.
    ///
    /// Nodes keep their insertion order inside a layer.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable: insertion order survives within a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}
