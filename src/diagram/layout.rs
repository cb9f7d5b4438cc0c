use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::network::{Layer, NodeId, Topology, WeightId};

/// Horizontal margin, as a fraction of the width, left of the first layer
/// and right of the last one.
pub const LAYER_MARGIN: f64 = 0.1;

/// Distance between an edge and its label anchor, in drawing units.
pub const DEFAULT_LABEL_OFFSET: f64 = 1.0;

/// Drawing-area coordinates. `y` grows downward from the top edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePlacement {
    pub id: NodeId,
    pub layer: Layer,
    pub at: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgePlacement {
    pub weight: WeightId,
    pub source: NodeId,
    pub target: NodeId,
    pub from: Point,
    pub to: Point,
    pub midpoint: Point,
    pub label_at: Point,
}

/// Node and edge geometry for a drawing area of `width` × `height`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiagramLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodePlacement>,
    pub edges: Vec<EdgePlacement>,
}

/// Horizontal fraction of layer `index` out of `count`: 0.1, 0.5, 0.9 for
/// three layers.
pub fn layer_fraction(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.5;
    }
    LAYER_MARGIN + (1.0 - 2.0 * LAYER_MARGIN) * index as f64 / (count - 1) as f64
}

/// Vertical fraction of node `index` out of `count` in one layer. Nodes are
/// spaced evenly and never touch the top or bottom edge.
pub fn slot_fraction(index: usize, count: usize) -> f64 {
    (index + 1) as f64 / (count + 1) as f64
}

/// Anchor for an edge label: the midpoint pushed `offset` units along the
/// edge normal, toward the top of the area or, for `upward == false`, toward
/// the bottom.
fn label_anchor(from: Point, to: Point, offset: f64, upward: bool) -> Point {
    let mid = from.midpoint(to);
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 || offset == 0.0 {
        return mid;
    }
    let (mut nx, mut ny) = (-dy / len, dx / len);
    if (ny > 0.0) == upward {
        nx = -nx;
        ny = -ny;
    }
    Point::new(mid.x + nx * offset, mid.y + ny * offset)
}

fn same_point(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

impl DiagramLayout {
    pub fn compute(topology: &Topology, width: f64, height: f64) -> Self {
        Self::compute_with_offset(topology, width, height, DEFAULT_LABEL_OFFSET)
    }

    pub fn compute_with_offset(
        topology: &Topology,
        width: f64,
        height: f64,
        label_offset: f64,
    ) -> Self {
        let layers = topology.layers();
        let mut nodes = Vec::new();
        for (layer_idx, &layer) in layers.iter().enumerate() {
            let x = width * layer_fraction(layer_idx, layers.len());
            let members = topology.layer_nodes(layer);
            for (slot, &id) in members.iter().enumerate() {
                let y = height * slot_fraction(slot, members.len());
                nodes.push(NodePlacement {
                    id,
                    layer,
                    at: Point::new(x, y),
                });
            }
        }

        // Every edge endpoint is one of the topology's nodes placed above.
        let position: BTreeMap<NodeId, Point> = nodes.iter().map(|n| (n.id, n.at)).collect();
        let mut edges: Vec<EdgePlacement> = Vec::new();
        for e in topology.edges() {
            let from = position[&e.source];
            let to = position[&e.target];
            let midpoint = from.midpoint(to);
            // Crossing edges share a midpoint; alternate their labels above
            // and below so they land on different rows.
            let sharing = edges
                .iter()
                .filter(|other| same_point(other.midpoint, midpoint))
                .count();
            edges.push(EdgePlacement {
                weight: e.weight,
                source: e.source,
                target: e.target,
                from,
                to,
                midpoint,
                label_at: label_anchor(from, to, label_offset, sharing % 2 == 0),
            });
        }

        Self {
            width,
            height,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodePlacement> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, weight: WeightId) -> Option<&EdgePlacement> {
        self.edges.iter().find(|e| e.weight == weight)
    }
}

/// Holds the layout for the last observed drawing area and recomputes it only
/// when that area changes.
#[derive(Clone, Debug)]
pub struct LayoutCache {
    label_offset: f64,
    layout: Option<DiagramLayout>,
    recomputes: usize,
}

impl LayoutCache {
    pub fn new(label_offset: f64) -> Self {
        Self {
            label_offset,
            layout: None,
            recomputes: 0,
        }
    }

    /// Call when the host reports a (possibly new) size.
    pub fn resize(&mut self, topology: &Topology, width: f64, height: f64) -> &DiagramLayout {
        let fresh = matches!(
            &self.layout,
            Some(layout) if layout.width == width && layout.height == height
        );
        if fresh {
            return self.layout.as_ref().expect("layout present");
        }
        debug!(width, height, "recomputing diagram layout");
        self.recomputes += 1;
        self.layout.insert(DiagramLayout::compute_with_offset(
            topology,
            width,
            height,
            self.label_offset,
        ))
    }

    pub fn current(&self) -> Option<&DiagramLayout> {
        self.layout.as_ref()
    }

    pub fn recomputes(&self) -> usize {
        self.recomputes
    }
}
