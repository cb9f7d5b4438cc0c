use serde::Serialize;

use crate::diagram::layout::{DiagramLayout, Point};
use crate::network::format::{format_input, format_optional, format_value};
use crate::network::{Layer, NetworkState, NodeId, WeightId};
use crate::walkthrough::Highlight;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSprite {
    pub id: NodeId,
    pub label: String,
    pub value: String,
    pub at: Point,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeSprite {
    pub weight: WeightId,
    pub from: Point,
    pub to: Point,
    pub label_at: Point,
    pub label: String,
    pub active: bool,
}

/// Everything a drawing surface needs for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeSprite>,
    pub edges: Vec<EdgeSprite>,
}

fn node_value(state: &NetworkState, id: NodeId) -> String {
    match id.layer() {
        Layer::Input => state
            .node_value(id)
            .map(format_input)
            .unwrap_or_else(|| "?".to_string()),
        Layer::Hidden | Layer::Output => format_optional(state.node_value(id)),
    }
}

impl Scene {
    /// Pure function of its arguments; the same state, highlight and layout
    /// always produce the same scene.
    pub fn build(state: &NetworkState, highlight: &Highlight, layout: &DiagramLayout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|n| NodeSprite {
                id: n.id,
                label: n.id.to_string(),
                value: node_value(state, n.id),
                at: n.at,
                active: highlight.has_node(n.id),
            })
            .collect();
        let edges = layout
            .edges
            .iter()
            .map(|e| EdgeSprite {
                weight: e.weight,
                from: e.from,
                to: e.to,
                label_at: e.label_at,
                label: format!("{}: {}", e.weight, format_value(state.weight(e.weight))),
                active: highlight.has_weight(e.weight),
            })
            .collect();
        Self {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSprite> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, weight: WeightId) -> Option<&EdgeSprite> {
        self.edges.iter().find(|e| e.weight == weight)
    }
}
