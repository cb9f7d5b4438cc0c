use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Input,
    Hidden,
    Output,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Input, Layer::Hidden, Layer::Output];

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Input => "input",
            Layer::Hidden => "hidden",
            Layer::Output => "output",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Layer::Input => 0,
            Layer::Hidden => 1,
            Layer::Output => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeId {
    I1,
    I2,
    H1,
    H2,
    O1,
    O2,
}

impl NodeId {
    pub const ALL: [NodeId; 6] = [
        NodeId::I1,
        NodeId::I2,
        NodeId::H1,
        NodeId::H2,
        NodeId::O1,
        NodeId::O2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeId::I1 => "i1",
            NodeId::I2 => "i2",
            NodeId::H1 => "h1",
            NodeId::H2 => "h2",
            NodeId::O1 => "o1",
            NodeId::O2 => "o2",
        }
    }

    pub fn layer(self) -> Layer {
        match self {
            NodeId::I1 | NodeId::I2 => Layer::Input,
            NodeId::H1 | NodeId::H2 => Layer::Hidden,
            NodeId::O1 | NodeId::O2 => Layer::Output,
        }
    }

    /// Position of the node inside its layer, top to bottom.
    pub fn position(self) -> usize {
        match self {
            NodeId::I1 | NodeId::H1 | NodeId::O1 => 0,
            NodeId::I2 | NodeId::H2 | NodeId::O2 => 1,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightId {
    W1,
    W2,
    W3,
    W4,
    W5,
    W6,
    W7,
    W8,
}

impl WeightId {
    pub const ALL: [WeightId; 8] = [
        WeightId::W1,
        WeightId::W2,
        WeightId::W3,
        WeightId::W4,
        WeightId::W5,
        WeightId::W6,
        WeightId::W7,
        WeightId::W8,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WeightId::W1 => "w1",
            WeightId::W2 => "w2",
            WeightId::W3 => "w3",
            WeightId::W4 => "w4",
            WeightId::W5 => "w5",
            WeightId::W6 => "w6",
            WeightId::W7 => "w7",
            WeightId::W8 => "w8",
        }
    }

    /// 1-based number used in formulas (`w_5`).
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// Position in [`WeightId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WeightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: WeightId,
}

const EDGES: [Edge; 8] = [
    Edge {
        source: NodeId::I1,
        target: NodeId::H1,
        weight: WeightId::W1,
    },
    Edge {
        source: NodeId::I2,
        target: NodeId::H1,
        weight: WeightId::W2,
    },
    Edge {
        source: NodeId::I1,
        target: NodeId::H2,
        weight: WeightId::W3,
    },
    Edge {
        source: NodeId::I2,
        target: NodeId::H2,
        weight: WeightId::W4,
    },
    Edge {
        source: NodeId::H1,
        target: NodeId::O1,
        weight: WeightId::W5,
    },
    Edge {
        source: NodeId::H2,
        target: NodeId::O1,
        weight: WeightId::W6,
    },
    Edge {
        source: NodeId::H1,
        target: NodeId::O2,
        weight: WeightId::W7,
    },
    Edge {
        source: NodeId::H2,
        target: NodeId::O2,
        weight: WeightId::W8,
    },
];

/// The fixed 2-2-2 network: every node of a layer connects to every node of
/// the next layer through exactly one weight.
#[derive(Clone, Debug)]
pub struct Topology {
    edges: Vec<Edge>,
}

impl Default for Topology {
    fn default() -> Self {
        Self::two_two_two()
    }
}

impl Topology {
    pub fn two_two_two() -> Self {
        Self {
            edges: EDGES.to_vec(),
        }
    }

    pub fn layers(&self) -> &'static [Layer] {
        &Layer::ALL
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        NodeId::ALL.into_iter()
    }

    /// Nodes of `layer` in their intra-layer order.
    pub fn layer_nodes(&self, layer: Layer) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = NodeId::ALL
            .into_iter()
            .filter(|n| n.layer() == layer)
            .collect();
        nodes.sort_by_key(|n| n.position());
        nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn weights(&self) -> impl Iterator<Item = WeightId> + '_ {
        self.edges.iter().map(|e| e.weight)
    }

    pub fn incoming(&self, node: NodeId) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| e.target == node)
            .copied()
            .collect()
    }

    pub fn outgoing(&self, node: NodeId) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| e.source == node)
            .copied()
            .collect()
    }

    pub fn edge(&self, weight: WeightId) -> Option<Edge> {
        self.edges.iter().find(|e| e.weight == weight).copied()
    }

    /// Edges whose target sits in `layer`, in weight order.
    pub fn edges_into(&self, layer: Layer) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| e.target.layer() == layer)
            .copied()
            .collect();
        edges.sort_by_key(|e| e.weight);
        edges
    }
}
