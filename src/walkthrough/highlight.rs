use std::collections::BTreeSet;

use crate::network::{NodeId, Topology, WeightId};
use crate::walkthrough::step::Step;

/// Nodes and weights a step calls out. Everything else is drawn inactive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlight {
    pub nodes: BTreeSet<NodeId>,
    pub weights: BTreeSet<WeightId>,
}

impl Highlight {
    pub fn new(
        nodes: impl IntoIterator<Item = NodeId>,
        weights: impl IntoIterator<Item = WeightId>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            weights: weights.into_iter().collect(),
        }
    }

    pub fn nodes_only(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            weights: BTreeSet::new(),
        }
    }

    pub fn weights_only(weights: impl IntoIterator<Item = WeightId>) -> Self {
        Self {
            nodes: BTreeSet::new(),
            weights: weights.into_iter().collect(),
        }
    }

    pub fn has_node(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn has_weight(&self, weight: WeightId) -> bool {
        self.weights.contains(&weight)
    }

    /// Whether every highlighted id exists in `topology`.
    pub fn is_within(&self, topology: &Topology) -> bool {
        let nodes: BTreeSet<NodeId> = topology.nodes().collect();
        let weights: BTreeSet<WeightId> = topology.weights().collect();
        self.nodes.is_subset(&nodes) && self.weights.is_subset(&weights)
    }
}

/// The highlight of `step`. Steps declare it up front, so this is a lookup.
pub fn resolve(step: &Step) -> &Highlight {
    &step.highlight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let h = Highlight::new([NodeId::H1], [WeightId::W1, WeightId::W2]);
        assert!(h.has_node(NodeId::H1));
        assert!(!h.has_node(NodeId::H2));
        assert!(h.has_weight(WeightId::W2));
        assert!(!h.has_weight(WeightId::W5));
    }

    #[test]
    fn test_is_within_topology() {
        let topo = Topology::two_two_two();
        assert!(Highlight::new(NodeId::ALL, WeightId::ALL).is_within(&topo));
        assert!(Highlight::default().is_within(&topo));
    }
}
