use thiserror::Error;

use crate::network::{Layer, NodeId, Topology, WeightId};
use crate::walkthrough::highlight::Highlight;
use crate::walkthrough::step::{Step, StepOp};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("a walkthrough needs at least one step")]
    Empty,
}

/// Fixed, ordered list of steps. Never empty.
#[derive(Clone, Debug)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Result<Self, SequenceError> {
        if steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        Ok(Self { steps })
    }

    /// Forward pass through every unit, the error, then one backward pass
    /// ending with the updated weights.
    pub fn standard(topology: &Topology) -> Self {
        let mut ops = vec![StepOp::Overview];
        for layer in [Layer::Hidden, Layer::Output] {
            for node in topology.layer_nodes(layer) {
                ops.push(StepOp::ForwardNet(node));
                ops.push(StepOp::Activate(node));
            }
        }
        let outputs = topology.layer_nodes(Layer::Output);
        ops.extend(outputs.iter().map(|&n| StepOp::OutputError(n)));
        ops.push(StepOp::TotalError);
        ops.extend(outputs.iter().map(|&n| StepOp::OutputDelta(n)));
        ops.push(StepOp::Gradients(Layer::Output));
        ops.extend(
            topology
                .layer_nodes(Layer::Hidden)
                .into_iter()
                .map(StepOp::HiddenDelta),
        );
        ops.push(StepOp::Gradients(Layer::Hidden));
        ops.push(StepOp::UpdateWeights);

        Self {
            steps: ops.into_iter().map(|op| build_step(topology, op)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Step at `index`, clamped to the last one.
    pub fn step(&self, index: usize) -> &Step {
        &self.steps[index.min(self.steps.len() - 1)]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }
}

fn weight_term(w: WeightId, node: NodeId) -> String {
    let value = match node.layer() {
        Layer::Input => format!("{}_{}", &node.as_str()[..1], &node.as_str()[1..]),
        Layer::Hidden | Layer::Output => format!("out_{{{node}}}"),
    };
    format!("w_{} \\cdot {value}", w.number())
}

fn declared_highlight(topology: &Topology, op: StepOp) -> Highlight {
    match op {
        StepOp::Overview => Highlight::nodes_only(topology.layer_nodes(Layer::Input)),
        StepOp::ForwardNet(node) => {
            let incoming = topology.incoming(node);
            Highlight::new(
                incoming.iter().map(|e| e.source).chain([node]),
                incoming.iter().map(|e| e.weight),
            )
        }
        StepOp::Activate(node) | StepOp::OutputError(node) | StepOp::OutputDelta(node) => {
            Highlight::nodes_only([node])
        }
        StepOp::TotalError => Highlight::nodes_only(topology.layer_nodes(Layer::Output)),
        StepOp::Gradients(layer) => {
            let edges = topology.edges_into(layer);
            Highlight::new(
                edges.iter().flat_map(|e| [e.source, e.target]),
                edges.iter().map(|e| e.weight),
            )
        }
        StepOp::HiddenDelta(node) => {
            let outgoing = topology.outgoing(node);
            Highlight::new(
                outgoing.iter().map(|e| e.target).chain([node]),
                outgoing.iter().map(|e| e.weight),
            )
        }
        StepOp::UpdateWeights => Highlight::weights_only(topology.weights()),
    }
}

fn build_step(topology: &Topology, op: StepOp) -> Step {
    let (title, explanation, formula) = match op {
        StepOp::Overview => (
            "The network".to_string(),
            "Two inputs feed two hidden units, which feed two output units. Every unit \
             is connected to every unit of the next layer through its own weight. We \
             push the inputs forward, measure the error against the targets, then \
             send that error backward to find how each weight should change."
                .to_string(),
            None,
        ),
        StepOp::ForwardNet(node) => {
            let terms = topology
                .incoming(node)
                .iter()
                .map(|e| weight_term(e.weight, e.source))
                .collect::<Vec<_>>()
                .join(" + ");
            (
                format!("Weighted input of {node}"),
                format!(
                    "Each connection into {node} multiplies the value on its source \
                     side by its weight. Their sum is the net input of {node}, before \
                     any activation is applied."
                ),
                Some(format!("$$net_{{{node}}} = {terms}$$")),
            )
        }
        StepOp::Activate(node) => (
            format!("Activation of {node}"),
            format!(
                "The logistic function squashes the net input of {node} into the \
                 range (0, 1). This is the value {node} passes on."
            ),
            Some(format!(
                "$$out_{{{node}}} = \\sigma(net_{{{node}}}) = \\frac{{1}}{{1 + e^{{-net_{{{node}}}}}}}$$"
            )),
        ),
        StepOp::OutputError(node) => (
            format!("Error at {node}"),
            format!(
                "Squared error compares the output of {node} with its target. The \
                 factor one half cancels when we differentiate later."
            ),
            Some(format!(
                "$$E_{{{node}}} = \\frac{{1}}{{2}}(target_{{{node}}} - out_{{{node}}})^2$$"
            )),
        ),
        StepOp::TotalError => (
            "Total error".to_string(),
            "The network's error is the sum of the errors of its outputs. This is \
             the quantity the backward pass tries to reduce."
                .to_string(),
            Some("$$E_{total} = E_{o1} + E_{o2}$$".to_string()),
        ),
        StepOp::OutputDelta(node) => (
            format!("Error signal of {node}"),
            format!(
                "How much the total error changes with the net input of {node}: the \
                 derivative of the error times the derivative of the logistic \
                 function."
            ),
            Some(format!(
                "$$\\delta_{{{node}}} = (out_{{{node}}} - target_{{{node}}}) \\cdot out_{{{node}}}(1 - out_{{{node}}})$$"
            )),
        ),
        StepOp::Gradients(layer) => {
            let (target, source) = match layer {
                Layer::Output => ("o", "out_{h}"),
                _ => ("h", "i"),
            };
            (
                format!("Gradients of the {} layer weights", layer.as_str()),
                format!(
                    "A weight's gradient is the error signal of the unit it feeds \
                     times the value flowing through it. Every weight into the {} \
                     layer gets one.",
                    layer.as_str()
                ),
                Some(format!(
                    "$$\\frac{{\\partial E_{{total}}}}{{\\partial w}} = \\delta_{{{target}}} \\cdot {source}$$"
                )),
            )
        }
        StepOp::HiddenDelta(node) => {
            let terms = topology
                .outgoing(node)
                .iter()
                .map(|e| format!("\\delta_{{{}}} w_{}", e.target, e.weight.number()))
                .collect::<Vec<_>>()
                .join(" + ");
            (
                format!("Error signal of {node}"),
                format!(
                    "{node} has no target of its own. Its error signal collects the \
                     output error signals, weighted by the connections leaving {node}, \
                     times the derivative of its own activation."
                ),
                Some(format!(
                    "$$\\delta_{{{node}}} = ({terms}) \\cdot out_{{{node}}}(1 - out_{{{node}}})$$"
                )),
            )
        }
        StepOp::UpdateWeights => (
            "Updating the weights".to_string(),
            "Each weight moves a small step against its gradient, scaled by the \
             learning rate. One such update is one step of gradient descent."
                .to_string(),
            Some(
                "$$w^{+} = w - \\eta \\cdot \\frac{\\partial E_{total}}{\\partial w}$$"
                    .to_string(),
            ),
        ),
    };
    Step {
        title,
        explanation,
        formula,
        op,
        highlight: declared_highlight(topology, op),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_rejected() {
        assert_eq!(StepSequence::new(Vec::new()).unwrap_err(), SequenceError::Empty);
    }

    #[test]
    fn test_standard_sequence_order() {
        let topo = Topology::two_two_two();
        let seq = StepSequence::standard(&topo);
        assert_eq!(seq.len(), 19);
        assert_eq!(seq.get(0).unwrap().op, StepOp::Overview);
        assert_eq!(seq.get(1).unwrap().op, StepOp::ForwardNet(NodeId::H1));
        assert_eq!(seq.get(2).unwrap().op, StepOp::Activate(NodeId::H1));
        assert_eq!(seq.get(18).unwrap().op, StepOp::UpdateWeights);
        assert!(seq.get(19).is_none());
    }

    #[test]
    fn test_forward_net_highlights_sources_and_weights() {
        let topo = Topology::two_two_two();
        let seq = StepSequence::standard(&topo);
        let step = seq.get(1).unwrap();
        assert_eq!(
            step.highlight,
            Highlight::new(
                [NodeId::I1, NodeId::I2, NodeId::H1],
                [WeightId::W1, WeightId::W2]
            )
        );
    }

    #[test]
    fn test_hidden_delta_highlights_outgoing_weights() {
        let topo = Topology::two_two_two();
        let h = declared_highlight(&topo, StepOp::HiddenDelta(NodeId::H2));
        assert_eq!(
            h,
            Highlight::new(
                [NodeId::H2, NodeId::O1, NodeId::O2],
                [WeightId::W6, WeightId::W8]
            )
        );
    }

    #[test]
    fn test_every_step_but_overview_has_formula() {
        let topo = Topology::two_two_two();
        let seq = StepSequence::standard(&topo);
        for step in seq.iter().skip(1) {
            assert!(step.formula.is_some(), "{} has no formula", step.title);
        }
    }

    #[test]
    fn test_forward_net_formula_names_weights() {
        let topo = Topology::two_two_two();
        let step = build_step(&topo, StepOp::ForwardNet(NodeId::O2));
        assert_eq!(
            step.formula.as_deref(),
            Some("$$net_{o2} = w_7 \\cdot out_{h1} + w_8 \\cdot out_{h2}$$")
        );
    }
}
