use crate::network::format::{format_input, format_value};
use crate::network::{DerivedKey, Layer, NetworkState, NodeId, StateError, Topology, WeightId};
use crate::walkthrough::highlight::Highlight;

/// The arithmetic a step performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOp {
    Overview,
    /// Weighted sum of a node's incoming activations.
    ForwardNet(NodeId),
    /// Logistic activation of a node's weighted sum.
    Activate(NodeId),
    OutputError(NodeId),
    TotalError,
    OutputDelta(NodeId),
    /// Gradient of the total error for every weight feeding `Layer`.
    Gradients(Layer),
    HiddenDelta(NodeId),
    UpdateWeights,
}

impl StepOp {
    pub fn phase(self) -> Phase {
        match self {
            StepOp::Overview => Phase::Setup,
            StepOp::ForwardNet(_) | StepOp::Activate(_) => Phase::Forward,
            StepOp::OutputError(_) | StepOp::TotalError => Phase::Error,
            StepOp::OutputDelta(_)
            | StepOp::Gradients(_)
            | StepOp::HiddenDelta(_)
            | StepOp::UpdateWeights => Phase::Backward,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Forward,
    Error,
    Backward,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Setup => "Setup",
            Phase::Forward => "Forward pass",
            Phase::Error => "Error",
            Phase::Backward => "Backward pass",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepOutput {
    pub result: String,
}

#[derive(Clone, Debug)]
pub struct Step {
    pub title: String,
    pub explanation: String,
    pub formula: Option<String>,
    pub op: StepOp,
    pub highlight: Highlight,
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

impl Step {
    /// Runs the step against `state`, writing whatever it derives.
    ///
    /// The result only depends on the fixed inputs and weights plus values
    /// written by earlier steps, so replaying the sequence forward from a
    /// fresh state always yields the same text.
    pub fn calculate(
        &self,
        topology: &Topology,
        state: &mut NetworkState,
    ) -> Result<StepOutput, StateError> {
        let result = match self.op {
            StepOp::Overview => overview(state)?,
            StepOp::ForwardNet(node) => forward_net(topology, state, node)?,
            StepOp::Activate(node) => activate(state, node)?,
            StepOp::OutputError(node) => output_error(state, node)?,
            StepOp::TotalError => total_error(topology, state)?,
            StepOp::OutputDelta(node) => output_delta(state, node)?,
            StepOp::Gradients(layer) => gradients(topology, state, layer)?,
            StepOp::HiddenDelta(node) => hidden_delta(topology, state, node)?,
            StepOp::UpdateWeights => update_weights(state)?,
        };
        Ok(StepOutput { result })
    }
}

fn node_value_text(state: &NetworkState, node: NodeId) -> Result<String, StateError> {
    let value = state.require_node_value(node)?;
    Ok(match node.layer() {
        Layer::Input => format_input(value),
        Layer::Hidden | Layer::Output => format_value(value),
    })
}

fn node_value_name(node: NodeId) -> String {
    match node.layer() {
        Layer::Input => node.to_string(),
        Layer::Hidden | Layer::Output => DerivedKey::Out(node).to_string(),
    }
}

/// Lines of an equation chain, with continuation lines aligned on `=`.
fn chain(lhs: &str, rhs: &[String]) -> String {
    let pad = " ".repeat(lhs.chars().count());
    rhs.iter()
        .enumerate()
        .map(|(i, r)| {
            if i == 0 {
                format!("{lhs} = {r}")
            } else {
                format!("{pad} = {r}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn overview(state: &NetworkState) -> Result<String, StateError> {
    let inputs = [NodeId::I1, NodeId::I2]
        .into_iter()
        .map(|n| -> Result<String, StateError> {
            Ok(format!("{n} = {}", format_input(state.input(n)?)))
        })
        .collect::<Result<Vec<_>, StateError>>()?
        .join(", ");
    let targets = [NodeId::O1, NodeId::O2]
        .into_iter()
        .map(|n| -> Result<String, StateError> {
            Ok(format!("{n} = {}", format_value(state.target(n)?)))
        })
        .collect::<Result<Vec<_>, StateError>>()?
        .join(", ");
    Ok(format!(
        "inputs:        {inputs}\ntargets:       {targets}\nlearning rate: {}",
        format_value(state.learning_rate())
    ))
}

fn forward_net(
    topology: &Topology,
    state: &mut NetworkState,
    node: NodeId,
) -> Result<String, StateError> {
    let mut symbolic = Vec::new();
    let mut numeric = Vec::new();
    let mut net = 0.0;
    for edge in topology.incoming(node) {
        let w = state.weight(edge.weight);
        let x = state.require_node_value(edge.source)?;
        net += w * x;
        symbolic.push(format!("{} × {}", edge.weight, node_value_name(edge.source)));
        numeric.push(format!(
            "{} × {}",
            format_value(w),
            node_value_text(state, edge.source)?
        ));
    }
    state.set_calculated(DerivedKey::Net(node), net)?;
    Ok(chain(
        &DerivedKey::Net(node).to_string(),
        &[symbolic.join(" + "), numeric.join(" + "), format_value(net)],
    ))
}

fn activate(state: &mut NetworkState, node: NodeId) -> Result<String, StateError> {
    let net = state.require(DerivedKey::Net(node))?;
    let out = sigmoid(net);
    state.set_calculated(DerivedKey::Out(node), out)?;
    Ok(chain(
        &DerivedKey::Out(node).to_string(),
        &[
            format!("1 / (1 + e^(-{}))", format_value(net)),
            format_value(out),
        ],
    ))
}

fn output_error(state: &mut NetworkState, node: NodeId) -> Result<String, StateError> {
    let target = state.target(node)?;
    let out = state.require(DerivedKey::Out(node))?;
    let error = 0.5 * (target - out).powi(2);
    state.set_calculated(DerivedKey::Error(node), error)?;
    Ok(chain(
        &DerivedKey::Error(node).to_string(),
        &[
            format!("½ × ({} − {})²", format_value(target), format_value(out)),
            format_value(error),
        ],
    ))
}

fn total_error(topology: &Topology, state: &mut NetworkState) -> Result<String, StateError> {
    let mut terms = Vec::new();
    let mut total = 0.0;
    for node in topology.layer_nodes(Layer::Output) {
        let e = state.require(DerivedKey::Error(node))?;
        total += e;
        terms.push(format_value(e));
    }
    state.set_calculated(DerivedKey::TotalError, total)?;
    Ok(chain(
        &DerivedKey::TotalError.to_string(),
        &[terms.join(" + "), format_value(total)],
    ))
}

fn output_delta(state: &mut NetworkState, node: NodeId) -> Result<String, StateError> {
    let target = state.target(node)?;
    let out = state.require(DerivedKey::Out(node))?;
    let delta = (out - target) * out * (1.0 - out);
    state.set_calculated(DerivedKey::Delta(node), delta)?;
    let out_text = format_value(out);
    Ok(chain(
        &DerivedKey::Delta(node).to_string(),
        &[
            format!(
                "({out_text} − {}) × {out_text} × (1 − {out_text})",
                format_value(target)
            ),
            format_value(delta),
        ],
    ))
}

fn gradients(
    topology: &Topology,
    state: &mut NetworkState,
    layer: Layer,
) -> Result<String, StateError> {
    let mut lines = Vec::new();
    for edge in topology.edges_into(layer) {
        let delta = state.require(DerivedKey::Delta(edge.target))?;
        let x = state.require_node_value(edge.source)?;
        let grad = delta * x;
        state.set_calculated(DerivedKey::Gradient(edge.weight), grad)?;
        lines.push(format!(
            "{} = {} × {} = {} × {} = {}",
            DerivedKey::Gradient(edge.weight),
            DerivedKey::Delta(edge.target),
            node_value_name(edge.source),
            format_value(delta),
            node_value_text(state, edge.source)?,
            format_value(grad),
        ));
    }
    Ok(lines.join("\n"))
}

fn hidden_delta(
    topology: &Topology,
    state: &mut NetworkState,
    node: NodeId,
) -> Result<String, StateError> {
    let out = state.require(DerivedKey::Out(node))?;
    let mut back = 0.0;
    let mut terms = Vec::new();
    for edge in topology.outgoing(node) {
        let downstream = state.require(DerivedKey::Delta(edge.target))?;
        let w = state.weight(edge.weight);
        back += downstream * w;
        terms.push(format!(
            "{} × {}",
            format_value(downstream),
            format_value(w)
        ));
    }
    let delta = back * out * (1.0 - out);
    state.set_calculated(DerivedKey::Delta(node), delta)?;
    let out_text = format_value(out);
    Ok(chain(
        &DerivedKey::Delta(node).to_string(),
        &[
            format!(
                "({}) × {out_text} × (1 − {out_text})",
                terms.join(" + ")
            ),
            format!("{} × {}", format_value(back), format_value(out * (1.0 - out))),
            format_value(delta),
        ],
    ))
}

fn update_weights(state: &mut NetworkState) -> Result<String, StateError> {
    let rate = state.learning_rate();
    let mut lines = Vec::new();
    for w in WeightId::ALL {
        let old = state.weight(w);
        let grad = state.require(DerivedKey::Gradient(w))?;
        let new = old - rate * grad;
        state.set_calculated(DerivedKey::Updated(w), new)?;
        lines.push(format!(
            "{w}: {} − {} × {} = {}",
            format_value(old),
            format_value(rate),
            format_value(grad),
            format_value(new)
        ));
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NetworkState {
        NetworkState::new(
            [0.05, 0.10],
            [0.15, 0.20, 0.25, 0.30, 0.40, 0.45, 0.50, 0.55],
            [0.01, 0.99],
            0.5,
        )
    }

    fn step(op: StepOp) -> Step {
        Step {
            title: String::new(),
            explanation: String::new(),
            formula: None,
            op,
            highlight: Highlight::default(),
        }
    }

    #[test]
    fn test_forward_net_h1_is_weighted_sum() {
        let topo = Topology::two_two_two();
        let mut s = state();
        let out = step(StepOp::ForwardNet(NodeId::H1))
            .calculate(&topo, &mut s)
            .unwrap();
        let net = s.calculated(DerivedKey::Net(NodeId::H1)).unwrap();
        assert!((net - 0.0275).abs() < 1e-12);
        assert_eq!(format_value(net), "0.0275");
        assert!(out.result.ends_with("= 0.0275"), "{}", out.result);
        assert!(out.result.contains("0.1500 × 0.05 + 0.2000 × 0.10"));
    }

    #[test]
    fn test_activate_requires_net() {
        let topo = Topology::two_two_two();
        let mut s = state();
        let err = step(StepOp::Activate(NodeId::H1))
            .calculate(&topo, &mut s)
            .unwrap_err();
        assert_eq!(err, StateError::Missing(DerivedKey::Net(NodeId::H1)));
    }

    #[test]
    fn test_activate_applies_sigmoid() {
        let topo = Topology::two_two_two();
        let mut s = state();
        step(StepOp::ForwardNet(NodeId::H1)).calculate(&topo, &mut s).unwrap();
        step(StepOp::Activate(NodeId::H1)).calculate(&topo, &mut s).unwrap();
        let out = s.calculated(DerivedKey::Out(NodeId::H1)).unwrap();
        assert!((out - sigmoid(0.0275)).abs() < 1e-12);
        assert_eq!(format_value(out), "0.5069");
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let topo = Topology::two_two_two();
        let mut a = state();
        let mut b = state();
        let s = step(StepOp::ForwardNet(NodeId::H2));
        let first = s.calculate(&topo, &mut a).unwrap();
        let second = s.calculate(&topo, &mut b).unwrap();
        assert_eq!(first, second);
        let again = s.calculate(&topo, &mut a).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_sigmoid_midpoint() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.9999);
    }

    #[test]
    fn test_output_delta_sign_follows_error() {
        let topo = Topology::two_two_two();
        let mut s = state();
        s.set_calculated(DerivedKey::Out(NodeId::O1), 0.75).unwrap();
        step(StepOp::OutputDelta(NodeId::O1)).calculate(&topo, &mut s).unwrap();
        let delta = s.calculated(DerivedKey::Delta(NodeId::O1)).unwrap();
        assert!((delta - (0.75 - 0.01) * 0.75 * 0.25).abs() < 1e-12);
    }
}
