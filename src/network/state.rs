use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::config::NetworkConfig;
use crate::network::topology::{Layer, NodeId, WeightId};

/// Keys of values derived while the walkthrough runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DerivedKey {
    Net(NodeId),
    Out(NodeId),
    Error(NodeId),
    TotalError,
    Delta(NodeId),
    Gradient(WeightId),
    Updated(WeightId),
}

impl DerivedKey {
    /// Whether the key names a value that exists for the fixed topology.
    pub fn is_recognized(self) -> bool {
        match self {
            DerivedKey::Net(n) | DerivedKey::Out(n) | DerivedKey::Delta(n) => {
                n.layer() != Layer::Input
            }
            DerivedKey::Error(n) => n.layer() == Layer::Output,
            DerivedKey::TotalError | DerivedKey::Gradient(_) | DerivedKey::Updated(_) => true,
        }
    }
}

impl fmt::Display for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedKey::Net(n) => write!(f, "net_{n}"),
            DerivedKey::Out(n) => write!(f, "out_{n}"),
            DerivedKey::Error(n) => write!(f, "error_{n}"),
            DerivedKey::TotalError => f.write_str("error_total"),
            DerivedKey::Delta(n) => write!(f, "delta_{n}"),
            DerivedKey::Gradient(w) => write!(f, "grad_{w}"),
            DerivedKey::Updated(w) => write!(f, "new_{w}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StateError {
    #[error("unrecognized derived value key `{0}`")]
    UnrecognizedKey(DerivedKey),
    #[error("`{0}` has not been calculated yet")]
    Missing(DerivedKey),
    #[error("`{0}` is not an input node")]
    NotAnInput(NodeId),
    #[error("`{0}` is not an output node")]
    NotAnOutput(NodeId),
}

/// Numeric state of one walkthrough session.
///
/// Inputs, weights, targets and the learning rate are fixed at construction.
/// `calculated` only ever grows: a key can be overwritten but not removed.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkState {
    inputs: BTreeMap<NodeId, f64>,
    weights: [f64; 8],
    targets: BTreeMap<NodeId, f64>,
    learning_rate: f64,
    calculated: BTreeMap<DerivedKey, f64>,
}

impl NetworkState {
    pub fn new(
        inputs: [f64; 2],
        weights: [f64; 8],
        targets: [f64; 2],
        learning_rate: f64,
    ) -> Self {
        Self {
            inputs: [NodeId::I1, NodeId::I2].into_iter().zip(inputs).collect(),
            weights,
            targets: [NodeId::O1, NodeId::O2].into_iter().zip(targets).collect(),
            learning_rate,
            calculated: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &NetworkConfig) -> Self {
        Self::new(
            config.inputs,
            config.weights,
            config.targets,
            config.learning_rate,
        )
    }

    pub fn input(&self, node: NodeId) -> Result<f64, StateError> {
        self.inputs
            .get(&node)
            .copied()
            .ok_or(StateError::NotAnInput(node))
    }

    /// Weights are stored in `WeightId::ALL` order, so every id has a slot.
    pub fn weight(&self, weight: WeightId) -> f64 {
        self.weights[weight.index()]
    }

    pub fn target(&self, node: NodeId) -> Result<f64, StateError> {
        self.targets
            .get(&node)
            .copied()
            .ok_or(StateError::NotAnOutput(node))
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn inputs(&self) -> &BTreeMap<NodeId, f64> {
        &self.inputs
    }

    pub fn weights(&self) -> &[f64; 8] {
        &self.weights
    }

    pub fn calculated_values(&self) -> &BTreeMap<DerivedKey, f64> {
        &self.calculated
    }

    pub fn calculated(&self, key: DerivedKey) -> Option<f64> {
        self.calculated.get(&key).copied()
    }

    /// Like [`calculated`](Self::calculated), but a missing value is an error.
    pub fn require(&self, key: DerivedKey) -> Result<f64, StateError> {
        self.calculated(key).ok_or(StateError::Missing(key))
    }

    pub fn set_calculated(&mut self, key: DerivedKey, value: f64) -> Result<(), StateError> {
        if !key.is_recognized() {
            return Err(StateError::UnrecognizedKey(key));
        }
        self.calculated.insert(key, value);
        Ok(())
    }

    /// Activation a node feeds forward: the raw input for input nodes,
    /// `out_<n>` for the others once it has been calculated.
    pub fn node_value(&self, node: NodeId) -> Option<f64> {
        match node.layer() {
            Layer::Input => self.inputs.get(&node).copied(),
            Layer::Hidden | Layer::Output => self.calculated(DerivedKey::Out(node)),
        }
    }

    /// Same as [`node_value`](Self::node_value) for values a step depends on.
    pub fn require_node_value(&self, node: NodeId) -> Result<f64, StateError> {
        match node.layer() {
            Layer::Input => self.input(node),
            Layer::Hidden | Layer::Output => self.require(DerivedKey::Out(node)),
        }
    }
}
