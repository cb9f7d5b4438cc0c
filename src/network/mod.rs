pub mod format;
pub mod state;
pub mod topology;

pub use state::{DerivedKey, NetworkState, StateError};
pub use topology::{Edge, Layer, NodeId, Topology, WeightId};
