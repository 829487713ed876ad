use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a node in the instance matrices.
pub type NodeId = usize;

/// Classification of a node in a fixed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Depot,
    Customer,
    ChargingStation,
}

/// A node of the route network. Created once when the topology is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub node_type: NodeType,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id,
            name: name.into(),
            node_type,
        }
    }

    pub fn is_charging_station(&self) -> bool {
        self.node_type == NodeType::ChargingStation
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}; {:?})", self.id, self.node_type)
    }
}
