use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output mesh attribute of renderable shapes
pub const WORLD_MESH_ATTRIBUTE: &str = "worldMesh";

/// Mesh input attribute of simulation nodes
pub const INPUT_MESH_ATTRIBUTE: &str = "inputMesh";

/// Stable handle to a scene node.
///
/// Handles are identities, not pointers: a handle stays valid across any
/// graph edit and simply stops resolving once its node is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Node type tag. Capabilities are queried through the methods below rather
/// than by matching on a type hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Transform,
    Shape,
    #[serde(rename = "ncloth")]
    NCloth,
    #[serde(rename = "nrigid")]
    NRigid,
    /// Plain dependency node (no place in the DAG hierarchy)
    #[serde(other)]
    Dependency,
}

impl NodeKind {
    /// Node can be parented and has a position in the hierarchy
    pub fn is_dag(self) -> bool {
        !matches!(self, NodeKind::Dependency)
    }

    /// Node is a leaf under a transform. nCloth and nRigid nodes are shapes too.
    pub fn is_shape(self) -> bool {
        matches!(self, NodeKind::Shape | NodeKind::NCloth | NodeKind::NRigid)
    }

    pub fn is_simulation(self) -> bool {
        matches!(self, NodeKind::NCloth | NodeKind::NRigid)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Transform => write!(f, "transform"),
            NodeKind::Shape => write!(f, "shape"),
            NodeKind::NCloth => write!(f, "ncloth"),
            NodeKind::NRigid => write!(f, "nrigid"),
            NodeKind::Dependency => write!(f, "dependency"),
        }
    }
}

/// Destination end of an attribute connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlugRef {
    pub node: NodeId,
    pub attribute: String,
}

// =============================================================================
// Serialized scene description
// =============================================================================

/// JSON form of a scene, used to build an in-memory `Scene`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    pub nodes: Vec<NodeDescription>,
    #[serde(default)]
    pub connections: Vec<ConnectionDescription>,
    /// Active selection, by node name
    #[serde(default)]
    pub selection: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    pub name: String,
    pub kind: NodeKind,
    /// Child node names, in stored order
    #[serde(default)]
    pub children: Vec<String>,
    /// Extra attribute names the node exposes
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Per-vertex containers that are already allocated, keyed by plug name
    #[serde(default)]
    pub per_vertex: HashMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDescription {
    pub source: String,
    pub source_attribute: String,
    #[serde(default)]
    pub element: u32,
    pub destination: String,
    pub destination_attribute: String,
}
