//! Scene-graph collaborators.
//!
//! The resolver and the per-vertex commands only talk to the scene through
//! these two traits. `memory::Scene` is the in-process implementation.

pub mod loader;
pub mod memory;

pub use memory::Scene;

use crate::error::SceneError;
use crate::models::per_vertex::{DoubleArrayData, PerVertexAttribute};
use crate::models::scene::{NodeId, NodeKind, PlugRef};

/// Read-only queries against the node hierarchy and attribute connections
pub trait SceneGraph {
    /// Type tag of a live node, `None` if the handle no longer resolves
    fn node_kind(&self, node: NodeId) -> Option<NodeKind>;

    fn contains(&self, node: NodeId) -> bool {
        self.node_kind(node).is_some()
    }

    fn node_name(&self, node: NodeId) -> Option<&str>;

    /// Handle of the node with this name, `None` if no such object exists
    fn node_by_name(&self, name: &str) -> Option<NodeId>;

    /// First parent in the hierarchy
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children, in stored order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn has_attribute(&self, node: NodeId, attribute: &str) -> bool;

    /// Logical indices of the existing elements of an array plug, ascending.
    /// The first entry is the element at physical index 0.
    fn element_indices(&self, node: NodeId, attribute: &str) -> Vec<u32>;

    /// Destinations of one element of an array plug, in connection order
    fn destinations(&self, node: NodeId, attribute: &str, element: u32) -> Vec<PlugRef>;

    /// Current selection list, in selection order
    fn active_selection(&self) -> Vec<NodeId>;
}

/// Typed per-vertex array storage on simulation nodes
pub trait AttributeStore {
    /// Container bound to the plug, `None` when unset
    fn double_array(
        &self,
        node: NodeId,
        attribute: PerVertexAttribute,
    ) -> Result<Option<&DoubleArrayData>, SceneError>;

    /// Mutable access to an allocated container, `None` when unset
    fn double_array_mut(
        &mut self,
        node: NodeId,
        attribute: PerVertexAttribute,
    ) -> Result<Option<&mut DoubleArrayData>, SceneError>;

    /// Attach a newly allocated container to the plug
    fn set_double_array(
        &mut self,
        node: NodeId,
        attribute: PerVertexAttribute,
        data: DoubleArrayData,
    ) -> Result<(), SceneError>;
}
