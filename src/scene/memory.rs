use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::{AttributeStore, SceneGraph};
use crate::error::SceneError;
use crate::models::per_vertex::{DoubleArrayData, PerVertexAttribute};
use crate::models::scene::{
    NodeId, NodeKind, PlugRef, INPUT_MESH_ATTRIBUTE, WORLD_MESH_ATTRIBUTE,
};

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub attributes: Vec<String>,
    per_vertex: HashMap<PerVertexAttribute, DoubleArrayData>,
}

impl SceneNode {
    fn new(name: &str, kind: NodeKind) -> Self {
        let attributes = match kind {
            NodeKind::Shape => vec![WORLD_MESH_ATTRIBUTE.to_string()],
            NodeKind::NCloth | NodeKind::NRigid => vec![INPUT_MESH_ATTRIBUTE.to_string()],
            NodeKind::Transform | NodeKind::Dependency => Vec::new(),
        };
        Self {
            id: NodeId::new(),
            name: name.to_string(),
            kind,
            attributes,
            per_vertex: HashMap::new(),
        }
    }

    fn has_attribute(&self, attribute: &str) -> bool {
        if self.attributes.iter().any(|a| a == attribute) {
            return true;
        }
        self.kind.is_simulation() && attribute.parse::<PerVertexAttribute>().is_ok()
    }

    fn missing(&self, attribute: &str) -> SceneError {
        SceneError::MissingAttribute {
            node: self.name.clone(),
            attribute: attribute.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum SceneEdge {
    /// Parent -> child
    Child { seq: u64 },
    /// Source plug element -> destination plug
    Connection {
        source_attribute: String,
        element: u32,
        destination_attribute: String,
        seq: u64,
    },
}

/// In-memory scene graph.
///
/// Nodes live in a `StableDiGraph` so that deleting one node never shifts
/// the storage of the others; callers only ever see `NodeId` handles.
/// Edge insertion order is tracked with a sequence number because petgraph
/// iterates adjacency lists newest-first.
#[derive(Debug, Default)]
pub struct Scene {
    graph: StableDiGraph<SceneNode, SceneEdge>,
    handles: HashMap<NodeId, NodeIndex>,
    names: HashMap<String, NodeId>,
    selection: Vec<NodeId>,
    next_seq: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn add_node(&mut self, name: &str, kind: NodeKind) -> Result<NodeId, SceneError> {
        if self.names.contains_key(name) {
            return Err(SceneError::DuplicateName(name.to_string()));
        }
        let node = SceneNode::new(name, kind);
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.handles.insert(id, idx);
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Convenience for building the usual transform + shape pair
    pub fn add_transform_with_shape(
        &mut self,
        transform_name: &str,
        shape_name: &str,
        shape_kind: NodeKind,
    ) -> Result<(NodeId, NodeId), SceneError> {
        let transform = self.add_node(transform_name, NodeKind::Transform)?;
        let shape = self.add_node(shape_name, shape_kind)?;
        self.parent_to(shape, transform)?;
        Ok((transform, shape))
    }

    pub fn add_attribute(&mut self, node: NodeId, attribute: &str) -> Result<(), SceneError> {
        let node = self.node_mut(node)?;
        if !node.has_attribute(attribute) {
            node.attributes.push(attribute.to_string());
        }
        Ok(())
    }

    pub fn node(&self, node: NodeId) -> Option<&SceneNode> {
        self.handles
            .get(&node)
            .and_then(|idx| self.graph.node_weight(*idx))
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Parent `child` under `parent`, detaching it from any previous parent.
    /// The child is appended after the parent's existing children.
    pub fn parent_to(&mut self, child: NodeId, parent: NodeId) -> Result<(), SceneError> {
        let child_idx = self.index(child)?;
        let parent_idx = self.index(parent)?;

        let previous: Vec<_> = self
            .graph
            .edges_directed(child_idx, Direction::Incoming)
            .filter(|edge| matches!(edge.weight(), SceneEdge::Child { .. }))
            .map(|edge| edge.id())
            .collect();
        for edge in previous {
            self.graph.remove_edge(edge);
        }

        let seq = self.bump_seq();
        self.graph.add_edge(parent_idx, child_idx, SceneEdge::Child { seq });
        Ok(())
    }

    /// Connect element `element` of `source.source_attribute` to
    /// `destination.destination_attribute`
    pub fn connect(
        &mut self,
        source: NodeId,
        source_attribute: &str,
        element: u32,
        destination: NodeId,
        destination_attribute: &str,
    ) -> Result<(), SceneError> {
        let source_idx = self.index(source)?;
        let destination_idx = self.index(destination)?;

        let source_node = &self.graph[source_idx];
        if !source_node.has_attribute(source_attribute) {
            return Err(source_node.missing(source_attribute));
        }
        let destination_node = &self.graph[destination_idx];
        if !destination_node.has_attribute(destination_attribute) {
            return Err(destination_node.missing(destination_attribute));
        }

        let seq = self.bump_seq();
        self.graph.add_edge(
            source_idx,
            destination_idx,
            SceneEdge::Connection {
                source_attribute: source_attribute.to_string(),
                element,
                destination_attribute: destination_attribute.to_string(),
                seq,
            },
        );
        Ok(())
    }

    /// Delete a node together with its hierarchy and connection edges.
    /// Outstanding handles to it stop resolving; all other handles are unaffected.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), SceneError> {
        let idx = self.index(node)?;
        if let Some(removed) = self.graph.remove_node(idx) {
            self.names.remove(&removed.name);
        }
        self.handles.remove(&node);
        self.selection.retain(|selected| *selected != node);
        Ok(())
    }

    /// Replace the active selection
    pub fn select(&mut self, nodes: &[NodeId]) -> Result<(), SceneError> {
        if let Some(missing) = nodes.iter().find(|node| !self.handles.contains_key(*node)) {
            return Err(SceneError::UnknownNode(*missing));
        }
        self.selection = nodes.to_vec();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn index(&self, node: NodeId) -> Result<NodeIndex, SceneError> {
        self.handles
            .get(&node)
            .copied()
            .ok_or(SceneError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut SceneNode, SceneError> {
        let idx = self.index(node)?;
        self.graph
            .node_weight_mut(idx)
            .ok_or(SceneError::UnknownNode(node))
    }

    fn simulation_node(
        &self,
        node: NodeId,
        attribute: PerVertexAttribute,
    ) -> Result<&SceneNode, SceneError> {
        let idx = self.index(node)?;
        let scene_node = &self.graph[idx];
        if !scene_node.kind.is_simulation() {
            return Err(scene_node.missing(attribute.plug_name()));
        }
        Ok(scene_node)
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn connections_from(
        &self,
        node: NodeId,
        attribute: &str,
    ) -> Vec<(u32, u64, NodeIndex, String)> {
        let Some(idx) = self.handles.get(&node).copied() else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| match edge.weight() {
                SceneEdge::Connection {
                    source_attribute,
                    element,
                    destination_attribute,
                    seq,
                } if source_attribute == attribute => {
                    Some((*element, *seq, edge.target(), destination_attribute.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

impl SceneGraph for Scene {
    fn node_kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node(node).map(|n| n.kind)
    }

    fn node_name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.name.as_str())
    }

    fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.find_by_name(name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let idx = *self.handles.get(&node)?;
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| match edge.weight() {
                SceneEdge::Child { seq } => Some((*seq, edge.source())),
                _ => None,
            })
            .min_by_key(|(seq, _)| *seq)
            .map(|(_, parent)| self.graph[parent].id)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Some(idx) = self.handles.get(&node).copied() else {
            return Vec::new();
        };
        let mut children: Vec<(u64, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter_map(|edge| match edge.weight() {
                SceneEdge::Child { seq } => Some((*seq, edge.target())),
                _ => None,
            })
            .collect();
        children.sort_by_key(|(seq, _)| *seq);
        children
            .into_iter()
            .map(|(_, child)| self.graph[child].id)
            .collect()
    }

    fn has_attribute(&self, node: NodeId, attribute: &str) -> bool {
        self.node(node)
            .map(|n| n.has_attribute(attribute))
            .unwrap_or(false)
    }

    fn element_indices(&self, node: NodeId, attribute: &str) -> Vec<u32> {
        let mut indices: Vec<u32> = self
            .connections_from(node, attribute)
            .into_iter()
            .map(|(element, _, _, _)| element)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    fn destinations(&self, node: NodeId, attribute: &str, element: u32) -> Vec<PlugRef> {
        let mut matching: Vec<_> = self
            .connections_from(node, attribute)
            .into_iter()
            .filter(|(e, _, _, _)| *e == element)
            .collect();
        matching.sort_by_key(|(_, seq, _, _)| *seq);
        matching
            .into_iter()
            .map(|(_, _, target, destination_attribute)| PlugRef {
                node: self.graph[target].id,
                attribute: destination_attribute,
            })
            .collect()
    }

    fn active_selection(&self) -> Vec<NodeId> {
        self.selection.clone()
    }
}

impl AttributeStore for Scene {
    fn double_array(
        &self,
        node: NodeId,
        attribute: PerVertexAttribute,
    ) -> Result<Option<&DoubleArrayData>, SceneError> {
        let scene_node = self.simulation_node(node, attribute)?;
        Ok(scene_node.per_vertex.get(&attribute))
    }

    fn double_array_mut(
        &mut self,
        node: NodeId,
        attribute: PerVertexAttribute,
    ) -> Result<Option<&mut DoubleArrayData>, SceneError> {
        let scene_node = self.node_mut(node)?;
        if !scene_node.kind.is_simulation() {
            return Err(scene_node.missing(attribute.plug_name()));
        }
        Ok(scene_node.per_vertex.get_mut(&attribute))
    }

    fn set_double_array(
        &mut self,
        node: NodeId,
        attribute: PerVertexAttribute,
        data: DoubleArrayData,
    ) -> Result<(), SceneError> {
        let scene_node = self.node_mut(node)?;
        if !scene_node.kind.is_simulation() {
            return Err(scene_node.missing(attribute.plug_name()));
        }
        scene_node.per_vertex.insert(attribute, data);
        Ok(())
    }
}
