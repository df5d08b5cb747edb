//! Finds the nCloth/nRigid node that belongs to an arbitrary scene object.
//!
//! The selection may be the simulation node itself, a transform, or a shape
//! under a transform. Only the transform's direct children are examined: a
//! child that is a simulation node wins outright, otherwise the first element
//! of a child shape's output mesh plug is followed one hop downstream.

use crate::models::scene::{NodeId, WORLD_MESH_ATTRIBUTE};
use crate::scene::SceneGraph;
use crate::settings::PluginSettings;

#[derive(Debug, Clone)]
pub struct NodeResolver {
    output_mesh_attribute: String,
}

impl Default for NodeResolver {
    fn default() -> Self {
        Self {
            output_mesh_attribute: WORLD_MESH_ATTRIBUTE.to_string(),
        }
    }
}

impl NodeResolver {
    pub fn new(settings: &PluginSettings) -> Self {
        Self {
            output_mesh_attribute: settings.output_mesh_attribute.clone(),
        }
    }

    /// Resolve `start` to its simulation node. `None` is the ordinary
    /// "nothing related" outcome, not a fault.
    ///
    /// When several simulation nodes are reachable the first one in child
    /// order is returned.
    pub fn resolve<G: SceneGraph + ?Sized>(&self, scene: &G, start: NodeId) -> Option<NodeId> {
        let kind = scene.node_kind(start)?;
        if !kind.is_dag() {
            log::debug!("resolve: {} is not a DAG node", start);
            return None;
        }
        if kind.is_simulation() {
            return Some(start);
        }

        let transform = if kind.is_shape() {
            match scene.parent(start) {
                Some(parent) => parent,
                None => {
                    log::debug!("resolve: shape {} has no parent transform", start);
                    return None;
                }
            }
        } else {
            start
        };

        for child in scene.children(transform) {
            let Some(child_kind) = scene.node_kind(child) else {
                continue;
            };
            if child_kind.is_simulation() {
                return Some(child);
            }
            if !child_kind.is_shape() {
                continue;
            }
            if let Some(found) = self.follow_output_mesh(scene, child) {
                return Some(found);
            }
        }

        log::debug!("resolve: no simulation node under {}", transform);
        None
    }

    fn follow_output_mesh<G: SceneGraph + ?Sized>(&self, scene: &G, shape: NodeId) -> Option<NodeId> {
        if !scene.has_attribute(shape, &self.output_mesh_attribute) {
            return None;
        }
        let first_element = *scene
            .element_indices(shape, &self.output_mesh_attribute)
            .first()?;

        scene
            .destinations(shape, &self.output_mesh_attribute, first_element)
            .into_iter()
            .map(|plug| plug.node)
            .find(|node| {
                scene
                    .node_kind(*node)
                    .map(|kind| kind.is_simulation())
                    .unwrap_or(false)
            })
    }
}
