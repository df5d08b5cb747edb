//! Builds an in-memory `Scene` from its JSON description.

use std::path::Path;

use super::memory::Scene;
use super::AttributeStore;
use crate::error::SceneError;
use crate::models::per_vertex::PerVertexAttribute;
use crate::models::scene::{NodeId, SceneDescription};

impl Scene {
    pub fn from_description(description: &SceneDescription) -> Result<Self, SceneError> {
        let mut scene = Scene::new();

        for node in &description.nodes {
            let id = scene.add_node(&node.name, node.kind)?;
            for attribute in &node.attributes {
                scene.add_attribute(id, attribute)?;
            }
            for (plug_name, values) in &node.per_vertex {
                let attribute: PerVertexAttribute = plug_name
                    .parse()
                    .map_err(|_| SceneError::Load(format!("unknown per-vertex plug {}", plug_name)))?;
                scene.set_double_array(id, attribute, values.clone().into())?;
            }
        }

        // Parenting runs after every node exists so children may be declared
        // before their parent.
        for node in &description.nodes {
            let parent = scene.require(&node.name)?;
            for child_name in &node.children {
                let child = scene.require(child_name)?;
                scene.parent_to(child, parent)?;
            }
        }

        for connection in &description.connections {
            let source = scene.require(&connection.source)?;
            let destination = scene.require(&connection.destination)?;
            scene.connect(
                source,
                &connection.source_attribute,
                connection.element,
                destination,
                &connection.destination_attribute,
            )?;
        }

        let selection = description
            .selection
            .iter()
            .map(|name| scene.require(name))
            .collect::<Result<Vec<_>, _>>()?;
        scene.select(&selection)?;

        log::debug!(
            "Loaded scene: {} nodes, {} connections",
            scene.len(),
            description.connections.len()
        );
        Ok(scene)
    }

    fn require(&self, name: &str) -> Result<NodeId, SceneError> {
        self.find_by_name(name)
            .ok_or_else(|| SceneError::UnknownName(name.to_string()))
    }
}

pub fn parse_scene(json: &str) -> Result<Scene, SceneError> {
    let description: SceneDescription =
        serde_json::from_str(json).map_err(|e| SceneError::Load(e.to_string()))?;
    Scene::from_description(&description)
}

pub fn load_scene_file(path: &Path) -> Result<Scene, SceneError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| SceneError::Load(format!("{}: {}", path.display(), e)))?;
    parse_scene(&json)
}
