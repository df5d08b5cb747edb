use std::fmt;

use crate::models::scene::NodeId;

/// Error type for scene-graph and attribute-container access
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Handle does not refer to a live node
    UnknownNode(NodeId),
    /// Node name is not present in the scene
    UnknownName(String),
    /// Node exists but does not carry the requested attribute
    MissingAttribute { node: String, attribute: String },
    /// Two nodes were declared with the same name
    DuplicateName(String),
    /// Scene description could not be read or parsed
    Load(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownNode(id) => write!(f, "Node {} does not exist", id),
            SceneError::UnknownName(name) => write!(f, "No object matches name: {}", name),
            SceneError::MissingAttribute { node, attribute } => {
                write!(f, "Node {} has no attribute {}", node, attribute)
            }
            SceneError::DuplicateName(name) => write!(f, "Duplicate node name: {}", name),
            SceneError::Load(msg) => write!(f, "Failed to load scene: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

/// Error type for the per-vertex commands
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Bad or missing attribute name, missing required parameter, bad target
    InvalidArgument(String),
    /// Selection does not resolve to an nCloth or nRigid node
    NoRelationship,
    /// Scene collaborator failed
    Scene(SceneError),
}

impl From<SceneError> for CommandError {
    fn from(e: SceneError) -> Self {
        CommandError::Scene(e)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidArgument(msg) => write!(f, "{}", msg),
            CommandError::NoRelationship => {
                write!(f, "Selection has no relationship with nObjects")
            }
            CommandError::Scene(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CommandError {}
