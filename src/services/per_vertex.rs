//! Reading and writing per-vertex maps on simulation nodes.
//!
//! Both commands validate the plug name before touching the scene, then
//! resolve the target to its nCloth/nRigid node with `NodeResolver`.

use crate::error::{CommandError, SceneError};
use crate::history::UndoableCommand;
use crate::models::per_vertex::{
    DoubleArrayData, GetPerVertexArgs, PerVertexAttribute, SetPerVertexArgs,
};
use crate::models::scene::NodeId;
use crate::scene::{AttributeStore, SceneGraph};
use crate::services::resolver::NodeResolver;

pub const GET_COMMAND_NAME: &str = "getNClothPerVertex";
pub const SET_COMMAND_NAME: &str = "setNClothPerVertex";

/// Pick the command target: the named object, or the first selected one
pub fn selection_target<G: SceneGraph + ?Sized>(
    scene: &G,
    target: Option<&str>,
) -> Result<NodeId, CommandError> {
    match target {
        Some(name) => scene.node_by_name(name).ok_or_else(|| {
            CommandError::InvalidArgument(format!("No object matches name: {}", name))
        }),
        None => scene.active_selection().first().copied().ok_or_else(|| {
            CommandError::InvalidArgument("No object specified and nothing selected".to_string())
        }),
    }
}

// =============================================================================
// getNClothPerVertex
// =============================================================================

/// Read-only query. Never mutates and never produces an undo entry.
#[derive(Debug, Clone)]
pub struct GetPerVertexCommand {
    target: NodeId,
    attribute: PerVertexAttribute,
}

impl GetPerVertexCommand {
    pub fn parse<G: SceneGraph + ?Sized>(
        scene: &G,
        args: &GetPerVertexArgs,
    ) -> Result<Self, CommandError> {
        let attribute = PerVertexAttribute::from_plug_arg(args.plug_name.as_deref())?;
        let target = selection_target(scene, args.target.as_deref())?;
        Ok(Self { target, attribute })
    }

    /// Stored weights in vertex order. An unset map yields an empty vec, not zeros.
    pub fn execute<S: SceneGraph + AttributeStore + ?Sized>(
        &self,
        scene: &S,
        resolver: &NodeResolver,
    ) -> Result<Vec<f64>, CommandError> {
        let node = resolver
            .resolve(scene, self.target)
            .ok_or(CommandError::NoRelationship)?;
        let weights = scene
            .double_array(node, self.attribute)?
            .map(DoubleArrayData::to_vec)
            .unwrap_or_default();
        Ok(weights)
    }
}

/// Parse and run a get in one step
pub fn get_per_vertex<S: SceneGraph + AttributeStore + ?Sized>(
    scene: &S,
    resolver: &NodeResolver,
    args: &GetPerVertexArgs,
) -> Result<Vec<f64>, CommandError> {
    GetPerVertexCommand::parse(scene, args)?.execute(scene, resolver)
}

// =============================================================================
// setNClothPerVertex
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetCommandPhase {
    Unexecuted,
    Applied,
    Undone,
}

/// What the map looked like before the last apply
#[derive(Debug, Clone, PartialEq)]
pub enum PreviousWeights {
    NotCaptured,
    /// No container existed; undo zeroes the one that was created
    WasUnset,
    Snapshot(Vec<f64>),
}

/// Undoable write of one per-vertex map.
///
/// Only the target handle is kept between calls. The simulation node is
/// resolved again on every apply and undo so that graph edits made in
/// between are seen.
#[derive(Debug, Clone)]
pub struct SetPerVertexCommand {
    target: NodeId,
    attribute: PerVertexAttribute,
    weights: Vec<f64>,
    previous: PreviousWeights,
    phase: SetCommandPhase,
    resolver: NodeResolver,
}

impl SetPerVertexCommand {
    pub fn parse<G: SceneGraph + ?Sized>(
        scene: &G,
        args: &SetPerVertexArgs,
        resolver: NodeResolver,
    ) -> Result<Self, CommandError> {
        let attribute = PerVertexAttribute::from_plug_arg(args.plug_name.as_deref())?;
        let weights = args.vertex_weights.clone().ok_or_else(|| {
            CommandError::InvalidArgument("vertexWeight flag must be set".to_string())
        })?;
        let target = selection_target(scene, args.target.as_deref())?;
        Ok(Self {
            target,
            attribute,
            weights,
            previous: PreviousWeights::NotCaptured,
            phase: SetCommandPhase::Unexecuted,
            resolver,
        })
    }

    pub fn phase(&self) -> SetCommandPhase {
        self.phase
    }

    pub fn previous(&self) -> &PreviousWeights {
        &self.previous
    }

    /// First invocation. On error the command stays `Unexecuted` and the
    /// scene is untouched.
    pub fn do_it<S: SceneGraph + AttributeStore + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<(), CommandError> {
        if self.phase != SetCommandPhase::Unexecuted {
            log::warn!("{} already invoked", SET_COMMAND_NAME);
            return Ok(());
        }
        self.apply(scene)
    }

    /// Write the weights: allocate the container if the map is unset,
    /// otherwise snapshot it and overwrite the overlapping prefix in place.
    fn apply<S: SceneGraph + AttributeStore + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<(), CommandError> {
        let node = self
            .resolver
            .resolve(&*scene, self.target)
            .ok_or(CommandError::NoRelationship)?;

        match scene.double_array_mut(node, self.attribute)? {
            Some(data) => {
                let snapshot = data.to_vec();
                let count = self.weights.len().min(data.len());
                if count < self.weights.len() {
                    log::debug!(
                        "{}: {} weights for {} slots, extra weights ignored",
                        self.attribute,
                        self.weights.len(),
                        data.len()
                    );
                }
                for (index, value) in self.weights.iter().take(count).enumerate() {
                    data.set(index, *value);
                }
                self.previous = PreviousWeights::Snapshot(snapshot);
            }
            None => {
                scene.set_double_array(
                    node,
                    self.attribute,
                    DoubleArrayData::new(self.weights.clone()),
                )?;
                self.previous = PreviousWeights::WasUnset;
            }
        }

        log::info!(
            "{} {} on {} ({} weights)",
            SET_COMMAND_NAME,
            self.attribute,
            scene.node_name(node).unwrap_or("<unnamed>"),
            self.weights.len()
        );
        self.phase = SetCommandPhase::Applied;
        Ok(())
    }

    fn restore<S: SceneGraph + AttributeStore + ?Sized>(
        &mut self,
        scene: &mut S,
    ) -> Result<(), CommandError> {
        if self.phase != SetCommandPhase::Applied {
            log::debug!("{}: nothing to undo", SET_COMMAND_NAME);
            return Ok(());
        }
        let node = self
            .resolver
            .resolve(&*scene, self.target)
            .ok_or(CommandError::NoRelationship)?;

        let name = scene.node_name(node).unwrap_or("<unnamed>").to_string();
        let Some(data) = scene.double_array_mut(node, self.attribute)? else {
            return Err(SceneError::MissingAttribute {
                node: name,
                attribute: self.attribute.to_string(),
            }
            .into());
        };
        match &self.previous {
            // The container stays allocated; it is zeroed, not removed.
            PreviousWeights::WasUnset => {
                for index in 0..data.len() {
                    data.set(index, 0.0);
                }
            }
            PreviousWeights::Snapshot(previous) => {
                let count = previous.len().min(data.len());
                for (index, value) in previous.iter().take(count).enumerate() {
                    data.set(index, *value);
                }
            }
            PreviousWeights::NotCaptured => {}
        }

        self.phase = SetCommandPhase::Undone;
        Ok(())
    }
}

impl<S: SceneGraph + AttributeStore + ?Sized> UndoableCommand<S> for SetPerVertexCommand {
    fn name(&self) -> &str {
        SET_COMMAND_NAME
    }

    fn undo_it(&mut self, scene: &mut S) -> Result<(), CommandError> {
        self.restore(scene)
    }

    fn redo_it(&mut self, scene: &mut S) -> Result<(), CommandError> {
        if self.phase != SetCommandPhase::Undone {
            log::debug!("{}: nothing to redo", SET_COMMAND_NAME);
            return Ok(());
        }
        self.apply(scene)
    }
}
