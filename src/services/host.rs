//! Host-side state: the scene, the undo queue and the settings the commands
//! run against.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::CommandError;
use crate::history::UndoQueue;
use crate::models::per_vertex::{GetPerVertexArgs, SetPerVertexArgs};
use crate::scene::{Scene, SceneGraph};
use crate::services::per_vertex::{get_per_vertex, SetPerVertexCommand};
use crate::services::resolver::NodeResolver;
use crate::settings::PluginSettings;

pub struct PerVertexHost {
    scene: Scene,
    undo_queue: UndoQueue<Scene>,
    resolver: NodeResolver,
    settings: PluginSettings,
    settings_path: Option<PathBuf>,
}

impl PerVertexHost {
    pub fn new(scene: Scene, settings: PluginSettings) -> Self {
        Self {
            scene,
            undo_queue: UndoQueue::new(settings.undo_queue_depth),
            resolver: NodeResolver::new(&settings),
            settings,
            settings_path: None,
        }
    }

    /// File that settings changes are written back to
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = Some(path);
        self
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Direct scene edits. The undo queue is left alone; commands re-resolve
    /// their targets on undo/redo.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn undo_queue(&self) -> &UndoQueue<Scene> {
        &self.undo_queue
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: PluginSettings) {
        if settings.log_level != self.settings.log_level {
            crate::reload_logging(&settings);
        }
        self.undo_queue.set_depth(settings.undo_queue_depth);
        self.resolver = NodeResolver::new(&settings);
        self.settings = settings;
    }

    pub fn get_per_vertex(&self, args: &GetPerVertexArgs) -> Result<Vec<f64>, CommandError> {
        get_per_vertex(&self.scene, &self.resolver, args)
    }

    /// Apply a set and record it for undo. Nothing is recorded on failure.
    pub fn set_per_vertex(&mut self, args: &SetPerVertexArgs) -> Result<(), CommandError> {
        let mut command = SetPerVertexCommand::parse(&self.scene, args, self.resolver.clone())?;
        command.do_it(&mut self.scene)?;
        self.undo_queue.push(Box::new(command));
        Ok(())
    }

    pub fn undo(&mut self) -> Result<bool, CommandError> {
        self.undo_queue.undo(&mut self.scene)
    }

    pub fn redo(&mut self) -> Result<bool, CommandError> {
        self.undo_queue.redo(&mut self.scene)
    }

    /// Replace the active selection by node names
    pub fn select(&mut self, names: &[String]) -> Result<(), CommandError> {
        let nodes = names
            .iter()
            .map(|name| {
                self.scene.node_by_name(name).ok_or_else(|| {
                    CommandError::InvalidArgument(format!("No object matches name: {}", name))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.scene.select(&nodes)?;
        Ok(())
    }
}

/// Serializes command dispatch. Each command holds the lock for its whole
/// resolve + read + write sequence.
pub struct PerVertexState(pub Mutex<PerVertexHost>);

impl PerVertexState {
    pub fn new(host: PerVertexHost) -> Self {
        Self(Mutex::new(host))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, PerVertexHost>, String> {
        self.0
            .lock()
            .map_err(|_| "Per-vertex state lock poisoned".to_string())
    }
}
