//! Host commands for nCloth/nRigid per-vertex maps

use crate::models::per_vertex::{GetPerVertexArgs, SetPerVertexArgs};
use crate::services::per_vertex::{GET_COMMAND_NAME, SET_COMMAND_NAME};
use crate::services::PerVertexState;
use crate::settings::{save_settings, PluginSettings};

// -----------------------------------------------------------------------------
// Per-vertex maps
// -----------------------------------------------------------------------------

pub fn get_n_cloth_per_vertex(
    state: &PerVertexState,
    target: Option<String>,
    plug_name: Option<String>,
) -> Result<Vec<f64>, String> {
    let host = state.lock()?;
    host.get_per_vertex(&GetPerVertexArgs { target, plug_name })
        .map_err(|e| {
            log::warn!("{}: {}", GET_COMMAND_NAME, e);
            e.to_string()
        })
}

pub fn set_n_cloth_per_vertex(
    state: &PerVertexState,
    target: Option<String>,
    plug_name: Option<String>,
    vertex_weights: Option<Vec<f64>>,
) -> Result<(), String> {
    let mut host = state.lock()?;
    host.set_per_vertex(&SetPerVertexArgs {
        target,
        plug_name,
        vertex_weights,
    })
    .map_err(|e| {
        log::warn!("{}: {}", SET_COMMAND_NAME, e);
        e.to_string()
    })
}

// -----------------------------------------------------------------------------
// Undo queue
// -----------------------------------------------------------------------------

/// Returns false when there was nothing to undo
pub fn undo(state: &PerVertexState) -> Result<bool, String> {
    state.lock()?.undo().map_err(|e| e.to_string())
}

/// Returns false when there was nothing to redo
pub fn redo(state: &PerVertexState) -> Result<bool, String> {
    state.lock()?.redo().map_err(|e| e.to_string())
}

// -----------------------------------------------------------------------------
// Selection & settings
// -----------------------------------------------------------------------------

pub fn select(state: &PerVertexState, names: Vec<String>) -> Result<(), String> {
    state.lock()?.select(&names).map_err(|e| e.to_string())
}

pub fn get_settings(state: &PerVertexState) -> Result<PluginSettings, String> {
    Ok(state.lock()?.settings().clone())
}

pub fn set_setting(
    state: &PerVertexState,
    key: String,
    value: String,
) -> Result<PluginSettings, String> {
    let mut host = state.lock()?;
    let mut settings = host.settings().clone();
    settings.set(&key, &value)?;
    if let Some(path) = host.settings_path() {
        save_settings(path, &settings)?;
    }
    host.apply_settings(settings.clone());
    Ok(settings)
}
