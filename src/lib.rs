use std::sync::RwLock;

use log::Log;
use once_cell::sync::OnceCell;

pub mod commands;
pub mod error;
pub mod history;
pub mod models;
pub mod scene;
pub mod services;
pub mod settings;

pub use error::{CommandError, SceneError};
pub use models::per_vertex::{DoubleArrayData, PerVertexAttribute};
pub use models::scene::{NodeId, NodeKind};
pub use scene::Scene;
pub use services::{NodeResolver, PerVertexHost, PerVertexState};
pub use settings::PluginSettings;

static LOGGER: OnceCell<RwLock<env_logger::Logger>> = OnceCell::new();
static PLUGIN_LOGGER: PluginLogger = PluginLogger;

/// `log` backend that forwards to an `env_logger::Logger` which can be
/// replaced after installation.
struct PluginLogger;

impl log::Log for PluginLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match LOGGER.get().map(|logger| logger.read()) {
            Some(Ok(logger)) => logger.enabled(metadata),
            _ => false,
        }
    }

    fn log(&self, record: &log::Record) {
        if let Some(Ok(logger)) = LOGGER.get().map(|logger| logger.read()) {
            logger.log(record);
        }
    }

    fn flush(&self) {
        if let Some(Ok(logger)) = LOGGER.get().map(|logger| logger.read()) {
            logger.flush();
        }
    }
}

/// Install the `env_logger` backend for the `log` facade, filtered by
/// `settings.log_level`. `RUST_LOG` still wins when set. Calling it again is a no-op.
pub fn init_logging(settings: &PluginSettings) {
    let env = env_logger::Env::default().default_filter_or(settings.log_level.as_str());
    let logger = env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .build();
    let max_level = logger.filter();
    if LOGGER.set(RwLock::new(logger)).is_err() {
        return;
    }
    if log::set_logger(&PLUGIN_LOGGER).is_ok() {
        log::set_max_level(max_level);
    }
}

/// Swap the installed filter for `settings.log_level`. Does nothing before
/// `init_logging`.
pub fn reload_logging(settings: &PluginSettings) {
    let Some(current) = LOGGER.get() else {
        return;
    };
    let logger = env_logger::Builder::new()
        .parse_filters(&settings.log_level)
        .format_timestamp_millis()
        .build();
    let max_level = logger.filter();
    match current.write() {
        Ok(mut current) => *current = logger,
        Err(_) => return,
    }
    log::set_max_level(max_level);
    log::info!("Log filter set to {}", settings.log_level);
}

/// Load settings from the default location, install logging and build a
/// host around `scene`
pub fn setup(scene: Scene) -> Result<PerVertexState, String> {
    let path = settings::default_settings_path();
    let settings = match &path {
        Some(path) => settings::load_settings(path)?,
        None => PluginSettings::default(),
    };
    init_logging(&settings);
    log::info!(
        "Per-vertex commands ready: {} nodes, undo depth {}",
        scene.len(),
        settings.undo_queue_depth
    );
    let mut host = PerVertexHost::new(scene, settings);
    if let Some(path) = path {
        host = host.with_settings_path(path);
    }
    Ok(PerVertexState::new(host))
}
