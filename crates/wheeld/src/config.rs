use crate::events::AppEvent;
use async_channel::Sender;
use config::{Environment, File, FileFormat};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use wheel::WheelConfig;
use wheel::protocol::SOCKET_PATH;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Animation ticks per second while the wheel settles.
    pub frame_rate: u32,
    pub socket: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            socket: PathBuf::from(SOCKET_PATH),
        }
    }
}

impl DaemonConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub wheel: WheelConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "wheel", "wheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Built-in defaults, then the user's file, then `WHEEL_*` variables
/// (`WHEEL_WHEEL__DRAG_SPEED=2`).
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("WHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_from(&get_config_path()?)
}

pub fn defaults() -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .build()?;
    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Result<Config, ConfigError> {
    load_config().or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        defaults()
    })
}

/// Writes the built-in defaults to `path` unless a file is already there.
/// Returns whether a file was created.
pub fn write_default_config(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    log::info!("Wrote default config to {}", path.display());
    Ok(true)
}

/// Whether a filesystem event should trigger a reload of `config_path`.
fn touches(event: &notify::Event, config_path: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    relevant && event.paths.iter().any(|p| p == config_path)
}

/// Watches the directory holding `config_path`, not the file itself, so a
/// file replaced by rename is still seen.
fn watch(
    config_path: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let dir = config_path.parent().ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(dir)?;

    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Sends [`AppEvent::ConfigReload`] whenever `config_path` changes, until the
/// event loop goes away. Bursts of events for one save collapse into one
/// reload.
pub async fn watch_config(
    tx: Sender<AppEvent>,
    config_path: PathBuf,
) -> Result<(), ConfigError> {
    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let _watcher = watch(&config_path, bridge_tx)?;
    log::debug!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        let mut reload = match res {
            Ok(event) => touches(&event, &config_path),
            Err(e) => {
                log::warn!("Watch error: {}", e);
                false
            }
        };
        while let Ok(res) = bridge_rx.try_recv() {
            reload |= res.is_ok_and(|event| touches(&event, &config_path));
        }

        if reload && tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}
