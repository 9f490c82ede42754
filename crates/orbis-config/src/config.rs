//! Configuration sections with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub planet: PlanetConfig,
    pub origin: OriginConfig,
    pub tiles: TilesConfig,
    pub terrain: TerrainConfig,
    pub debug: DebugConfig,
}

/// The reference sphere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet radius in meters.
    pub radius_m: f64,
}

/// Floating origin behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OriginConfig {
    /// Render units per meter. Must be positive.
    pub render_scale: f64,
    /// Distance the focus may drift from the origin before a rebase is queued.
    pub rebase_threshold_m: f64,
}

/// Tile sampling and level of detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilesConfig {
    /// Samples per tile along `u`, edges included.
    pub resolution_u: usize,
    /// Samples per tile along `v`, edges included.
    pub resolution_v: usize,
    /// Store tile points relative to the tile center.
    pub center_relative: bool,
    /// Generation threads (0 = pick from the CPU count).
    pub worker_threads: usize,
    /// Deepest quadtree level.
    pub max_level: usize,
    /// Split when the focus is within `split_factor` tile edges of a center.
    pub split_factor: f64,
}

/// Procedural terrain used when no other surface source is wired in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    pub octaves: u32,
    /// First-octave amplitude in meters.
    pub amplitude_m: f64,
    /// First-octave frequency in cycles per planet radius.
    pub base_frequency: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for the JSON log file written by debug builds.
    pub log_dir: Option<PathBuf>,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius_m: 6_378_000.0,
        }
    }
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            render_scale: 1.0,
            rebase_threshold_m: 5_000.0,
        }
    }
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            resolution_u: 17,
            resolution_v: 17,
            center_relative: true,
            worker_threads: 0,
            max_level: 8,
            split_factor: 2.0,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            amplitude_m: 4_000.0,
            base_frequency: 2.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// `<platform config dir>/orbis`, if the platform has one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("orbis"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                    path: config_path.clone(),
                    source,
                })?;
            let config: Config =
                ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
                    path: config_path.clone(),
                    source,
                })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path,
            source,
        })
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.clone(),
                source,
            })?;
        let new_config: Config =
            ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: config_path,
                source,
            })?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
