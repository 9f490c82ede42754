//! Configuration for the Orbis planetary core.
//!
//! Settings persist to disk as a RON file, every section falls back to its
//! defaults when missing, and command-line flags override what was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, OriginConfig, PlanetConfig, TerrainConfig, TilesConfig,
    default_config_dir,
};
pub use error::ConfigError;
