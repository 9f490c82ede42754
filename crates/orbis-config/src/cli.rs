//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orbis command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Floating-origin planetary tiling demo")]
pub struct CliArgs {
    /// Planet radius in meters.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Samples per tile edge (applied to both u and v).
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Render units per meter.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Rebase once the focus drifts this far from the origin (meters).
    #[arg(long)]
    pub rebase_threshold: Option<f64>,

    /// Tile generation worker threads (0 = auto).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Number of simulation ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `ticks` and `config` are run options, not persisted settings, and are
    /// left for the caller.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(radius) = args.radius {
            self.planet.radius_m = radius;
        }
        if let Some(res) = args.resolution {
            self.tiles.resolution_u = res;
            self.tiles.resolution_v = res;
        }
        if let Some(scale) = args.scale {
            self.origin.render_scale = scale;
        }
        if let Some(threshold) = args.rebase_threshold {
            self.origin.rebase_threshold_m = threshold;
        }
        if let Some(workers) = args.workers {
            self.tiles.worker_threads = workers;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            radius: Some(1_737_400.0),
            resolution: Some(9),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.planet.radius_m, 1_737_400.0);
        assert_eq!(config.tiles.resolution_u, 9);
        assert_eq!(config.tiles.resolution_v, 9);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.origin.render_scale, 1.0);
        assert_eq!(config.tiles.worker_threads, 0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "orbis",
            "--scale",
            "0.5",
            "--rebase-threshold",
            "100",
            "--workers",
            "3",
            "--ticks",
            "20",
        ]);
        assert_eq!(args.scale, Some(0.5));
        assert_eq!(args.rebase_threshold, Some(100.0));
        assert_eq!(args.workers, Some(3));
        assert_eq!(args.ticks, Some(20));
        assert_eq!(args.config, None);

        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.origin.render_scale, 0.5);
        assert_eq!(config.origin.rebase_threshold_m, 100.0);
        assert_eq!(config.tiles.worker_threads, 3);
    }
}
