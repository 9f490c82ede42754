//! Headless demo: a focus point skims the planet surface while the core keeps
//! the floating origin, the tile quadtree and the generated tiles in step.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p orbis-demo -- --ticks 600 --rebase-threshold 2000`.

mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use orbis_config::{CliArgs, Config, default_config_dir};
use tracing::{error, info};

use crate::session::Session;

const DEFAULT_TICKS: u32 = 600;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".orbis"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config
        .debug
        .log_dir
        .clone()
        .unwrap_or_else(|| config_dir.join("logs"));
    orbis_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);
    info!(config_dir = %config_dir.display(), ticks, "Starting Orbis demo");

    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to start session: {e}");
            return ExitCode::FAILURE;
        }
    };

    for _ in 0..ticks {
        session.tick();
    }
    let summary = session.finish();

    info!(
        ticks = summary.ticks,
        rebases = summary.rebases,
        tiles_generated = summary.tiles_generated,
        tiles_failed = summary.tiles_failed,
        leaves = summary.leaves,
        resident = summary.resident,
        focus = %summary.focus,
        focus_render_offset = summary.focus_render_offset,
        "Demo finished"
    );
    ExitCode::SUCCESS
}
