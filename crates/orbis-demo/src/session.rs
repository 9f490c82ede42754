//! One simulated flight: per-tick origin upkeep, LOD refinement, background
//! tile generation and render-space handoff.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::Arc;

use orbis_config::Config;
use orbis_cubesphere::{CubeSphereQuadtree, LodSettings, TileCode, refine};
use orbis_math::{CartesianVector, GeodeticPoint};
use orbis_origin::{FloatingOrigin, RebasePolicy};
use orbis_tiles::{
    NoiseParams, NoiseSurface, RenderTile, SharedProvider, Tile, TileGenerator, TileRequest,
    TileSettings, TileSpace, default_thread_count,
};
use tracing::{debug, info, warn};

/// Simulated seconds per tick.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Ground speed of the focus point, meters per second.
const FOCUS_SPEED_M_S: f64 = 15_000.0;

/// Height of the focus point above the reference sphere.
const FOCUS_ALTITUDE_M: f64 = 2_000.0;

/// What a finished session reports.
#[derive(Debug, Clone)]
pub struct Summary {
    pub ticks: u64,
    pub rebases: u64,
    pub tiles_generated: u64,
    pub tiles_failed: u64,
    pub leaves: usize,
    /// Leaves with a generated tile at the end of the run.
    pub resident: usize,
    pub focus: GeodeticPoint,
    /// Distance of the focus from the render-space origin.
    pub focus_render_offset: f32,
}

/// A generated tile and its render-space copy under the current origin.
struct ResidentTile {
    tile: Tile,
    render: RenderTile,
}

pub struct Session {
    radius: f64,
    origin: FloatingOrigin,
    policy: RebasePolicy,
    lod: LodSettings,
    tree: CubeSphereQuadtree,
    generator: TileGenerator,
    tile_settings: TileSettings,
    leaves: HashSet<TileCode>,
    resident: HashMap<TileCode, ResidentTile>,
    focus: GeodeticPoint,
    tick: u64,
    rebases: u64,
    tiles_generated: u64,
    tiles_failed: u64,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, Box<dyn Error>> {
        let radius = config.planet.radius_m;
        let origin = FloatingOrigin::with_scale(config.origin.render_scale)?;

        let provider: SharedProvider = Arc::new(NoiseSurface::new(NoiseParams {
            seed: config.terrain.seed,
            octaves: config.terrain.octaves,
            amplitude_m: config.terrain.amplitude_m,
            base_frequency: config.terrain.base_frequency,
            ..Default::default()
        }));
        let threads = match config.tiles.worker_threads {
            0 => default_thread_count(),
            n => n,
        };
        let generator = TileGenerator::new(provider, threads, 256, 256)?;

        let space = if config.tiles.center_relative {
            TileSpace::CenterRelative
        } else {
            TileSpace::RealWorld
        };

        info!(radius_m = radius, threads, "Session ready");

        Ok(Self {
            radius,
            origin,
            policy: RebasePolicy::new(config.origin.rebase_threshold_m),
            lod: LodSettings {
                split_factor: config.tiles.split_factor,
                max_level: config.tiles.max_level,
            },
            tree: CubeSphereQuadtree::new(),
            generator,
            tile_settings: TileSettings {
                radius,
                resolution_u: config.tiles.resolution_u,
                resolution_v: config.tiles.resolution_v,
                space,
            },
            leaves: HashSet::new(),
            resident: HashMap::new(),
            focus: focus_at(0, radius),
            tick: 0,
            rebases: 0,
            tiles_generated: 0,
            tiles_failed: 0,
        })
    }

    /// Run one simulation tick.
    pub fn tick(&mut self) {
        // A commit at the end of the previous tick opened a change cycle:
        // everything already in render space is stale.
        if self.origin.is_change_cycle_active() {
            let origin = &self.origin;
            for resident in self.resident.values_mut() {
                resident.render = resident.tile.to_render_space(origin);
            }
        }

        self.focus = focus_at(self.tick, self.radius);
        let focus = self.focus.to_cartesian();
        if let Err(render) = self.origin.to_render_space_checked(focus) {
            warn!(offset = render.length(), "Focus outside precise render range");
        }
        self.policy.observe(&mut self.origin, focus);

        self.update_leaves(focus);
        self.collect_tiles();

        if let Some(shift) = self.origin.end_of_tick() {
            self.rebases += 1;
            debug!(
                tick = self.tick,
                shift_m = shift.delta().length(),
                "Origin rebased"
            );
        }
        self.tick += 1;
    }

    /// Stop generation and report.
    pub fn finish(self) -> Summary {
        let focus = self.focus.to_cartesian();
        Summary {
            ticks: self.tick,
            rebases: self.rebases,
            tiles_generated: self.tiles_generated,
            tiles_failed: self.tiles_failed,
            leaves: self.leaves.len(),
            resident: self.resident.len(),
            focus: self.focus,
            focus_render_offset: self.origin.to_render_space(focus).length(),
        }
    }

    fn update_leaves(&mut self, focus: CartesianVector) {
        let leaves: HashSet<TileCode> = refine(&mut self.tree, focus, self.radius, &self.lod)
            .into_iter()
            .collect();

        for stale in self.leaves.difference(&leaves) {
            self.generator.cancel(stale);
            self.resident.remove(stale);
        }
        // New leaves, plus any whose submission bounced off a full queue.
        for code in &leaves {
            if self.resident.contains_key(code) || self.generator.is_pending(code) {
                continue;
            }
            let request = TileRequest {
                code: code.clone(),
                settings: self.tile_settings,
            };
            if let Err(request) = self.generator.submit(request) {
                debug!(tile = %request.code, "Generation queue full, retrying next tick");
            }
        }
        self.leaves = leaves;
    }

    fn collect_tiles(&mut self) {
        for generated in self.generator.drain_results() {
            if !self.leaves.contains(&generated.code) {
                continue;
            }
            match generated.result {
                Ok(tile) => {
                    self.tiles_generated += 1;
                    debug!(
                        tile = %generated.code,
                        generation_time_us = generated.generation_time_us,
                        "Tile ready"
                    );
                    let render = tile.to_render_space(&self.origin);
                    self.resident
                        .insert(generated.code, ResidentTile { tile, render });
                }
                Err(e) => {
                    self.tiles_failed += 1;
                    warn!(tile = %generated.code, "Tile generation failed: {e}");
                }
            }
        }
    }
}

/// Focus position after `tick` ticks: eastward along the equator.
pub fn focus_at(tick: u64, radius: f64) -> GeodeticPoint {
    let travelled = tick as f64 * FIXED_DT * FOCUS_SPEED_M_S;
    GeodeticPoint::new(0.0, travelled / radius, radius + FOCUS_ALTITUDE_M)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    const RADIUS: f64 = 6_378_000.0;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.tiles.resolution_u = 5;
        config.tiles.resolution_v = 5;
        config.tiles.max_level = 4;
        config.tiles.worker_threads = 2;
        config.terrain.octaves = 2;
        config
    }

    #[test]
    fn test_focus_moves_east_at_constant_altitude() {
        let a = focus_at(0, RADIUS);
        let b = focus_at(60, RADIUS);
        assert_eq!(a.longitude, 0.0);
        assert!(b.longitude > 0.0);
        assert_eq!(a.radius, RADIUS + FOCUS_ALTITUDE_M);
        let ground = b.with_radius(RADIUS).surface_distance_to(&a, RADIUS);
        assert!((ground - FOCUS_SPEED_M_S).abs() < 1e-3, "{ground}");
    }

    #[test]
    fn test_first_tick_rebases_to_focus() {
        let mut session = Session::new(&small_config()).unwrap();
        session.tick();
        assert_eq!(session.rebases, 1);
        // The rebase was applied at the end of the tick: the focus is now at
        // the render-space origin and the next tick rebuilds render data.
        let focus = session.focus.to_cartesian();
        assert!(session.origin.to_render_space(focus).length() < 1e-3);
        assert!(session.origin.is_change_cycle_active());
    }

    #[test]
    fn test_focus_stays_near_render_origin() {
        let mut config = small_config();
        config.origin.rebase_threshold_m = 1_000.0;
        let mut session = Session::new(&config).unwrap();
        for _ in 0..120 {
            session.tick();
        }
        let summary = session.finish();
        assert_eq!(summary.ticks, 120);
        // About 250 m per tick against a 1 km threshold.
        assert!(summary.rebases >= 20, "only {} rebases", summary.rebases);
        assert!(summary.focus_render_offset < 1_100.0);
    }

    #[test]
    fn test_tiles_arrive_for_current_leaves() {
        let mut session = Session::new(&small_config()).unwrap();
        session.tick();
        assert!(!session.leaves.is_empty());

        let deadline = Instant::now() + Duration::from_secs(30);
        while session.resident.len() < session.leaves.len() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
            session.collect_tiles();
        }
        assert_eq!(session.resident.len(), session.leaves.len());
        for (code, resident) in &session.resident {
            assert!(session.leaves.contains(code));
            assert_eq!(resident.render.positions.rows(), 5);
        }
        assert_eq!(session.tiles_failed, 0);
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let mut config = small_config();
        config.origin.render_scale = 0.0;
        assert!(Session::new(&config).is_err());
    }
}
