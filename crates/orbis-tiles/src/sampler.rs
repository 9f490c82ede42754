//! Samples a tile's surface grid from its code and a surface provider.

use std::time::Instant;

use orbis_cubesphere::{FaceQuad, TileCode, project_to_sphere};
use orbis_math::from_cartesian;
use tracing::{debug, trace, warn};

use crate::{Grid, SurfaceProvider, Tile, TileGenerationError, TileSpace};

/// Parameters for [`generate_tile`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileSettings {
    /// Reference sphere radius in meters.
    pub radius: f64,
    /// Samples along `u` (columns), edges included. At least 2.
    pub resolution_u: usize,
    /// Samples along `v` (rows), edges included. At least 2.
    pub resolution_v: usize,
    pub space: TileSpace,
}

impl Default for TileSettings {
    fn default() -> Self {
        Self {
            radius: 6_378_000.0,
            resolution_u: 17,
            resolution_v: 17,
            space: TileSpace::CenterRelative,
        }
    }
}

/// Sample the surface of the tile addressed by `code`.
///
/// Samples are evenly spaced in face `(u, v)` with both edges included, so
/// neighbouring tiles at the same resolution share their edge points. Each
/// sample is projected to the unit sphere, handed to `provider` as a
/// geodetic point, then pushed out to `radius + elevation`.
///
/// Fails with [`TileGenerationError::InvalidResolution`] if either resolution
/// is below 2, or with [`TileGenerationError::Lookup`] on the first provider
/// error.
pub fn generate_tile<P>(
    code: &TileCode,
    settings: &TileSettings,
    provider: &P,
) -> Result<Tile, TileGenerationError>
where
    P: SurfaceProvider + ?Sized,
{
    let (res_u, res_v) = (settings.resolution_u, settings.resolution_v);
    if res_u < 2 || res_v < 2 || res_u.checked_mul(res_v).is_none() {
        return Err(TileGenerationError::InvalidResolution { u: res_u, v: res_v });
    }

    trace!(tile = %code, res_u, res_v, "Generating tile");
    let start = Instant::now();

    let quad = FaceQuad::resolve(code);
    let center = project_to_sphere(quad.center(), settings.radius);
    let step_u = 1.0 / (res_u - 1) as f64;
    let step_v = 1.0 / (res_v - 1) as f64;

    let samples = Grid::try_from_fn(res_v, res_u, |row, col| -> Result<_, TileGenerationError> {
        let cube = quad.sample_bilinear(col as f64 * step_u, row as f64 * step_v);
        let geo = from_cartesian(project_to_sphere(cube, 1.0));
        let sample = provider.sample(&geo).map_err(|source| {
            warn!(tile = %code, point = %geo, error = %source, "Surface lookup failed");
            TileGenerationError::Lookup { point: geo, source }
        })?;

        let surface = geo
            .with_radius(settings.radius + sample.elevation)
            .to_cartesian();
        let point = match settings.space {
            TileSpace::RealWorld => surface,
            TileSpace::CenterRelative => surface - center,
        };
        Ok((point, sample.color))
    })?;

    let tile = Tile::new(
        code.clone(),
        center,
        samples.map(|&(p, _)| p),
        samples.map(|&(_, c)| c),
        settings.space,
    );

    debug!(
        tile = %code,
        samples = res_u * res_v,
        elapsed_us = start.elapsed().as_micros() as u64,
        "Tile generated"
    );
    Ok(tile)
}
