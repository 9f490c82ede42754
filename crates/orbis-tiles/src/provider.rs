//! The elevation/color seam between the sampler and whatever describes the
//! planet surface.

use noise::{NoiseFn, Simplex};
use orbis_math::GeodeticPoint;

use crate::Color;

/// Error type returned by surface providers.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// What a provider reports for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    /// Meters above (or below, if negative) the reference radius.
    pub elevation: f64,
    pub color: Color,
}

/// Supplies elevation and color for a point on the sphere.
///
/// The point's latitude and longitude are what matter; its radius is the unit
/// direction's and carries no meaning.
pub trait SurfaceProvider {
    fn sample(&self, point: &GeodeticPoint) -> Result<SurfaceSample, ProviderError>;
}

impl<F> SurfaceProvider for F
where
    F: Fn(&GeodeticPoint) -> Result<SurfaceSample, ProviderError>,
{
    fn sample(&self, point: &GeodeticPoint) -> Result<SurfaceSample, ProviderError> {
        self(point)
    }
}

/// Same elevation and color everywhere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantSurface {
    pub elevation: f64,
    pub color: Color,
}

impl ConstantSurface {
    #[must_use]
    pub fn new(elevation: f64, color: Color) -> Self {
        Self { elevation, color }
    }
}

impl Default for ConstantSurface {
    fn default() -> Self {
        Self::new(0.0, Color::WHITE)
    }
}

impl SurfaceProvider for ConstantSurface {
    fn sample(&self, _point: &GeodeticPoint) -> Result<SurfaceSample, ProviderError> {
        Ok(SurfaceSample {
            elevation: self.elevation,
            color: self.color,
        })
    }
}

/// Configuration for the fBm terrain noise.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    pub seed: u32,
    /// Number of octaves to sum.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per planet radius.
    pub base_frequency: f64,
    /// Amplitude of the first octave in meters.
    pub amplitude_m: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 6,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 2.0,
            amplitude_m: 4_000.0,
        }
    }
}

const DEEP_WATER: Color = Color::rgb(0.02, 0.06, 0.25);
const SHALLOW_WATER: Color = Color::rgb(0.10, 0.35, 0.60);
const SAND: Color = Color::rgb(0.76, 0.70, 0.50);
const GRASS: Color = Color::rgb(0.20, 0.50, 0.15);
const ROCK: Color = Color::rgb(0.45, 0.40, 0.35);
const SNOW: Color = Color::rgb(0.95, 0.95, 0.97);

/// Fractal simplex terrain sampled over the unit sphere direction, so there
/// are no seams at face edges or the antimeridian.
pub struct NoiseSurface {
    noise: Simplex,
    params: NoiseParams,
}

impl NoiseSurface {
    #[must_use]
    pub fn new(params: NoiseParams) -> Self {
        Self {
            noise: Simplex::new(params.seed),
            params,
        }
    }

    #[must_use]
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Elevation in meters for `point`'s direction.
    #[must_use]
    pub fn elevation(&self, point: &GeodeticPoint) -> f64 {
        let dir = point.with_radius(1.0).to_cartesian();
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude_m;

        for _ in 0..self.params.octaves {
            let p = dir * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// Geometric sum of the octave amplitudes, the theoretical bound on
    /// `|elevation|`.
    #[must_use]
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.params.amplitude_m;
        for _ in 0..self.params.octaves {
            sum += amp;
            amp *= self.params.persistence;
        }
        sum
    }

    /// Color band for an elevation, blended inside each band.
    #[must_use]
    pub fn color_for(&self, elevation: f64) -> Color {
        let max = self.max_amplitude().max(f64::EPSILON);
        let h = (elevation / max) as f32;
        match h {
            h if h < -0.2 => DEEP_WATER,
            h if h < 0.0 => DEEP_WATER.lerp(SHALLOW_WATER, (h + 0.2) / 0.2),
            h if h < 0.05 => SAND,
            h if h < 0.4 => GRASS.lerp(ROCK, (h - 0.05) / 0.35),
            h if h < 0.6 => ROCK,
            _ => SNOW,
        }
    }
}

impl SurfaceProvider for NoiseSurface {
    fn sample(&self, point: &GeodeticPoint) -> Result<SurfaceSample, ProviderError> {
        let elevation = self.elevation(point);
        Ok(SurfaceSample {
            elevation,
            color: self.color_for(elevation),
        })
    }
}
