//! Double-precision planetary math for Orbis: Cartesian vector aliases and
//! spherical geodetic conversion.

mod geodetic;
mod vector;

pub use geodetic::{GEODETIC_EPSILON, GeodeticPoint, from_cartesian, to_cartesian};
pub use vector::{CartesianVector, RenderVector, approx_eq, narrow, widen};
