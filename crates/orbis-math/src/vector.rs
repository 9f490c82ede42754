//! Vector aliases for the two coordinate spaces.

use glam::{DVec3, Vec3};

/// Earth-centered Cartesian position in meters, double precision.
///
/// Real-world (RW) coordinates. `DVec3` already carries the arithmetic the
/// core needs: add, sub, scale, `length`, `normalize`, `dot`, `cross`.
pub type CartesianVector = DVec3;

/// Single-precision render-space position, relative to the applied origin.
pub type RenderVector = Vec3;

/// Narrow a double-precision vector to render precision.
///
/// This is the only place precision is dropped. Callers must subtract the
/// floating origin *before* narrowing; narrowing an absolute planetary
/// coordinate throws away everything below roughly half a meter.
#[inline]
#[must_use]
pub fn narrow(v: CartesianVector) -> RenderVector {
    v.as_vec3()
}

/// Widen a render-space vector back to double precision.
#[inline]
#[must_use]
pub fn widen(v: RenderVector) -> CartesianVector {
    v.as_dvec3()
}

/// Returns true if every component of `a` and `b` differs by less than `epsilon`.
#[inline]
#[must_use]
pub fn approx_eq(a: CartesianVector, b: CartesianVector, epsilon: f64) -> bool {
    (a - b).abs().max_element() < epsilon
}
