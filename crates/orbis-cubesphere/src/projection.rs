//! Cube-to-sphere projection.
//!
//! Plain normalization: a cube point is pushed out along its direction from
//! the center. Cells grow toward face corners (roughly 5× area distortion at
//! the corners versus the face center); existing content is built against
//! this mapping, so no area-correcting warp is applied.

use glam::DVec3;

/// Project a point on the cube onto a sphere of `radius` meters.
///
/// The zero vector has no direction and maps to zero.
#[inline]
#[must_use]
pub fn project_to_sphere(cube_point: DVec3, radius: f64) -> DVec3 {
    cube_point.normalize_or_zero() * radius
}
