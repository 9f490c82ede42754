//! Bulk and range-checked render-space conversions.

use orbis_math::{CartesianVector, RenderVector, narrow};

use crate::FloatingOrigin;

/// Largest render-space offset (per axis, in scaled units) that `f32` still
/// represents to better than one unit: 2²³.
pub const MAX_PRECISE_RENDER_OFFSET: f64 = 8_388_608.0;

impl FloatingOrigin {
    /// Like [`to_render_space`](Self::to_render_space), but returns `Err` with
    /// the (still converted) vector when any axis exceeds
    /// [`MAX_PRECISE_RENDER_OFFSET`]. Callers should treat that as a sign the
    /// origin is overdue for a rebase.
    pub fn to_render_space_checked(
        &self,
        real_world: CartesianVector,
    ) -> Result<RenderVector, RenderVector> {
        let scaled = self.to_render_space_f64(real_world);
        let render = narrow(scaled);
        if scaled.abs().max_element() > MAX_PRECISE_RENDER_OFFSET {
            Err(render)
        } else {
            Ok(render)
        }
    }
}

/// Convert a slice of real-world positions into render space.
///
/// `out` is cleared first and reused, so a caller converting every tick keeps
/// a single allocation.
pub fn to_render_space_batch(
    origin: &FloatingOrigin,
    positions: &[CartesianVector],
    out: &mut Vec<RenderVector>,
) {
    out.clear();
    out.reserve(positions.len());
    out.extend(positions.iter().map(|&p| origin.to_render_space(p)));
}

/// Convert a slice of render-space positions back to real world.
pub fn to_real_world_batch(
    origin: &FloatingOrigin,
    positions: &[RenderVector],
    out: &mut Vec<CartesianVector>,
) {
    out.clear();
    out.reserve(positions.len());
    out.extend(positions.iter().map(|&p| origin.to_real_world(p)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rebased(at: CartesianVector) -> FloatingOrigin {
        let mut origin = FloatingOrigin::new();
        origin.queue_rebase(at);
        origin.commit();
        origin
    }

    #[test]
    fn test_checked_within_range() {
        let origin = rebased(CartesianVector::new(0.0, 6_378_000.0, 0.0));
        let r = origin
            .to_render_space_checked(CartesianVector::new(100.0, 6_378_000.0, -50.0))
            .expect("100 m from origin is precise");
        assert_eq!(r, RenderVector::new(100.0, 0.0, -50.0));
    }

    #[test]
    fn test_checked_out_of_range_still_converts() {
        let origin = FloatingOrigin::new();
        let far = CartesianVector::new(0.0, 0.0, 12_000_000.0);
        let r = origin.to_render_space_checked(far).unwrap_err();
        assert!((r.z - 12_000_000.0).abs() < 1.0);
    }

    #[test]
    fn test_checked_respects_scale() {
        let mut origin = FloatingOrigin::new();
        origin.set_scale(0.5).unwrap();
        // 12,000 km scaled by 0.5 is 6,000 km: precise again.
        assert!(
            origin
                .to_render_space_checked(CartesianVector::new(12_000_000.0, 0.0, 0.0))
                .is_ok()
        );
    }

    #[test]
    fn test_batch_matches_single() {
        let origin = rebased(CartesianVector::new(1_000.0, 2_000.0, 3_000.0));
        let positions = vec![
            CartesianVector::new(1_000.0, 2_000.0, 3_000.0),
            CartesianVector::new(1_010.0, 2_000.0, 3_000.0),
            CartesianVector::new(990.0, 1_995.5, 3_000.25),
        ];
        let mut out = vec![RenderVector::ONE; 8];
        to_render_space_batch(&origin, &positions, &mut out);
        assert_eq!(out.len(), positions.len());
        for (p, r) in positions.iter().zip(&out) {
            assert_eq!(*r, origin.to_render_space(*p));
        }

        let mut back = Vec::new();
        to_real_world_batch(&origin, &out, &mut back);
        for (p, b) in positions.iter().zip(&back) {
            assert!((*p - *b).length() < 1e-6);
        }
    }
}
