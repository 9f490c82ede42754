//! Distance-triggered rebasing.

use orbis_math::CartesianVector;
use tracing::trace;

use crate::FloatingOrigin;

/// Queues a rebase whenever the tracked focus point (usually the camera)
/// drifts too far from the origin.
///
/// The policy only queues; the rebase still waits for the host's commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RebasePolicy {
    /// Distance in meters from the origin beyond which a rebase is queued.
    pub threshold_m: f64,
}

impl RebasePolicy {
    /// Default threshold: 5 km.
    pub const DEFAULT_THRESHOLD_M: f64 = 5_000.0;

    /// Create a policy with the given threshold in meters.
    #[must_use]
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    /// Check `focus` against the origin that will be in effect after the next
    /// commit (the pending one if queued, else the applied one). Queues a
    /// rebase to `focus` and returns `true` if it is beyond the threshold.
    pub fn observe(&self, origin: &mut FloatingOrigin, focus: CartesianVector) -> bool {
        let reference = origin
            .pending_origin()
            .unwrap_or_else(|| origin.applied_origin());
        let distance = (focus - reference).length();
        if distance > self.threshold_m {
            trace!(distance_m = distance, threshold_m = self.threshold_m, "Queuing rebase");
            origin.queue_rebase(focus);
            true
        } else {
            false
        }
    }
}

impl Default for RebasePolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD_M)
    }
}
