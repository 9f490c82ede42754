//! The floating-origin manager and its cross-thread rebase handle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use orbis_math::{CartesianVector, RenderVector, narrow, widen};
use tracing::{debug, warn};

use crate::OriginError;

/// Pending origin slot. Value and "is pending" flag are one `Option`, so a
/// reader can never see a new origin with a stale flag or vice versa.
type PendingSlot = Arc<Mutex<Option<CartesianVector>>>;

fn lock(slot: &PendingSlot) -> MutexGuard<'_, Option<CartesianVector>> {
    // The slot holds plain data; a panic elsewhere cannot leave it half-written.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A cloneable handle that lets any thread queue a rebase.
///
/// Queuing is last-write-wins: only the most recent value is applied at the
/// next [`FloatingOrigin::commit`].
#[derive(Clone, Debug)]
pub struct RebaseHandle {
    slot: PendingSlot,
}

impl RebaseHandle {
    /// Queue `origin` to become the applied origin at the next commit.
    pub fn queue(&self, origin: CartesianVector) {
        *lock(&self.slot) = Some(origin);
    }

    /// Returns `true` if a rebase is waiting for the next commit.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

/// Describes a committed rebase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OriginShift {
    /// Origin applied before the commit.
    pub previous: CartesianVector,
    /// Origin applied after the commit.
    pub current: CartesianVector,
}

impl OriginShift {
    /// Real-world displacement of the origin (`current − previous`).
    #[must_use]
    pub fn delta(&self) -> CartesianVector {
        self.current - self.previous
    }
}

/// Owns the applied and pending origin for one render context.
///
/// Pass it explicitly to whatever needs render-space coordinates; nothing
/// else may cache the applied origin or scale beyond a single sampling pass.
///
/// The change cycle flag is set only by [`commit`](Self::commit) and cleared
/// only by [`end_change_cycle`](Self::end_change_cycle), giving dependents
/// exactly one tick to react to a rebase.
#[derive(Debug)]
pub struct FloatingOrigin {
    applied_origin: CartesianVector,
    applied_scale: f64,
    pending: PendingSlot,
    change_cycle_active: bool,
}

impl FloatingOrigin {
    /// Origin at the planet center, scale 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            applied_origin: CartesianVector::ZERO,
            applied_scale: 1.0,
            pending: Arc::new(Mutex::new(None)),
            change_cycle_active: false,
        }
    }

    /// Origin at the planet center with the given render scale.
    pub fn with_scale(scale: f64) -> Result<Self, OriginError> {
        let mut origin = Self::new();
        origin.set_scale(scale)?;
        Ok(origin)
    }

    /// The origin currently used by the transforms.
    #[must_use]
    pub fn applied_origin(&self) -> CartesianVector {
        self.applied_origin
    }

    /// The render scale currently used by the transforms. Always `> 0`.
    #[must_use]
    pub fn applied_scale(&self) -> f64 {
        self.applied_scale
    }

    /// Set the render-space scale factor.
    ///
    /// Takes effect immediately; hosts should call it at the same point in
    /// the tick as [`commit`](Self::commit).
    pub fn set_scale(&mut self, scale: f64) -> Result<(), OriginError> {
        if !(scale > 0.0 && scale.is_finite()) {
            warn!(scale, "Rejected render scale");
            return Err(OriginError::InvalidScale(scale));
        }
        self.applied_scale = scale;
        Ok(())
    }

    /// Queue a rebase. Replaces any rebase already queued this tick.
    pub fn queue_rebase(&mut self, origin: CartesianVector) {
        *lock(&self.pending) = Some(origin);
    }

    /// Returns `true` if a rebase is waiting for the next commit.
    #[must_use]
    pub fn has_pending_rebase(&self) -> bool {
        lock(&self.pending).is_some()
    }

    /// The queued origin, if any.
    #[must_use]
    pub fn pending_origin(&self) -> Option<CartesianVector> {
        *lock(&self.pending)
    }

    /// A handle for queuing rebases from other threads or subsystems.
    #[must_use]
    pub fn rebase_handle(&self) -> RebaseHandle {
        RebaseHandle {
            slot: Arc::clone(&self.pending),
        }
    }

    /// Apply the queued rebase, if any, and open a change cycle.
    ///
    /// Must be called from exactly one place per tick (end of frame) so that
    /// every dependent observes the same origin for the whole tick. Returns
    /// `None` and changes nothing when no rebase is queued.
    pub fn commit(&mut self) -> Option<OriginShift> {
        let next = lock(&self.pending).take()?;
        let shift = OriginShift {
            previous: self.applied_origin,
            current: next,
        };
        self.applied_origin = next;
        self.change_cycle_active = true;
        debug!(
            previous = ?shift.previous,
            current = ?shift.current,
            distance_m = shift.delta().length(),
            "Committed floating origin rebase"
        );
        Some(shift)
    }

    /// Returns `true` during the tick following a commit.
    #[must_use]
    pub fn is_change_cycle_active(&self) -> bool {
        self.change_cycle_active
    }

    /// Close the reaction window opened by [`commit`](Self::commit).
    pub fn end_change_cycle(&mut self) {
        self.change_cycle_active = false;
    }

    /// The per-tick host sequence: close last tick's change cycle, then commit.
    ///
    /// A host that calls only this, once at the end of every frame, gives each
    /// rebase exactly one tick of [`is_change_cycle_active`](Self::is_change_cycle_active).
    pub fn end_of_tick(&mut self) -> Option<OriginShift> {
        if self.change_cycle_active {
            self.end_change_cycle();
        }
        self.commit()
    }

    /// Real-world position to render space: `(rw − origin) × scale`, in `f64`,
    /// narrowed to `f32` as the very last step.
    #[inline]
    #[must_use]
    pub fn to_render_space(&self, real_world: CartesianVector) -> RenderVector {
        narrow(self.to_render_space_f64(real_world))
    }

    /// Render-space position back to real world: widen, unscale, add origin.
    #[inline]
    #[must_use]
    pub fn to_real_world(&self, render: RenderVector) -> CartesianVector {
        widen(render) / self.applied_scale + self.applied_origin
    }

    #[inline]
    pub(crate) fn to_render_space_f64(&self, real_world: CartesianVector) -> CartesianVector {
        (real_world - self.applied_origin) * self.applied_scale
    }
}

impl Default for FloatingOrigin {
    fn default() -> Self {
        Self::new()
    }
}
