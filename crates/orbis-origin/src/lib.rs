//! Floating-origin coordinate management.
//!
//! Real-world positions are double-precision, earth-centered meters. Before
//! anything is handed to the renderer it is rebased around a moving origin and
//! only then narrowed to `f32`, so render-space precision depends on the
//! distance to the origin instead of the distance to the planet center.
//!
//! Rebases are two-phase: [`FloatingOrigin::queue_rebase`] may be called at
//! any time, but the new origin only takes effect at
//! [`FloatingOrigin::commit`], which the host calls once per render tick.

mod conversion;
mod error;
mod floating_origin;
mod policy;

pub use conversion::{MAX_PRECISE_RENDER_OFFSET, to_real_world_batch, to_render_space_batch};
pub use error::OriginError;
pub use floating_origin::{FloatingOrigin, OriginShift, RebaseHandle};
pub use policy::RebasePolicy;
