use orbis_math::GeodeticPoint;

use crate::ProviderError;

/// Errors produced while sampling a tile.
#[derive(Debug, thiserror::Error)]
pub enum TileGenerationError {
    /// Fewer than two samples along an axis cannot span a tile edge to edge.
    #[error("invalid argument: tile resolution must be at least 2x2 with a representable sample count, got {u}x{v}")]
    InvalidResolution { u: usize, v: usize },

    /// The surface provider failed for one sample point.
    #[error("surface lookup failed at {point}")]
    Lookup {
        point: GeodeticPoint,
        #[source]
        source: ProviderError,
    },
}
