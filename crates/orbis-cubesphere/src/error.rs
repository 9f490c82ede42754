//! Cube-sphere error types.

/// Invalid arguments to the face geometry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Quadrant indices are 0 (top-left) through 3 (bottom-right).
    #[error("invalid argument: quadrant index must be 0..=3, got {0}")]
    InvalidQuadrant(u8),
}

/// Reasons a tile code string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TileCodeParseError {
    /// Fewer than the three characters of a face prefix.
    #[error("tile code too short: {len} characters, need at least 3")]
    TooShort {
        /// Number of characters in the input.
        len: usize,
    },

    /// The three-character prefix names no face.
    #[error("unknown face prefix {prefix:?}")]
    UnknownFace {
        /// The offending prefix.
        prefix: String,
    },

    /// A character after the prefix is not a quadrant digit `0`..=`3`.
    #[error("invalid quadrant digit {character:?} at position {position}")]
    InvalidDigit {
        /// The offending character.
        character: char,
        /// Character index in the input.
        position: usize,
    },

    /// More levels than [`TileCode::MAX_LEVEL`](crate::TileCode::MAX_LEVEL).
    #[error("tile code has {levels} levels, maximum is {max}")]
    TooDeep {
        /// Number of quadrant digits in the input.
        levels: usize,
        /// The supported maximum.
        max: usize,
    },
}
