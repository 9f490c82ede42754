//! Generated tiles and their render-space handoff form.

use orbis_cubesphere::TileCode;
use orbis_math::{CartesianVector, RenderVector};
use orbis_origin::FloatingOrigin;

use crate::{Color, Grid};

/// How a tile's grid points are expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileSpace {
    /// Absolute earth-centered meters.
    RealWorld,
    /// Meters relative to the tile's center point. Keeps coordinates small
    /// for downstream consumers.
    #[default]
    CenterRelative,
}

/// A sampled tile: double-precision surface points plus per-point colors.
///
/// Built by [`generate_tile`](crate::generate_tile) and never mutated after.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    code: TileCode,
    center_point: CartesianVector,
    grid: Grid<CartesianVector>,
    color_grid: Grid<Color>,
    space: TileSpace,
}

impl Tile {
    pub(crate) fn new(
        code: TileCode,
        center_point: CartesianVector,
        grid: Grid<CartesianVector>,
        color_grid: Grid<Color>,
        space: TileSpace,
    ) -> Self {
        Self {
            code,
            center_point,
            grid,
            color_grid,
            space,
        }
    }

    #[must_use]
    pub fn code(&self) -> &TileCode {
        &self.code
    }

    /// Real-world center of the tile on the reference sphere (no elevation).
    #[must_use]
    pub fn center_point(&self) -> CartesianVector {
        self.center_point
    }

    /// Surface points; row = `v` index, column = `u` index.
    #[must_use]
    pub fn grid(&self) -> &Grid<CartesianVector> {
        &self.grid
    }

    #[must_use]
    pub fn color_grid(&self) -> &Grid<Color> {
        &self.color_grid
    }

    #[must_use]
    pub fn space(&self) -> TileSpace {
        self.space
    }

    /// `(resolution_u, resolution_v)`.
    #[must_use]
    pub fn resolution(&self) -> (usize, usize) {
        (self.grid.cols(), self.grid.rows())
    }

    /// The grid point at `(row, col)` in absolute real-world meters,
    /// whatever the tile's [`TileSpace`].
    #[must_use]
    pub fn real_world_point(&self, row: usize, col: usize) -> Option<CartesianVector> {
        self.grid.get(row, col).map(|&p| self.absolute(p))
    }

    #[inline]
    fn absolute(&self, p: CartesianVector) -> CartesianVector {
        match self.space {
            TileSpace::RealWorld => p,
            TileSpace::CenterRelative => p + self.center_point,
        }
    }

    /// Convert the tile for rendering through `origin`.
    ///
    /// Points are made absolute and shifted in `f64`; each is narrowed to
    /// `f32` only as it is stored.
    #[must_use]
    pub fn to_render_space(&self, origin: &FloatingOrigin) -> RenderTile {
        RenderTile {
            code: self.code.clone(),
            center: origin.to_render_space(self.center_point),
            positions: self.grid.map(|&p| origin.to_render_space(self.absolute(p))),
            colors: self.color_grid.clone(),
        }
    }
}

/// Single-precision copy of a [`Tile`] relative to the floating origin.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTile {
    pub code: TileCode,
    /// The tile center in render space.
    pub center: RenderVector,
    pub positions: Grid<RenderVector>,
    pub colors: Grid<Color>,
}
