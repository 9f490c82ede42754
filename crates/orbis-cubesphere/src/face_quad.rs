//! Quadrilateral regions of a cube face and their recursive subdivision.

use glam::DVec3;

use crate::{GeometryError, TileCode};

/// One of the four children produced by splitting a quad at its edge midpoints.
///
/// Positions are relative to the parent quad's own orientation, not world
/// axes: after several subdivisions "top" is still the parent's top edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Quadrant {
    /// Shares the parent's top-left corner. Code digit `0`.
    TopLeft = 0,
    /// Shares the parent's top-right corner. Code digit `1`.
    TopRight = 1,
    /// Shares the parent's bottom-left corner. Code digit `2`.
    BottomLeft = 2,
    /// Shares the parent's bottom-right corner. Code digit `3`.
    BottomRight = 3,
}

impl Quadrant {
    /// All quadrants in index order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Index 0..=3.
    #[inline]
    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// ASCII digit used in tile codes.
    #[inline]
    #[must_use]
    pub fn digit(self) -> char {
        char::from(b'0' + self.index())
    }

    /// Parse a tile-code digit.
    #[must_use]
    pub fn from_digit(c: char) -> Option<Quadrant> {
        match c {
            '0' => Some(Quadrant::TopLeft),
            '1' => Some(Quadrant::TopRight),
            '2' => Some(Quadrant::BottomLeft),
            '3' => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// Offset of this child's top-left corner in parent (u, v), in halves.
    pub(crate) fn uv_offset(self) -> (f64, f64) {
        match self {
            Quadrant::TopLeft => (0.0, 0.0),
            Quadrant::TopRight => (0.5, 0.0),
            Quadrant::BottomLeft => (0.0, 0.5),
            Quadrant::BottomRight => (0.5, 0.5),
        }
    }

    /// The quadrant containing parent-relative `(u, v)`. Points on the
    /// midlines go right / down.
    #[must_use]
    pub fn containing(u: f64, v: f64) -> Quadrant {
        match (u >= 0.5, v >= 0.5) {
            (false, false) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }
}

impl TryFrom<u8> for Quadrant {
    type Error = GeometryError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Quadrant::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(GeometryError::InvalidQuadrant(index))
    }
}

/// Four corners of a region on a cube face, on the cube (not the sphere).
///
/// `u` runs left → right and `v` runs top → bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceQuad {
    /// Corner at `(u, v) = (0, 0)`.
    pub top_left: DVec3,
    /// Corner at `(u, v) = (1, 0)`.
    pub top_right: DVec3,
    /// Corner at `(u, v) = (0, 1)`.
    pub bottom_left: DVec3,
    /// Corner at `(u, v) = (1, 1)`.
    pub bottom_right: DVec3,
}

impl FaceQuad {
    /// Corners in the order TL, TR, BL, BR.
    #[must_use]
    pub fn corner_array(&self) -> [DVec3; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// The quad covering `code`: the face's corners, subdivided along the
    /// code's quadrant path from root to leaf.
    #[must_use]
    pub fn resolve(code: &TileCode) -> FaceQuad {
        code.quadrants()
            .iter()
            .fold(code.face().corners(), |quad, &q| quad.child(q))
    }

    /// Split at edge midpoints and return one child.
    #[must_use]
    pub fn child(&self, quadrant: Quadrant) -> FaceQuad {
        let (u0, v0) = quadrant.uv_offset();
        let (u1, v1) = (u0 + 0.5, v0 + 0.5);
        FaceQuad {
            top_left: self.sample_bilinear(u0, v0),
            top_right: self.sample_bilinear(u1, v0),
            bottom_left: self.sample_bilinear(u0, v1),
            bottom_right: self.sample_bilinear(u1, v1),
        }
    }

    /// [`child`](Self::child) from a raw index, rejecting anything outside
    /// `0..=3`.
    pub fn subdivide(&self, quadrant: u8) -> Result<FaceQuad, GeometryError> {
        Ok(self.child(Quadrant::try_from(quadrant)?))
    }

    /// Bilinear interpolation of the corners. The result lies on the cube.
    #[inline]
    #[must_use]
    pub fn sample_bilinear(&self, u: f64, v: f64) -> DVec3 {
        let top = self.top_left.lerp(self.top_right, u);
        let bottom = self.bottom_left.lerp(self.bottom_right, u);
        top.lerp(bottom, v)
    }

    /// Bilinear center of the quad.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        self.sample_bilinear(0.5, 0.5)
    }

    /// Axis-aligned `(min, max)` bounds of the corners.
    #[must_use]
    pub fn bounds(&self) -> (DVec3, DVec3) {
        let c = self.corner_array();
        let min = c[1..].iter().fold(c[0], |m, p| m.min(*p));
        let max = c[1..].iter().fold(c[0], |m, p| m.max(*p));
        (min, max)
    }

    /// Returns `true` if `point` lies within the bounds, with `epsilon` slack.
    #[must_use]
    pub fn contains_bounded(&self, point: DVec3, epsilon: f64) -> bool {
        let (min, max) = self.bounds();
        let slack = DVec3::splat(epsilon);
        point.cmpge(min - slack).all() && point.cmple(max + slack).all()
    }

    /// Length of the top edge, in cube units.
    #[must_use]
    pub fn edge_length(&self) -> f64 {
        (self.top_right - self.top_left).length()
    }
}
