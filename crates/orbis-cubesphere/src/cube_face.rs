//! The six faces of the cube-sphere and their authored corner table.

use glam::DVec3;

use crate::FaceQuad;

/// The six faces of the cube surrounding the sphere.
///
/// `+Y` is north, longitude 0 is `+Z` (front) and longitude +90° is `+X`
/// (right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CubeFace {
    /// +Y face, north pole.
    Top = 0,
    /// −Y face, south pole.
    Bottom = 1,
    /// −X face.
    Left = 2,
    /// +X face.
    Right = 3,
    /// +Z face.
    Front = 4,
    /// −Z face.
    Back = 5,
}

/// Corner table, indexed by `CubeFace as usize`.
///
/// Each quad is seen from outside the cube: going TL → TR → BR → BL is
/// clockwise, and `right × up` is the outward normal. Equatorial faces have
/// `+Y` as up; Top has `−Z` as up and Bottom has `+Z` as up, so Front's top
/// edge is Top's bottom edge and Front's bottom edge is Bottom's top edge.
const FACE_CORNERS: [FaceQuad; 6] = [
    // Top
    FaceQuad {
        top_left: DVec3::new(-1.0, 1.0, -1.0),
        top_right: DVec3::new(1.0, 1.0, -1.0),
        bottom_left: DVec3::new(-1.0, 1.0, 1.0),
        bottom_right: DVec3::new(1.0, 1.0, 1.0),
    },
    // Bottom
    FaceQuad {
        top_left: DVec3::new(-1.0, -1.0, 1.0),
        top_right: DVec3::new(1.0, -1.0, 1.0),
        bottom_left: DVec3::new(-1.0, -1.0, -1.0),
        bottom_right: DVec3::new(1.0, -1.0, -1.0),
    },
    // Left
    FaceQuad {
        top_left: DVec3::new(-1.0, 1.0, -1.0),
        top_right: DVec3::new(-1.0, 1.0, 1.0),
        bottom_left: DVec3::new(-1.0, -1.0, -1.0),
        bottom_right: DVec3::new(-1.0, -1.0, 1.0),
    },
    // Right
    FaceQuad {
        top_left: DVec3::new(1.0, 1.0, 1.0),
        top_right: DVec3::new(1.0, 1.0, -1.0),
        bottom_left: DVec3::new(1.0, -1.0, 1.0),
        bottom_right: DVec3::new(1.0, -1.0, -1.0),
    },
    // Front
    FaceQuad {
        top_left: DVec3::new(-1.0, 1.0, 1.0),
        top_right: DVec3::new(1.0, 1.0, 1.0),
        bottom_left: DVec3::new(-1.0, -1.0, 1.0),
        bottom_right: DVec3::new(1.0, -1.0, 1.0),
    },
    // Back
    FaceQuad {
        top_left: DVec3::new(1.0, 1.0, -1.0),
        top_right: DVec3::new(-1.0, 1.0, -1.0),
        bottom_left: DVec3::new(1.0, -1.0, -1.0),
        bottom_right: DVec3::new(-1.0, -1.0, -1.0),
    },
];

impl CubeFace {
    /// All six faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Front,
        CubeFace::Back,
    ];

    /// The four unit-cube corners of this face.
    #[inline]
    #[must_use]
    pub fn corners(self) -> FaceQuad {
        FACE_CORNERS[self as usize]
    }

    /// Three-letter code used as the tile code prefix.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            CubeFace::Top => "Top",
            CubeFace::Bottom => "Btm",
            CubeFace::Left => "Lft",
            CubeFace::Right => "Rgt",
            CubeFace::Front => "Frt",
            CubeFace::Back => "Bak",
        }
    }

    /// Inverse of [`code`](Self::code). Case-sensitive.
    #[must_use]
    pub fn from_code(code: &str) -> Option<CubeFace> {
        CubeFace::ALL.into_iter().find(|face| face.code() == code)
    }

    /// Outward-pointing unit normal.
    #[must_use]
    pub fn normal(self) -> DVec3 {
        match self {
            CubeFace::Top => DVec3::Y,
            CubeFace::Bottom => DVec3::NEG_Y,
            CubeFace::Left => DVec3::NEG_X,
            CubeFace::Right => DVec3::X,
            CubeFace::Front => DVec3::Z,
            CubeFace::Back => DVec3::NEG_Z,
        }
    }

    /// The opposite face.
    #[must_use]
    pub fn opposite(self) -> CubeFace {
        match self {
            CubeFace::Top => CubeFace::Bottom,
            CubeFace::Bottom => CubeFace::Top,
            CubeFace::Left => CubeFace::Right,
            CubeFace::Right => CubeFace::Left,
            CubeFace::Front => CubeFace::Back,
            CubeFace::Back => CubeFace::Front,
        }
    }

    /// The face a direction from the center passes through (dominant axis).
    ///
    /// Ties are broken toward Y, then X. The zero vector maps to `Front`.
    #[must_use]
    pub fn from_direction(dir: DVec3) -> CubeFace {
        let a = dir.abs();
        if a.y >= a.x && a.y >= a.z && a.y > 0.0 {
            if dir.y > 0.0 { CubeFace::Top } else { CubeFace::Bottom }
        } else if a.x >= a.z && a.x > 0.0 {
            if dir.x > 0.0 { CubeFace::Right } else { CubeFace::Left }
        } else if dir.z < 0.0 {
            CubeFace::Back
        } else {
            CubeFace::Front
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn edges(face: CubeFace) -> [(DVec3, DVec3); 4] {
        let q = face.corners();
        [
            (q.top_left, q.top_right),
            (q.top_right, q.bottom_right),
            (q.bottom_right, q.bottom_left),
            (q.bottom_left, q.top_left),
        ]
    }

    fn same_edge(a: (DVec3, DVec3), b: (DVec3, DVec3)) -> bool {
        (a.0 == b.0 && a.1 == b.1) || (a.0 == b.1 && a.1 == b.0)
    }

    #[test]
    fn test_all_six_faces_distinct() {
        for (i, a) in CubeFace::ALL.iter().enumerate() {
            assert_eq!(*a as usize, i);
            for b in &CubeFace::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_corners_lie_on_unit_cube_face() {
        for face in CubeFace::ALL {
            let q = face.corners();
            for c in q.corner_array() {
                assert_eq!(c.abs(), DVec3::ONE, "{face:?} corner {c:?} not a cube vertex");
                assert!(
                    (c.dot(face.normal()) - 1.0).abs() < EPSILON,
                    "{face:?} corner {c:?} not on the face plane"
                );
            }
        }
    }

    #[test]
    fn test_corner_center_is_normal() {
        for face in CubeFace::ALL {
            assert!((face.corners().center() - face.normal()).length() < EPSILON);
        }
    }

    #[test]
    fn test_winding_right_cross_up_is_outward() {
        for face in CubeFace::ALL {
            let q = face.corners();
            let right = q.top_right - q.top_left;
            let up = q.top_left - q.bottom_left;
            let n = right.cross(up).normalize();
            assert!(
                (n - face.normal()).length() < EPSILON,
                "{face:?} is wound inward: right x up = {n:?}"
            );
        }
    }

    #[test]
    fn test_every_edge_shared_by_exactly_two_adjacent_faces() {
        for face in CubeFace::ALL {
            for edge in edges(face) {
                let owners: Vec<CubeFace> = CubeFace::ALL
                    .into_iter()
                    .filter(|&other| edges(other).iter().any(|&e| same_edge(e, edge)))
                    .collect();
                assert_eq!(owners.len(), 2, "edge {edge:?} of {face:?} owned by {owners:?}");
                assert!(owners.contains(&face));
                assert!(!owners.contains(&face.opposite()));
            }
        }
    }

    #[test]
    fn test_front_top_seam() {
        let front = CubeFace::Front.corners();
        let top = CubeFace::Top.corners();
        assert_eq!(front.top_left, top.bottom_left);
        assert_eq!(front.top_right, top.bottom_right);
    }

    #[test]
    fn test_codes_roundtrip() {
        for face in CubeFace::ALL {
            assert_eq!(face.code().len(), 3);
            assert_eq!(CubeFace::from_code(face.code()), Some(face));
        }
        assert_eq!(CubeFace::from_code("frt"), None);
        assert_eq!(CubeFace::from_code("Xyz"), None);
    }

    #[test]
    fn test_opposite_is_involution_and_antiparallel() {
        for face in CubeFace::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert!((face.normal() + face.opposite().normal()).length() < EPSILON);
        }
    }

    #[test]
    fn test_from_direction_matches_normal() {
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_direction(face.normal() * 3.0), face);
            let skewed = face.normal() + DVec3::new(0.2, -0.3, 0.1);
            assert_eq!(CubeFace::from_direction(skewed), face);
        }
        assert_eq!(CubeFace::from_direction(DVec3::ZERO), CubeFace::Front);
    }
}
