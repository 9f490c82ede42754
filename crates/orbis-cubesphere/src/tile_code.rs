//! Textual tile addresses: a face prefix followed by a quadrant path.
//!
//! Grammar: `<face><digit>*` where `<face>` is one of `Top`, `Btm`, `Lft`,
//! `Rgt`, `Frt`, `Bak` and each digit is `0`..=`3`, root to leaf. Examples:
//! `"Frt"` (the whole front face), `"Top0"`, `"Bak0123"`.
//!
//! Callers cache and log these strings, so the format is stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{CubeFace, Quadrant, TileCodeParseError};

/// Identifies a tile: a cube face plus a path of quadrant subdivisions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCode {
    face: CubeFace,
    quadrants: Vec<Quadrant>,
}

impl TileCode {
    /// Deepest supported subdivision level. At level 30 an earth-sized tile
    /// edge is well under a centimeter.
    pub const MAX_LEVEL: usize = 30;

    /// The tile covering a whole face.
    #[must_use]
    pub fn root(face: CubeFace) -> Self {
        Self {
            face,
            quadrants: Vec::new(),
        }
    }

    /// Build a code from a face and a root-to-leaf quadrant path.
    ///
    /// Returns `None` if the path is deeper than [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn new(face: CubeFace, quadrants: Vec<Quadrant>) -> Option<Self> {
        (quadrants.len() <= Self::MAX_LEVEL).then_some(Self { face, quadrants })
    }

    /// Parse the textual form. All-or-nothing: any malformed input is an error.
    pub fn parse(s: &str) -> Result<Self, TileCodeParseError> {
        let prefix_end = match s.char_indices().nth(3) {
            Some((idx, _)) => idx,
            None => {
                let len = s.chars().count();
                if len < 3 {
                    return Err(TileCodeParseError::TooShort { len });
                }
                s.len()
            }
        };
        let (prefix, path) = s.split_at(prefix_end);
        let face = CubeFace::from_code(prefix).ok_or_else(|| TileCodeParseError::UnknownFace {
            prefix: prefix.to_string(),
        })?;

        let quadrants = path
            .chars()
            .enumerate()
            .map(|(i, character)| {
                Quadrant::from_digit(character).ok_or(TileCodeParseError::InvalidDigit {
                    character,
                    position: i + 3,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if quadrants.len() > Self::MAX_LEVEL {
            return Err(TileCodeParseError::TooDeep {
                levels: quadrants.len(),
                max: Self::MAX_LEVEL,
            });
        }
        Ok(Self { face, quadrants })
    }

    /// The textual form (same as `to_string()`).
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// The cube face this tile lies on.
    #[must_use]
    pub fn face(&self) -> CubeFace {
        self.face
    }

    /// Quadrant path, root to leaf.
    #[must_use]
    pub fn quadrants(&self) -> &[Quadrant] {
        &self.quadrants
    }

    /// Subdivision depth. A face root is level 0.
    #[must_use]
    pub fn level(&self) -> usize {
        self.quadrants.len()
    }

    /// The enclosing tile one level up, or `None` for a face root.
    #[must_use]
    pub fn parent(&self) -> Option<TileCode> {
        let (_, rest) = self.quadrants.split_last()?;
        Some(Self {
            face: self.face,
            quadrants: rest.to_vec(),
        })
    }

    /// One child, or `None` at [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn child(&self, quadrant: Quadrant) -> Option<TileCode> {
        if self.level() >= Self::MAX_LEVEL {
            return None;
        }
        let mut quadrants = Vec::with_capacity(self.quadrants.len() + 1);
        quadrants.extend_from_slice(&self.quadrants);
        quadrants.push(quadrant);
        Some(Self {
            face: self.face,
            quadrants,
        })
    }

    /// All four children in quadrant order, or `None` at [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn children(&self) -> Option<[TileCode; 4]> {
        let [a, b, c, d] = Quadrant::ALL;
        Some([
            self.child(a)?,
            self.child(b)?,
            self.child(c)?,
            self.child(d)?,
        ])
    }

    /// Returns `true` if `other` lies strictly inside this tile.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &TileCode) -> bool {
        self.face == other.face
            && self.level() < other.level()
            && other.quadrants.starts_with(&self.quadrants)
    }

    /// Face-level `(u_min, v_min, u_max, v_max)` covered by this tile.
    #[must_use]
    pub fn uv_bounds(&self) -> (f64, f64, f64, f64) {
        let mut u = 0.0;
        let mut v = 0.0;
        let mut size = 1.0;
        for q in &self.quadrants {
            size *= 0.5;
            match q {
                Quadrant::TopLeft => {}
                Quadrant::TopRight => u += size,
                Quadrant::BottomLeft => v += size,
                Quadrant::BottomRight => {
                    u += size;
                    v += size;
                }
            }
        }
        (u, v, u + size, v + size)
    }

    /// The tile at `level` containing face-level `(u, v)`. Inputs are
    /// clamped to \[0, 1\] and `level` to [`Self::MAX_LEVEL`].
    #[must_use]
    pub fn containing(face: CubeFace, u: f64, v: f64, level: usize) -> TileCode {
        let mut u = u.clamp(0.0, 1.0);
        let mut v = v.clamp(0.0, 1.0);
        let mut quadrants = Vec::with_capacity(level.min(Self::MAX_LEVEL));
        for _ in 0..level.min(Self::MAX_LEVEL) {
            let q = Quadrant::containing(u, v);
            let (du, dv) = q.uv_offset();
            quadrants.push(q);
            u = (u - du) * 2.0;
            v = (v - dv) * 2.0;
        }
        Self { face, quadrants }
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.face.code())?;
        for q in &self.quadrants {
            fmt::Write::write_char(f, q.digit())?;
        }
        Ok(())
    }
}

impl FromStr for TileCode {
    type Err = TileCodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TileCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TileCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TileCode::parse(&s).map_err(serde::de::Error::custom)
    }
}
