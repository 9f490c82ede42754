//! Cube-sphere geometry: the six-face cube, quadrant subdivision, bilinear
//! sampling, sphere projection, and the textual tile address scheme.

mod cube_face;
mod error;
mod face_quad;
mod lod;
mod projection;
mod quadtree;
mod tile_code;

pub use cube_face::CubeFace;
pub use error::{GeometryError, TileCodeParseError};
pub use face_quad::{FaceQuad, Quadrant};
pub use lod::{LodSettings, refine};
pub use projection::project_to_sphere;
pub use quadtree::{CubeSphereQuadtree, FaceQuadtree, QuadNode};
pub use tile_code::TileCode;
