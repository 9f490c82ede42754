//! Per-face quadtrees of tile codes for adaptive subdivision.

use crate::{CubeFace, Quadrant, TileCode};

/// A node in a face quadtree.
///
/// A leaf is rendered as one tile; a branch has exactly four children in
/// [`Quadrant`] order (TL, TR, BL, BR).
#[derive(Debug, Clone, PartialEq)]
pub enum QuadNode {
    /// A region rendered as a single tile.
    Leaf {
        /// Address of this region.
        code: TileCode,
    },
    /// A region split into four children.
    Branch {
        /// Address of this region.
        code: TileCode,
        /// The four children, indexed by [`Quadrant::index`].
        children: Box<[QuadNode; 4]>,
    },
}

impl QuadNode {
    /// Split this leaf into four leaves one level deeper.
    ///
    /// Returns `false` and leaves the node alone if it is already a branch or
    /// sits at [`TileCode::MAX_LEVEL`].
    pub fn subdivide(&mut self) -> bool {
        let QuadNode::Leaf { code } = self else {
            return false;
        };
        let Some(children) = code.children() else {
            return false;
        };
        let code = code.clone();
        *self = QuadNode::Branch {
            code,
            children: Box::new(children.map(|code| QuadNode::Leaf { code })),
        };
        true
    }

    /// Collapse a branch back into a single leaf. No-op on a leaf.
    pub fn merge(&mut self) {
        if let QuadNode::Branch { code, .. } = self {
            *self = QuadNode::Leaf { code: code.clone() };
        }
    }

    /// The leaf containing face-level `(u, v)`.
    #[must_use]
    pub fn find_leaf(&self, u: f64, v: f64) -> &TileCode {
        match self {
            QuadNode::Leaf { code } => code,
            QuadNode::Branch { code, children } => {
                let (u_min, v_min, u_max, v_max) = code.uv_bounds();
                let local_u = (u - u_min) / (u_max - u_min);
                let local_v = (v - v_min) / (v_max - v_min);
                let q = Quadrant::containing(local_u, local_v);
                children[usize::from(q.index())].find_leaf(u, v)
            }
        }
    }

    /// All leaf codes, depth-first in quadrant order.
    #[must_use]
    pub fn all_leaves(&self) -> Vec<TileCode> {
        let mut result = Vec::new();
        self.visit_leaves(&mut |code| result.push(code.clone()));
        result
    }

    /// Leaf codes at exactly `level`.
    #[must_use]
    pub fn leaves_at_level(&self, level: usize) -> Vec<TileCode> {
        let mut result = Vec::new();
        self.visit_leaves(&mut |code| {
            if code.level() == level {
                result.push(code.clone());
            }
        });
        result
    }

    fn visit_leaves(&self, f: &mut impl FnMut(&TileCode)) {
        match self {
            QuadNode::Leaf { code } => f(code),
            QuadNode::Branch { children, .. } => {
                for child in children.iter() {
                    child.visit_leaves(f);
                }
            }
        }
    }

    /// Returns true if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, QuadNode::Leaf { .. })
    }

    /// The code of this node, leaf or branch.
    #[must_use]
    pub fn code(&self) -> &TileCode {
        match self {
            QuadNode::Leaf { code } | QuadNode::Branch { code, .. } => code,
        }
    }
}

/// The quadtree for one cube face. The root covers the whole face.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceQuadtree {
    pub face: CubeFace,
    pub root: QuadNode,
}

impl FaceQuadtree {
    /// A tree with a single leaf covering the face.
    #[must_use]
    pub fn new(face: CubeFace) -> Self {
        Self {
            face,
            root: QuadNode::Leaf {
                code: TileCode::root(face),
            },
        }
    }
}

/// Six face quadtrees covering the whole sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeSphereQuadtree {
    pub faces: [FaceQuadtree; 6],
}

impl CubeSphereQuadtree {
    /// One unsplit tree per face, in [`CubeFace::ALL`] order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            faces: CubeFace::ALL.map(FaceQuadtree::new),
        }
    }

    /// The tree for `face`.
    #[must_use]
    pub fn face(&self, face: CubeFace) -> &FaceQuadtree {
        &self.faces[face as usize]
    }

    /// Mutable access to the tree for `face`.
    pub fn face_mut(&mut self, face: CubeFace) -> &mut FaceQuadtree {
        &mut self.faces[face as usize]
    }

    /// Every leaf on every face.
    #[must_use]
    pub fn all_leaves(&self) -> Vec<TileCode> {
        self.faces.iter().flat_map(|t| t.root.all_leaves()).collect()
    }
}

impl Default for CubeSphereQuadtree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch_children(node: &mut QuadNode) -> &mut [QuadNode; 4] {
        match node {
            QuadNode::Branch { children, .. } => children,
            QuadNode::Leaf { .. } => panic!("expected a branch"),
        }
    }

    #[test]
    fn test_root_covers_entire_face() {
        let tree = FaceQuadtree::new(CubeFace::Right);
        assert_eq!(tree.root.code().uv_bounds(), (0.0, 0.0, 1.0, 1.0));
        assert_eq!(tree.root.code().to_string(), "Rgt");
    }

    #[test]
    fn test_subdivide_produces_4_children() {
        let mut tree = FaceQuadtree::new(CubeFace::Top);
        assert!(tree.root.subdivide());
        let children = branch_children(&mut tree.root);
        let names: Vec<String> = children.iter().map(|c| c.code().to_string()).collect();
        assert_eq!(names, ["Top0", "Top1", "Top2", "Top3"]);
        assert!(children.iter().all(QuadNode::is_leaf));
    }

    #[test]
    fn test_subdivide_branch_is_rejected() {
        let mut tree = FaceQuadtree::new(CubeFace::Top);
        tree.root.subdivide();
        let before = tree.root.clone();
        assert!(!tree.root.subdivide());
        assert_eq!(tree.root, before);
    }

    #[test]
    fn test_subdivide_at_max_level_is_rejected() {
        let code = TileCode::new(CubeFace::Back, vec![Quadrant::TopLeft; TileCode::MAX_LEVEL])
            .unwrap();
        let mut node = QuadNode::Leaf { code };
        assert!(!node.subdivide());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_find_leaf() {
        let mut tree = FaceQuadtree::new(CubeFace::Front);
        tree.root.subdivide();
        branch_children(&mut tree.root)[3].subdivide();

        assert_eq!(tree.root.find_leaf(0.1, 0.1).to_string(), "Frt0");
        assert_eq!(tree.root.find_leaf(0.9, 0.2).to_string(), "Frt1");
        assert_eq!(tree.root.find_leaf(0.6, 0.6).to_string(), "Frt30");
        assert_eq!(tree.root.find_leaf(0.9, 0.9).to_string(), "Frt33");
    }

    #[test]
    fn test_merge_reverses_subdivide() {
        let mut tree = FaceQuadtree::new(CubeFace::Left);
        let original = tree.root.clone();
        tree.root.subdivide();
        assert!(!tree.root.is_leaf());
        tree.root.merge();
        assert_eq!(tree.root, original);
    }

    #[test]
    fn test_leaves_at_level() {
        let mut tree = FaceQuadtree::new(CubeFace::Bottom);
        tree.root.subdivide();
        branch_children(&mut tree.root)[0].subdivide();

        assert_eq!(tree.root.leaves_at_level(1).len(), 3);
        assert_eq!(tree.root.leaves_at_level(2).len(), 4);
        assert_eq!(tree.root.all_leaves().len(), 7);
    }

    #[test]
    fn test_cube_sphere_has_six_roots() {
        let mut sphere = CubeSphereQuadtree::new();
        assert_eq!(sphere.all_leaves().len(), 6);
        for face in CubeFace::ALL {
            assert_eq!(sphere.face(face).face, face);
        }
        sphere.face_mut(CubeFace::Back).root.subdivide();
        assert_eq!(sphere.all_leaves().len(), 9);
    }
}
