//! Distance-driven split/merge of the cube-sphere quadtrees.

use glam::DVec3;

use crate::{CubeSphereQuadtree, FaceQuad, QuadNode, TileCode, project_to_sphere};

/// Split/merge tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodSettings {
    /// A tile splits when the focus is closer to its center than
    /// `split_factor × edge length` (both measured on the sphere).
    pub split_factor: f64,
    /// Deepest level the refinement will create.
    pub max_level: usize,
}

impl Default for LodSettings {
    fn default() -> Self {
        Self {
            split_factor: 2.0,
            max_level: 8,
        }
    }
}

impl LodSettings {
    fn wants_split(&self, code: &TileCode, focus: DVec3, radius: f64) -> bool {
        let quad = FaceQuad::resolve(code);
        let center = project_to_sphere(quad.center(), radius);
        let a = project_to_sphere(quad.top_left, 1.0);
        let b = project_to_sphere(quad.top_right, 1.0);
        let edge = a.angle_between(b) * radius;
        (focus - center).length() < self.split_factor * edge
    }
}

/// Refine all six face trees around `focus` (real-world meters) on a sphere
/// of `radius` meters and return the resulting leaves.
pub fn refine(
    tree: &mut CubeSphereQuadtree,
    focus: DVec3,
    radius: f64,
    settings: &LodSettings,
) -> Vec<TileCode> {
    for face in &mut tree.faces {
        refine_node(&mut face.root, focus, radius, settings);
    }
    tree.all_leaves()
}

fn refine_node(node: &mut QuadNode, focus: DVec3, radius: f64, settings: &LodSettings) {
    let split = node.code().level() < settings.max_level
        && settings.wants_split(node.code(), focus, radius);

    if !split {
        node.merge();
        return;
    }
    node.subdivide();
    if let QuadNode::Branch { children, .. } = node {
        for child in children.iter_mut() {
            refine_node(child, focus, radius, settings);
        }
    }
}
