//! Bounding volumes for scene subtrees.
//!
//! [`compute_bounds`] is recomputed on every call; nothing is cached because
//! the subtree may have moved since the last query.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{NodeHandle, Scene};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Zero-extent box at a single point.
    #[must_use]
    pub fn point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// World-space AABB enclosing all eight transformed corners.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut new_min = Vec3::splat(f32::INFINITY);
        let mut new_max = Vec3::splat(f32::NEG_INFINITY);

        for point in corners {
            let transformed = matrix.transform_point3(point);
            new_min = new_min.min(transformed);
            new_max = new_max.max(transformed);
        }

        Self { min: new_min, max: new_max }
    }
}

/// Derived size and center of a subtree's world-space bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub size: Vec3,
    pub center: Vec3,
}

impl From<BoundingBox> for Bounds {
    fn from(b: BoundingBox) -> Self {
        Self {
            size: b.size(),
            center: b.center(),
        }
    }
}

/// World-space AABB of every geometry in the subtree rooted at `root`.
///
/// Returns `None` when `root` is not a live node. A subtree without any
/// geometry yields a zero-size box at the root's world position.
#[must_use]
pub fn compute_box(scene: &Scene, root: NodeHandle) -> Option<BoundingBox> {
    let root_world = scene.world_matrix(root)?;

    let mut accumulated: Option<BoundingBox> = None;
    let mut stack: Vec<(NodeHandle, Affine3A)> = vec![(root, root_world)];

    while let Some((handle, world)) = stack.pop() {
        let Some(node) = scene.get_node(handle) else {
            continue;
        };

        if let Some(local) = &node.geometry {
            let world_box = local.transform(&world);
            accumulated = Some(match accumulated {
                Some(acc) => acc.union(&world_box),
                None => world_box,
            });
        }

        for &child in node.children() {
            if let Some(child_node) = scene.get_node(child) {
                stack.push((child, world * child_node.transform.compose()));
            }
        }
    }

    Some(accumulated.unwrap_or_else(|| BoundingBox::point(Vec3::from(root_world.translation))))
}

/// Size and center of the subtree rooted at `root`. See [`compute_box`].
#[must_use]
pub fn compute_bounds(scene: &Scene, root: NodeHandle) -> Option<Bounds> {
    compute_box(scene, root).map(Bounds::from)
}

/// Shifts `root` so the center of its subtree bounds lands on the world origin.
///
/// Returns the offset applied, or `None` for a dead handle.
pub fn center_on_origin(scene: &mut Scene, root: NodeHandle) -> Option<Vec3> {
    let bounds = compute_bounds(scene, root)?;
    let parent_world = scene
        .get_node(root)?
        .parent()
        .and_then(|p| scene.world_matrix(p))
        .unwrap_or(Affine3A::IDENTITY);

    // The offset is in world space; convert to the parent's space before writing.
    let local_offset = parent_world.inverse().transform_vector3(-bounds.center);
    let node = scene.get_node_mut(root)?;
    node.transform.position += local_offset;
    Some(-bounds.center)
}
