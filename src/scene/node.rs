use std::borrow::Cow;

use glam::Affine3A;

use crate::math::BoundingBox;
use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A minimal scene node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships:
/// - `parent`: Optional handle to parent node (None for root nodes)
/// - `children`: Ordered list of child node handles
///
/// # Geometry
///
/// `geometry` is the local-space bounding box of whatever renderable the
/// node carries (a mesh, a sprite quad...). Group nodes leave it `None`.
/// Bounds queries transform it by the node's world matrix.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub geometry: Option<BoundingBox>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            geometry: None,
            visible: true,
        }
    }

    /// Creates a node carrying a local-space box of the given extent, centered on its origin.
    #[must_use]
    pub fn with_box(name: impl Into<Cow<'static, str>>, size: glam::Vec3) -> Self {
        let mut node = Self::new(name);
        node.geometry = Some(BoundingBox::from_center_size(glam::Vec3::ZERO, size));
        node
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World matrix as of the last [`Scene::update_matrix_world`](crate::scene::Scene::update_matrix_world).
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}
