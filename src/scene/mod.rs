//! Scene graph module
//!
//! A minimal hierarchical scene graph holding only what choreography needs:
//! - Node: scene node (hierarchy, transform, optional geometry bounds)
//! - Transform: position, rotation and scale with cached matrices
//! - Scene: slotmap-backed node container
//! - TransformSystem: hierarchy matrix propagation, decoupled from Scene

pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a node in a [`Scene`].
    pub struct NodeHandle;
}
