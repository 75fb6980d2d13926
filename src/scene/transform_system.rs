//! Transform System
//!
//! Propagates local matrices down the hierarchy into world matrices. Kept
//! apart from [`Scene`](crate::scene::Scene) so it only borrows the node map
//! and the root list.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every hierarchy rooted at `roots`.
///
/// Uses an explicit stack instead of recursion so deep scenes cannot
/// overflow. A node's world matrix is recomputed only when its own TRS or
/// an ancestor's changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

/// World matrix of `handle` computed from its ancestor chain on demand.
///
/// Does not touch the cached matrices, so it is correct even when the
/// transform system has not run since the last TRS edit.
#[must_use]
pub fn resolve_world_matrix(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Option<Affine3A> {
    let mut node = nodes.get(handle)?;
    let mut world = node.transform.compose();

    while let Some(parent_handle) = node.parent {
        let Some(parent) = nodes.get(parent_handle) else {
            break;
        };
        world = parent.transform.compose() * world;
        node = parent;
    }

    Some(world)
}
