//! Scene graph assembly: parent/child wiring, root collection and world
//! transform propagation.
//!
//! The node links always form a forest. [`link`] refuses an edge that would
//! close a cycle and moves a child that already has a parent, so no node is
//! reachable from two roots.

use glam::Mat4;
use log::{debug, warn};

use crate::scene::{NodeId, Scene};

/// True when `ancestor` is `node` or lies on the parent chain above it
fn is_ancestor(scene: &Scene, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = scene.node(id).parent;
    }
    false
}

/// Makes `child` a child of `parent`. Returns false when the link was rejected.
pub fn link(scene: &mut Scene, parent: NodeId, child: NodeId) -> bool {
    if is_ancestor(scene, child, parent) {
        warn!(
            "refusing to parent `{}` under `{}`: it would create a cycle",
            scene.node(child).name,
            scene.node(parent).name
        );
        return false;
    }

    match scene.node(child).parent {
        Some(existing) if existing == parent => return true,
        Some(existing) => {
            warn!(
                "`{}` already has parent `{}`, moving it under `{}`",
                scene.node(child).name,
                scene.node(existing).name,
                scene.node(parent).name
            );
            scene.node_mut(existing).children.retain(|&c| c != child);
        }
        None => {}
    }

    scene.node_mut(child).parent = Some(parent);
    scene.node_mut(parent).children.push(child);
    true
}

/// Rebuilds the root list from nodes that have no parent.
pub fn collect_roots(scene: &mut Scene) {
    let roots: Vec<NodeId> = scene
        .nodes()
        .filter(|(_, node)| node.is_root())
        .map(|(id, _)| id)
        .collect();
    scene.roots = roots;
}

/// Sets `world = parent_world * local` for every node, depth first, with
/// `seed` standing in for the parent of each root.
pub fn propagate_transforms(scene: &mut Scene, seed: Mat4) {
    let mut stack: Vec<(NodeId, Mat4)> = scene.roots.iter().rev().map(|&r| (r, seed)).collect();

    while let Some((id, parent_world)) = stack.pop() {
        let node = scene.node_mut(id);
        node.world_transform = parent_world * node.local_transform;
        let world = node.world_transform;
        stack.extend(node.children.iter().rev().map(|&c| (c, world)));
    }
}

/// Collects roots and propagates world transforms from identity.
/// Backends call this once every node and link is in place.
pub fn assemble(scene: &mut Scene) {
    collect_roots(scene);
    propagate_transforms(scene, Mat4::IDENTITY);
    debug!(
        "scene graph assembled: {} nodes, {} roots",
        scene.node_count(),
        scene.roots.len()
    );
}
