//! Scene registries: meshes and nodes owned by one [`Scene`], addressed by
//! stable integer handles and looked up by name.

use std::collections::HashMap;
use std::path::Path;

use glam::Mat4;
use log::{info, warn};

use crate::error::{ImportError, OptimizeError};
use crate::graph;
use crate::loaders::{self, Backend};
use crate::mesh::Mesh;
use crate::optimize;

/// Handle to a mesh inside the scene that created it
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub(crate) usize);

/// Handle to a node inside the scene that created it
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A transform node. Parent, children and meshes are handles into the owning scene.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub name: String,
    pub local_transform: Mat4,
    pub(crate) world_transform: Mat4,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub meshes: Vec<MeshId>,
}

impl MeshNode {
    pub fn new(name: impl Into<String>, local_transform: Mat4) -> Self {
        Self {
            name: name.into(),
            local_transform,
            world_transform: local_transform,
            parent: None,
            children: Vec::new(),
            meshes: Vec::new(),
        }
    }

    pub fn world_transform(&self) -> Mat4 {
        self.world_transform
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Exclusive owner of every mesh and node produced by an import.
///
/// Names are unique keys. Inserting a mesh or node under a name that is
/// already taken replaces the earlier entry in place, so handles taken
/// before the replacement now refer to the new value.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: Vec<Mesh>,
    nodes: Vec<MeshNode>,
    mesh_lookup: HashMap<String, MeshId>,
    node_lookup: HashMap<String, NodeId>,
    pub(crate) roots: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports `path` into a fresh scene.
    pub fn load(path: impl AsRef<Path>, backend: Backend) -> Result<Self, ImportError> {
        let mut scene = Scene::new();
        scene.import(path, backend)?;
        Ok(scene)
    }

    /// Imports `path` into this scene with the default configuration.
    ///
    /// On error the scene may be partially populated; call [`Scene::clear`]
    /// before reusing it.
    pub fn import(&mut self, path: impl AsRef<Path>, backend: Backend) -> Result<(), ImportError> {
        let config = crate::config::ImportConfig {
            backend,
            ..Default::default()
        };
        loaders::import(path.as_ref(), &config, self)
    }

    /// Drops every mesh, node and root.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.nodes.clear();
        self.mesh_lookup.clear();
        self.node_lookup.clear();
        self.roots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.nodes.is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn insert_mesh(&mut self, mesh: Mesh) -> MeshId {
        if let Some(&id) = self.mesh_lookup.get(&mesh.name) {
            warn!("mesh name `{}` is not unique, replacing the earlier mesh", mesh.name);
            self.meshes[id.0] = mesh;
            return id;
        }

        let id = MeshId(self.meshes.len());
        self.mesh_lookup.insert(mesh.name.clone(), id);
        self.meshes.push(mesh);
        id
    }

    pub fn insert_node(&mut self, node: MeshNode) -> NodeId {
        if let Some(&id) = self.node_lookup.get(&node.name) {
            warn!("node name `{}` is not unique, replacing the earlier node", node.name);
            self.nodes[id.0] = node;
            return id;
        }

        let id = NodeId(self.nodes.len());
        self.node_lookup.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        &self.meshes[id.0]
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> &mut Mesh {
        &mut self.meshes[id.0]
    }

    pub fn node(&self, id: NodeId) -> &MeshNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MeshNode {
        &mut self.nodes[id.0]
    }

    pub fn mesh_id(&self, name: &str) -> Option<MeshId> {
        self.mesh_lookup.get(name).copied()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_lookup.get(name).copied()
    }

    pub fn mesh_by_name(&self, name: &str) -> Option<&Mesh> {
        self.mesh_id(name).map(|id| self.mesh(id))
    }

    pub fn node_by_name(&self, name: &str) -> Option<&MeshNode> {
        self.node_id(name).map(|id| self.node(id))
    }

    pub fn contains_mesh(&self, name: &str) -> bool {
        self.mesh_lookup.contains_key(name)
    }

    /// Meshes in insertion order
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut Mesh> {
        self.meshes.iter_mut()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MeshNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Nodes without a parent, in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Meshes attached to `node`
    pub fn node_meshes(&self, node: NodeId) -> impl Iterator<Item = &Mesh> {
        self.node(node).meshes.iter().map(move |&id| self.mesh(id))
    }

    /// Re-propagates world transforms with `transform` as the parent of every root.
    pub fn set_transform(&mut self, transform: Mat4) {
        graph::propagate_transforms(self, transform);
    }

    /// Rebuilds triangles and quads for every mesh.
    pub fn calculate_quads(&mut self) {
        for mesh in self.meshes_mut() {
            mesh.calculate_quads();
        }
    }

    /// Runs the mesh optimizer over every mesh, stopping at the first failure.
    pub fn optimize_meshes(&mut self) -> Result<(), OptimizeError> {
        for mesh in self.meshes_mut() {
            optimize::optimize_mesh(mesh)?;
        }
        info!("optimized {} meshes", self.meshes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut scene = Scene::new();
        let mesh = scene.insert_mesh(Mesh::new("body"));
        let node = scene.insert_node(MeshNode::new("root", Mat4::IDENTITY));
        scene.node_mut(node).meshes.push(mesh);

        assert_eq!(scene.mesh_id("body"), Some(mesh));
        assert!(scene.contains_mesh("body"));
        assert!(!scene.contains_mesh("wheel"));
        assert_eq!(scene.node_meshes(node).next().map(|m| m.name.as_str()), Some("body"));
    }

    #[test]
    fn test_name_collision_replaces_in_place() {
        let mut scene = Scene::new();
        let first = scene.insert_mesh(Mesh::new("dup"));
        let mut replacement = Mesh::new("dup");
        replacement.indices = vec![0, 0, 0];
        let second = scene.insert_mesh(replacement);

        assert_eq!(first, second);
        assert_eq!(scene.mesh_count(), 1);
        assert_eq!(scene.mesh(first).indices, vec![0, 0, 0]);
    }

    #[test]
    fn test_calculate_quads_covers_every_mesh() {
        let mut scene = Scene::new();
        for name in ["left", "right"] {
            let mut mesh = Mesh::new(name);
            mesh.append_vertices(4);
            mesh.normals.fill(glam::Vec3::Z);
            mesh.indices = vec![0, 1, 2, 0, 2, 3];
            scene.insert_mesh(mesh);
        }
        scene.calculate_quads();

        for (_, mesh) in scene.meshes() {
            assert_eq!(mesh.triangles.len(), 2, "{}", mesh.name);
            assert_eq!(mesh.quads.len(), 1, "{}", mesh.name);
        }
    }

    #[test]
    fn test_clear_empties_registries() {
        let mut scene = Scene::new();
        scene.insert_mesh(Mesh::new("a"));
        scene.insert_node(MeshNode::new("n", Mat4::IDENTITY));
        graph::assemble(&mut scene);
        assert_eq!(scene.roots().len(), 1);

        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.roots().is_empty());
        assert!(scene.node_id("n").is_none());
    }
}
