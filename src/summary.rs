use std::fmt;

use serde::Serialize;

use crate::scene::{NodeId, Scene};
use crate::types::Bounds;

/// Serializable overview of an imported scene, printed by the binary
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneSummary {
    pub meshes: Vec<MeshSummary>,
    pub nodes: Vec<NodeSummary>,
    pub roots: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MeshSummary {
    pub name: String,
    pub vertices: usize,
    pub triangles: usize,
    pub quads: usize,
    pub bounds: Bounds,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub meshes: Vec<String>,
    /// Column-major world transform
    pub world_transform: [f32; 16],
}

impl SceneSummary {
    pub fn new(scene: &Scene) -> Self {
        let node_name = |id: NodeId| scene.node(id).name.clone();

        let meshes = scene
            .meshes()
            .map(|(_, mesh)| MeshSummary {
                name: mesh.name.clone(),
                vertices: mesh.vertex_count(),
                triangles: mesh.indices.len() / 3,
                quads: mesh.quads.len(),
                bounds: mesh.bounds,
            })
            .collect();

        let nodes = scene
            .nodes()
            .map(|(id, node)| NodeSummary {
                name: node.name.clone(),
                parent: node.parent().map(node_name),
                children: node.children().iter().copied().map(node_name).collect(),
                meshes: scene.node_meshes(id).map(|m| m.name.clone()).collect(),
                world_transform: node.world_transform().to_cols_array(),
            })
            .collect();

        Self {
            meshes,
            nodes,
            roots: scene.roots().iter().copied().map(node_name).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} meshes, {} nodes", self.meshes.len(), self.nodes.len())?;
        for mesh in &self.meshes {
            writeln!(
                f,
                "  mesh {:<24} {:>8} vertices {:>8} triangles {:>8} quads  radius {:.3}",
                mesh.name, mesh.vertices, mesh.triangles, mesh.quads, mesh.bounds.sphere_radius
            )?;
        }
        for root in &self.roots {
            writeln!(f, "  root {}", root)?;
        }
        Ok(())
    }
}
