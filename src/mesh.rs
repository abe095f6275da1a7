use glam::{Vec2, Vec3};

use crate::error::MeshError;
use crate::topology;
use crate::types::{Bounds, Quad, Triangle, Vertex};

/// A named, pre-triangulated mesh stored as parallel attribute arrays.
///
/// `positions`, `normals` and `uvs` always have the same length and every
/// entry of `indices` addresses into them. `triangles` and `quads` are
/// derived and only refreshed by [`Mesh::calculate_triangles`] and
/// [`Mesh::calculate_quads`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub bounds: Bounds,
    pub indices: Vec<u32>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub triangles: Vec<Triangle>,
    pub quads: Vec<Quad>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Grows all three attribute arrays by `count` default-valued slots and
    /// returns the first new vertex id.
    pub fn append_vertices(&mut self, count: usize) -> usize {
        let first = self.positions.len();
        let len = first + count;
        self.positions.resize(len, Vec3::ZERO);
        self.normals.resize(len, Vec3::ZERO);
        self.uvs.resize(len, Vec2::ZERO);
        first
    }

    /// Recomputes `bounds` over the vertices from `first_vertex` onward.
    /// An empty range leaves the bounds untouched.
    pub fn recompute_bounds_from(&mut self, first_vertex: usize) {
        let range = self.positions.get(first_vertex..).unwrap_or(&[]);
        if let Some(bounds) = Bounds::from_positions(range) {
            self.bounds = bounds;
        }
    }

    pub fn recompute_bounds(&mut self) {
        self.recompute_bounds_from(0);
    }

    /// Checks the parallel-array and index-range invariants.
    pub fn validate(&self) -> Result<(), MeshError> {
        let positions = self.positions.len();
        if self.normals.len() != positions || self.uvs.len() != positions {
            return Err(MeshError::MismatchedAttributes {
                mesh: self.name.clone(),
                positions,
                normals: self.normals.len(),
                uvs: self.uvs.len(),
            });
        }

        match self.indices.iter().find(|&&i| i as usize >= positions) {
            Some(&index) => Err(MeshError::IndexOutOfRange {
                mesh: self.name.clone(),
                index,
                vertex_count: positions,
            }),
            None => Ok(()),
        }
    }

    /// Array-of-structures copy of the vertex attributes.
    ///
    /// Expects the attribute arrays to be the same length; extra entries in
    /// `normals` or `uvs` are ignored.
    pub fn to_interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((p, n), uv)| Vertex {
                position: p.to_array(),
                normal: n.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }

    /// Replaces the attribute arrays with the contents of `vertices`.
    pub fn from_interleaved(&mut self, vertices: &[Vertex]) {
        self.positions = vertices.iter().map(|v| Vec3::from_array(v.position)).collect();
        self.normals = vertices.iter().map(|v| Vec3::from_array(v.normal)).collect();
        self.uvs = vertices.iter().map(|v| Vec2::from_array(v.uv)).collect();
    }

    pub fn calculate_triangles(&mut self) {
        self.triangles = topology::triangulate(&self.indices);
    }

    /// Rebuilds `triangles`, then pairs adjacent triangles into `quads`.
    pub fn calculate_quads(&mut self) {
        self.calculate_triangles();
        self.quads = topology::reconstruct_quads(&self.triangles, &self.normals);
    }

    /// Drops derived topology after the index buffer changed.
    pub(crate) fn invalidate_topology(&mut self) {
        self.triangles.clear();
        self.quads.clear();
    }
}
