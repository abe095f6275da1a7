use glam::Vec3;
use serde::Serialize;

use crate::math::AABB;

/// Axis-aligned extent of a mesh plus a coarse bounding sphere radius
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub aabb_min: [f32; 3],
    pub aabb_max: [f32; 3],
    /// Half the AABB diagonal
    pub sphere_radius: f32,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self::from_aabb(AABB::new(min, max))
    }

    pub fn from_aabb(aabb: AABB) -> Self {
        Self {
            aabb_min: aabb.min.to_array(),
            aabb_max: aabb.max.to_array(),
            sphere_radius: aabb.half_diagonal(),
        }
    }

    /// Bounds of `positions`, `None` for an empty range
    pub fn from_positions(positions: &[Vec3]) -> Option<Self> {
        AABB::from_points(positions).map(Self::from_aabb)
    }

    pub fn aabb(&self) -> AABB {
        AABB::new(Vec3::from_array(self.aabb_min), Vec3::from_array(self.aabb_max))
    }
}

/// Interleaved vertex record handed to the mesh optimizer
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Byte offset of `position` inside the record
    pub const POSITION_OFFSET: usize = 0;
}

/// Three vertex indices in index-buffer order.
///
/// Equality is field-wise: `(0, 1, 2)` and `(1, 2, 0)` are different triangles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub i0: u32,
    pub i1: u32,
    pub i2: u32,
}

impl Triangle {
    pub const fn new(i0: u32, i1: u32, i2: u32) -> Self {
        Self { i0, i1, i2 }
    }

    pub const fn indices(&self) -> [u32; 3] {
        [self.i0, self.i1, self.i2]
    }

    pub fn contains(&self, index: u32) -> bool {
        self.i0 == index || self.i1 == index || self.i2 == index
    }
}

/// Four-vertex face rebuilt from two adjacent triangles
#[derive(Copy, Clone, Debug)]
pub struct Quad {
    /// Main triangle indices followed by the resolved fourth vertex
    pub indices: [u32; 4],
    pub t1: Triangle,
    pub t2: Triangle,
}

impl Quad {
    /// Sorted indices; two quads over the same four vertices share this key
    pub fn key(&self) -> [u32; 4] {
        let mut key = self.indices;
        key.sort_unstable();
        key
    }
}

impl PartialEq for Quad {
    fn eq(&self, other: &Self) -> bool {
        (self.t1 == other.t1 && self.t2 == other.t2) || (self.t1 == other.t2 && self.t2 == other.t1)
    }
}

impl Eq for Quad {}
