use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::loaders::Backend;

/// How glTF mesh bounds are computed when a mesh has several primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Bounds cover every vertex of the merged mesh
    #[default]
    WholeMesh,
    /// Bounds cover only the vertices of the last primitive appended
    LastPrimitive,
}

/// Processing steps requested from the general-format importer
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcess {
    /// Split polygons into triangles
    pub triangulate: bool,
    /// Generate normals for meshes that have none
    pub gen_smooth_normals: bool,
    /// Drop faces that reference the same vertex more than once
    pub find_degenerates: bool,
    /// `v = 1 - v` on texture coordinates
    pub flip_uvs: bool,
    /// Store each mesh's AABB
    pub gen_bounding_boxes: bool,
    /// Reorder triangles for post-transform vertex cache reuse
    pub improve_cache_locality: bool,
}

impl Default for PostProcess {
    fn default() -> Self {
        Self {
            triangulate: true,
            gen_smooth_normals: true,
            find_degenerates: true,
            flip_uvs: true,
            gen_bounding_boxes: true,
            improve_cache_locality: true,
        }
    }
}

impl PostProcess {
    /// No processing at all, the source is taken as-is
    pub fn none() -> Self {
        Self {
            triangulate: false,
            gen_smooth_normals: false,
            find_degenerates: false,
            flip_uvs: false,
            gen_bounding_boxes: false,
            improve_cache_locality: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub backend: Backend,
    pub bounds_mode: BoundsMode,
    pub post_process: PostProcess,
    /// Rebuild quads for every mesh after import
    pub reconstruct_quads: bool,
    /// Run the mesh optimizer on every mesh after import
    pub optimize: bool,
}

impl ImportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid import configuration")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json_str(&text).with_context(|| format!("In config file: {:?}", path))
    }
}
