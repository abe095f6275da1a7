//! General-purpose importer.
//!
//! Files are first decoded into a [`SourceScene`], a plain node tree with
//! polygon meshes, then post-processed and normalized into a [`Scene`].
//! The OBJ reader is backed by `tobj`; anything that can build a
//! `SourceScene` can be fed to [`build_scene`].

use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, warn};

use crate::config::PostProcess;
use crate::error::ImportError;
use crate::graph;
use crate::math::{from_row_major, AABB};
use crate::mesh::Mesh;
use crate::scene::{MeshNode, Scene};
use crate::types::Bounds;

/// Polygon mesh as decoded from the source file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// Empty when the source has no normals
    pub normals: Vec<Vec3>,
    /// Empty when the source has no texture coordinates
    pub uvs: Vec<Vec2>,
    /// One entry per face, any arity
    pub faces: Vec<Vec<u32>>,
    pub aabb: Option<AABB>,
}

/// Node of the decoded tree. `meshes` indexes into [`SourceScene::meshes`].
#[derive(Clone, Debug, PartialEq)]
pub struct SourceNode {
    pub name: String,
    /// Row-major local transform
    pub transformation: [[f32; 4]; 4],
    pub meshes: Vec<usize>,
    pub children: Vec<SourceNode>,
}

impl SourceNode {
    pub const IDENTITY: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transformation: Self::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// First node named `name` in depth-first order, this node included
    pub fn find_node(&self, name: &str) -> Option<&SourceNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.name == name {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceScene {
    pub meshes: Vec<SourceMesh>,
    pub root: Option<SourceNode>,
    /// Set by the reader when it could not produce a usable scene
    pub incomplete: bool,
    /// Reader diagnostics, reported with [`ImportError::IncompleteScene`]
    pub diagnostic: String,
}

impl SourceScene {
    /// Decodes a Wavefront OBJ file. Materials are not read.
    ///
    /// Polygons are fan-split by the reader when `steps.triangulate` is set;
    /// the remaining steps run in [`SourceScene::post_process`].
    pub fn read_obj(path: &Path, steps: &PostProcess) -> Result<Self, ImportError> {
        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: steps.triangulate,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) = tobj::load_obj(path, &options).map_err(ImportError::parse)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("root")
            .to_string();
        let mut root = SourceNode::new(stem);
        let mut meshes = Vec::with_capacity(models.len());

        for (i, model) in models.into_iter().enumerate() {
            // tobj reports an empty default object for files without geometry
            if model.mesh.positions.is_empty() {
                debug!("  skipping obj model `{}` without vertices", model.name);
                continue;
            }
            let name = if model.name.is_empty() {
                format!("mesh_{i}")
            } else {
                model.name
            };
            let mesh = source_mesh_from_tobj(name.clone(), model.mesh);
            debug!(
                "  obj model `{}`: {} vertices, {} faces",
                mesh.name,
                mesh.positions.len(),
                mesh.faces.len()
            );

            let mut node = SourceNode::new(name);
            node.meshes.push(meshes.len());
            root.children.push(node);
            meshes.push(mesh);
        }

        let incomplete = meshes.is_empty();
        Ok(Self {
            meshes,
            root: Some(root),
            incomplete,
            diagnostic: if incomplete {
                format!("{} contains no geometry", path.display())
            } else {
                String::new()
            },
        })
    }

    /// Applies the requested processing steps to every mesh, in a fixed order:
    /// degenerate removal, normals, uv flip, bounds, cache order.
    /// Triangulation belongs to the reader.
    pub fn post_process(&mut self, steps: &PostProcess) {
        for mesh in &mut self.meshes {
            if steps.find_degenerates {
                remove_degenerate_faces(mesh);
            }
            if steps.gen_smooth_normals && mesh.normals.is_empty() {
                generate_smooth_normals(mesh);
            }
            if steps.flip_uvs {
                for uv in &mut mesh.uvs {
                    uv.y = 1.0 - uv.y;
                }
            }
            if steps.gen_bounding_boxes {
                mesh.aabb = AABB::from_points(&mesh.positions);
            }
            if steps.improve_cache_locality {
                improve_cache_locality(mesh);
            }
        }
    }
}

fn source_mesh_from_tobj(name: String, mesh: tobj::Mesh) -> SourceMesh {
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| Vec3::new(n[0], n[1], n[2]))
        .collect();
    let uvs = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| Vec2::new(t[0], t[1]))
        .collect();

    // No arities means every face is a triangle
    let faces = if mesh.face_arities.is_empty() {
        mesh.indices.chunks_exact(3).map(<[u32]>::to_vec).collect()
    } else {
        let mut start = 0;
        mesh.face_arities
            .iter()
            .map(|&arity| {
                let end = start + arity as usize;
                let face = mesh.indices[start..end].to_vec();
                start = end;
                face
            })
            .collect()
    };

    SourceMesh {
        name,
        positions,
        normals,
        uvs,
        faces,
        aabb: None,
    }
}

/// Drops faces with fewer than three distinct corners
fn remove_degenerate_faces(mesh: &mut SourceMesh) {
    let before = mesh.faces.len();
    mesh.faces.retain(|face| {
        face.len() >= 3 && face.iter().enumerate().all(|(i, v)| !face[..i].contains(v))
    });
    let removed = before - mesh.faces.len();
    if removed > 0 {
        debug!("removed {} degenerate faces from `{}`", removed, mesh.name);
    }
}

/// Area-weighted vertex normals from the polygon fans
fn generate_smooth_normals(mesh: &mut SourceMesh) {
    let mut normals = vec![Vec3::ZERO; mesh.positions.len()];
    for face in &mesh.faces {
        if face.len() < 3 || face.iter().any(|&i| i as usize >= normals.len()) {
            continue;
        }
        let origin = mesh.positions[face[0] as usize];
        let mut face_normal = Vec3::ZERO;
        for pair in face[1..].windows(2) {
            let a = mesh.positions[pair[0] as usize] - origin;
            let b = mesh.positions[pair[1] as usize] - origin;
            face_normal += a.cross(b);
        }
        for &i in face {
            normals[i as usize] += face_normal;
        }
    }
    mesh.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
}

fn improve_cache_locality(mesh: &mut SourceMesh) {
    if mesh.faces.is_empty() || mesh.faces.iter().any(|f| f.len() != 3) {
        return;
    }
    let indices: Vec<u32> = mesh.faces.concat();
    if indices.iter().any(|&i| i as usize >= mesh.positions.len()) {
        return;
    }
    let ordered = meshopt::optimize_vertex_cache(&indices, mesh.positions.len());
    mesh.faces = ordered.chunks_exact(3).map(<[u32]>::to_vec).collect();
}

/// Extensions the general-purpose reader can decode
pub const SUPPORTED_EXTENSIONS: &[&str] = &["obj"];

/// Reads `path` with the general-purpose reader and normalizes it into `scene`.
pub fn import_native(path: &Path, steps: &PostProcess, scene: &mut Scene) -> Result<(), ImportError> {
    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)));
    if !supported {
        return Err(ImportError::parse(format!(
            "unsupported format {:?}, the native importer reads {}",
            path.extension().unwrap_or_default(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let mut source = SourceScene::read_obj(path, steps)?;
    source.post_process(steps);
    build_scene(&source, scene)
}

/// Normalizes an already decoded tree into `scene`.
///
/// Meshes and nodes are registered depth-first; parent links are resolved
/// in a second pass by looking each node's name up in the source tree.
pub fn build_scene(source: &SourceScene, scene: &mut Scene) -> Result<(), ImportError> {
    let root = match &source.root {
        Some(root) if !source.incomplete => root,
        Some(_) => {
            return Err(ImportError::IncompleteScene {
                message: source.diagnostic.clone(),
            })
        }
        None => {
            return Err(ImportError::IncompleteScene {
                message: if source.diagnostic.is_empty() {
                    "scene has no root node".to_string()
                } else {
                    source.diagnostic.clone()
                },
            })
        }
    };

    let mut registered = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let mut new_node = MeshNode::new(node.name.clone(), from_row_major(node.transformation));
        for &index in &node.meshes {
            let source_mesh = source.meshes.get(index).ok_or_else(|| {
                ImportError::parse(format!(
                    "node `{}` references mesh {} of {}",
                    node.name,
                    index,
                    source.meshes.len()
                ))
            })?;
            let mesh = normalize_mesh(source_mesh);
            mesh.validate().map_err(ImportError::parse)?;
            new_node.meshes.push(scene.insert_mesh(mesh));
        }
        registered.push(scene.insert_node(new_node));
        stack.extend(node.children.iter().rev());
    }

    // Only nodes from this tree; earlier imports into `scene` keep their links
    for parent in registered {
        let Some(source_node) = root.find_node(&scene.node(parent).name) else {
            continue;
        };
        for child in &source_node.children {
            if let Some(child) = scene.node_id(&child.name) {
                graph::link(scene, parent, child);
            }
        }
    }

    graph::assemble(scene);
    Ok(())
}

/// Converts a decoded mesh to the parallel-array form. Attributes the
/// source lacks are zero-filled; faces that are not triangles are skipped.
fn normalize_mesh(source: &SourceMesh) -> Mesh {
    let mut mesh = Mesh::new(source.name.clone());
    let count = source.positions.len();
    mesh.append_vertices(count);
    mesh.positions.copy_from_slice(&source.positions);

    if source.normals.len() == count {
        mesh.normals.copy_from_slice(&source.normals);
    } else if !source.normals.is_empty() {
        warn!(
            "mesh `{}`: {} normals for {} vertices, ignoring them",
            source.name,
            source.normals.len(),
            count
        );
    }
    if source.uvs.len() == count {
        mesh.uvs.copy_from_slice(&source.uvs);
    } else if !source.uvs.is_empty() {
        warn!(
            "mesh `{}`: {} uvs for {} vertices, ignoring them",
            source.name,
            source.uvs.len(),
            count
        );
    }

    let mut skipped = 0;
    for face in &source.faces {
        if face.len() == 3 {
            mesh.indices.extend_from_slice(face);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!("mesh `{}`: skipped {} non-triangle faces", source.name, skipped);
    }

    mesh.bounds = match source.aabb {
        Some(aabb) => Bounds::from_aabb(aabb),
        None => Bounds::from_positions(&mesh.positions).unwrap_or_default(),
    };
    mesh
}
