use std::path::Path;

use glam::{Mat4, Vec2, Vec3};
use log::{debug, warn};

use crate::config::BoundsMode;
use crate::error::ImportError;
use crate::graph;
use crate::math::{compose_trs, from_column_major};
use crate::mesh::Mesh;
use crate::scene::{MeshNode, Scene};

/// Loads a `.gltf`/`.glb` file into `scene`.
///
/// Every glTF mesh becomes one [`Mesh`] holding all of its primitives back
/// to back; each primitive's indices are offset by the number of vertices
/// already written. Attributes a primitive lacks stay zeroed.
pub fn import_gltf(path: &Path, bounds_mode: BoundsMode, scene: &mut Scene) -> Result<(), ImportError> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path).map_err(ImportError::parse)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob).map_err(ImportError::parse)?;

    debug!(
        "glTF document: {} meshes, {} nodes, {} buffers",
        document.meshes().len(),
        document.nodes().len(),
        buffers.len()
    );

    // Mesh and node handles in declaration order, indexed like the document
    let mut mesh_ids = Vec::new();
    for mesh in document.meshes() {
        let name = mesh
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index()));
        let mut new_mesh = Mesh::new(name);

        for primitive in mesh.primitives() {
            let Some(first_vertex) = append_primitive(&mut new_mesh, &primitive, &buffers)? else {
                continue;
            };
            if bounds_mode == BoundsMode::LastPrimitive {
                new_mesh.recompute_bounds_from(first_vertex);
            }
        }
        if bounds_mode == BoundsMode::WholeMesh {
            new_mesh.recompute_bounds();
        }

        new_mesh.validate().map_err(ImportError::parse)?;
        debug!(
            "  mesh `{}`: {} vertices, {} indices",
            new_mesh.name,
            new_mesh.vertex_count(),
            new_mesh.indices.len()
        );
        mesh_ids.push(scene.insert_mesh(new_mesh));
    }

    let mut node_ids = Vec::new();
    for node in document.nodes() {
        let name = node
            .name()
            .map(str::to_owned)
            .unwrap_or_else(|| format!("node_{}", node.index()));
        let mut new_node = MeshNode::new(name, local_transform(node.transform()));
        if let Some(mesh) = node.mesh() {
            new_node.meshes.push(mesh_ids[mesh.index()]);
        }
        node_ids.push(scene.insert_node(new_node));
    }

    for node in document.nodes() {
        let parent = node_ids[node.index()];
        for child in node.children() {
            graph::link(scene, parent, node_ids[child.index()]);
        }
    }

    graph::assemble(scene);
    Ok(())
}

/// Appends one primitive to `mesh`, returning the id of its first vertex,
/// or `None` when the primitive was skipped.
fn append_primitive(
    mesh: &mut Mesh,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<usize>, ImportError> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        warn!(
            "Skipping primitive {} of mesh `{}`: mode {:?} is not a triangle list",
            primitive.index(),
            mesh.name,
            primitive.mode()
        );
        return Ok(None);
    }

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(|iter| iter.collect())
        .ok_or_else(|| {
            ImportError::parse(format!(
                "primitive {} of mesh `{}` has no POSITION attribute",
                primitive.index(),
                mesh.name
            ))
        })?;

    let first_vertex = mesh.vertex_count();
    let offset = u32::try_from(first_vertex).map_err(ImportError::parse)?;
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().map(|i| i + offset).collect(),
        None => (offset..offset + positions.len() as u32).collect(),
    };
    mesh.indices.extend(indices);

    mesh.append_vertices(positions.len());
    for (slot, p) in mesh.positions[first_vertex..].iter_mut().zip(positions) {
        *slot = Vec3::from_array(p);
    }
    if let Some(normals) = reader.read_normals() {
        for (slot, n) in mesh.normals[first_vertex..].iter_mut().zip(normals) {
            *slot = Vec3::from_array(n);
        }
    }
    if let Some(uvs) = reader.read_tex_coords(0) {
        for (slot, uv) in mesh.uvs[first_vertex..].iter_mut().zip(uvs.into_f32()) {
            *slot = Vec2::from_array(uv);
        }
    }

    Ok(Some(first_vertex))
}

/// Matrix nodes are copied as-is, TRS nodes are composed `T * R * S`
fn local_transform(transform: gltf::scene::Transform) -> Mat4 {
    match transform {
        gltf::scene::Transform::Matrix { matrix } => from_column_major(matrix),
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => compose_trs(translation, rotation, scale),
    }
}
