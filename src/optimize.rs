use log::debug;

use crate::error::OptimizeError;
use crate::mesh::Mesh;
use crate::types::Vertex;

/// Overdraw threshold: how much worse than optimal the vertex cache may get
/// while reordering for overdraw
pub const OVERDRAW_THRESHOLD: f32 = 1.05;

/// Deduplicates vertices and reorders indices and vertices for GPU
/// cache, overdraw and fetch efficiency.
///
/// Triangles keep their geometry; only ids and order change. Derived
/// triangles and quads are cleared since they refer to the old ids.
pub fn optimize_mesh(mesh: &mut Mesh) -> Result<(), OptimizeError> {
    mesh.validate()?;
    if mesh.indices.is_empty() || mesh.is_empty() {
        return Ok(());
    }

    let vertices = mesh.to_interleaved();
    let original_count = vertices.len();
    let source_indices = mesh.indices.as_slice();

    let (vertex_count, remap) = meshopt::generate_vertex_remap(&vertices, Some(source_indices));
    let mut indices = meshopt::remap_index_buffer(Some(source_indices), original_count, &remap);
    let remapped: Vec<Vertex> = meshopt::remap_vertex_buffer(&vertices, vertex_count, &remap);

    meshopt::optimize_vertex_cache_in_place(&mut indices, vertex_count);

    let adapter = meshopt::VertexDataAdapter::new(
        bytemuck::cast_slice(&remapped),
        std::mem::size_of::<Vertex>(),
        Vertex::POSITION_OFFSET,
    )
    .map_err(|e| OptimizeError::InvalidVertexLayout {
        mesh: mesh.name.clone(),
        message: format!("{e:?}"),
    })?;
    meshopt::optimize_overdraw_in_place(&mut indices, &adapter, OVERDRAW_THRESHOLD);

    let optimized = meshopt::optimize_vertex_fetch(&mut indices, &remapped);

    debug!(
        "optimized `{}`: {} -> {} vertices",
        mesh.name,
        original_count,
        optimized.len()
    );

    mesh.indices = indices;
    mesh.from_interleaved(&optimized);
    mesh.invalidate_topology();
    Ok(())
}
