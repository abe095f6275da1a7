use std::path::PathBuf;

use thiserror::Error;

use crate::loaders::Backend;

/// Reasons an import can fail.
///
/// On failure the target scene may hold a partial import; callers decide
/// whether to `clear()` it and retry with another backend.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("{} does not exist", path.display())]
    FileNotFound { path: PathBuf },

    #[error("{} cannot be read by the {backend} backend", path.display())]
    ExtensionMismatch { path: PathBuf, backend: Backend },

    #[error("failed to parse scene: {message}")]
    ParseFailure { message: String },

    #[error("scene is incomplete: {message}")]
    IncompleteScene { message: String },

    #[error("unknown importer backend `{value}` (expected `gltf` or `native`)")]
    InvalidBackendSelector { value: String },
}

impl ImportError {
    pub(crate) fn parse(message: impl std::fmt::Display) -> Self {
        ImportError::ParseFailure {
            message: message.to_string(),
        }
    }
}

/// Broken structural invariant of a `Mesh`
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("mesh `{mesh}`: {positions} positions, {normals} normals and {uvs} uvs")]
    MismatchedAttributes {
        mesh: String,
        positions: usize,
        normals: usize,
        uvs: usize,
    },

    #[error("mesh `{mesh}`: index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
}

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("mesh `{mesh}`: optimizer rejected the vertex layout: {message}")]
    InvalidVertexLayout { mesh: String, message: String },
}
