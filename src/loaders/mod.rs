pub mod gltf;
pub mod native;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::scene::Scene;

pub use self::gltf::import_gltf;
pub use self::native::{import_native, SourceMesh, SourceNode, SourceScene};

/// Which importer decodes the source file
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// glTF 2.0, `.gltf` or `.glb`
    #[default]
    Gltf,
    /// General-purpose importer for the remaining formats
    Native,
}

impl Backend {
    /// Whether `path` has an extension this backend accepts
    pub fn accepts(self, path: &Path) -> bool {
        match self {
            Backend::Gltf => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("gltf") || ext.eq_ignore_ascii_case("glb")),
            Backend::Native => true,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Gltf => f.write_str("gltf"),
            Backend::Native => f.write_str("native"),
        }
    }
}

impl FromStr for Backend {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gltf" => Ok(Backend::Gltf),
            "native" => Ok(Backend::Native),
            _ => Err(ImportError::InvalidBackendSelector { value: s.to_string() }),
        }
    }
}

/// Imports `path` into `scene` with the backend chosen in `config`.
///
/// Nothing is written to `scene` when the extension does not match the
/// backend or the file is missing. Later failures may leave it partially filled.
pub fn import(path: &Path, config: &ImportConfig, scene: &mut Scene) -> Result<(), ImportError> {
    if !config.backend.accepts(path) {
        return Err(ImportError::ExtensionMismatch {
            path: path.to_path_buf(),
            backend: config.backend,
        });
    }
    if !path.exists() {
        return Err(ImportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    info!("Importing {:?} with the {} backend", path, config.backend);
    match config.backend {
        Backend::Gltf => import_gltf(path, config.bounds_mode, scene)?,
        Backend::Native => import_native(path, &config.post_process, scene)?,
    }

    info!(
        "Imported {:?}: {} meshes, {} nodes, {} roots",
        path,
        scene.mesh_count(),
        scene.node_count(),
        scene.roots().len()
    );
    Ok(())
}
