// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::loaders::Backend;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-import")]
#[command(about = "Import a 3D scene and print its meshes and node hierarchy", long_about = None)]
pub struct Cli {
    /// Scene file to import
    pub path: PathBuf,

    /// Importer backend: `gltf` or `native`
    #[arg(long)]
    pub backend: Option<String>,

    /// JSON import configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rebuild quads for every mesh
    #[arg(long, default_value = "false")]
    pub quads: bool,

    /// Run the mesh optimizer on every mesh
    #[arg(long, default_value = "false")]
    pub optimize: bool,

    /// Print the summary as JSON
    #[arg(long, default_value = "false")]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, default_value = "false")]
    pub quiet: bool,
}

impl Cli {
    /// Folds the command-line flags over `config`. Flags only ever switch
    /// steps on; `--backend` replaces the configured backend.
    pub fn apply(&self, config: &mut ImportConfig) -> Result<(), ImportError> {
        if let Some(backend) = &self.backend {
            config.backend = backend.parse::<Backend>()?;
        }
        config.reconstruct_quads |= self.quads;
        config.optimize |= self.optimize;
        Ok(())
    }
}
