pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod loaders;
pub mod math;
pub mod mesh;
pub mod optimize;
pub mod scene;
pub mod summary;
pub mod topology;
pub mod types;

pub use config::{BoundsMode, ImportConfig, PostProcess};
pub use error::{ImportError, MeshError, OptimizeError};
pub use loaders::{import, Backend};
pub use mesh::Mesh;
pub use scene::{MeshId, MeshNode, NodeId, Scene};
pub use summary::SceneSummary;
pub use types::{Bounds, Quad, Triangle, Vertex};
