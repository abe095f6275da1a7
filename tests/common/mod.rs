// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Fresh, empty directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scene-import-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

pub fn write_obj(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    fs::write(&path, contents).expect("write obj fixture");
    path
}

/// One glTF primitive; absent attributes are omitted from the file
#[derive(Clone, Debug, Default)]
pub struct Primitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Option<Vec<u32>>,
}

impl Primitive {
    pub fn triangle(offset: [f32; 3]) -> Self {
        let [x, y, z] = offset;
        Self {
            positions: vec![[x, y, z], [x + 1.0, y, z], [x, y + 1.0, z]],
            normals: Some(vec![[0.0, 0.0, 1.0]; 3]),
            uvs: Some(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]),
            indices: Some(vec![0, 1, 2]),
        }
    }
}

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Builds a `.gltf` document with a single external `.bin` buffer
#[derive(Default)]
pub struct GltfBuilder {
    buffer: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_view(&mut self, bytes: &[u8], target: u32) -> usize {
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": bytes.len(),
            "target": target,
        }));
        self.views.len() - 1
    }

    fn push_accessor(&mut self, mut accessor: Value, bytes: &[u8], target: u32) -> usize {
        accessor["bufferView"] = json!(self.push_view(bytes, target));
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn positions_accessor(&mut self, positions: &[[f32; 3]]) -> usize {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        let accessor = json!({
            "componentType": FLOAT,
            "count": positions.len(),
            "type": "VEC3",
            "min": min,
            "max": max,
        });
        self.push_accessor(accessor, bytemuck::cast_slice(positions), ARRAY_BUFFER)
    }

    /// Adds a mesh and returns its index
    pub fn mesh(&mut self, name: Option<&str>, primitives: &[Primitive]) -> usize {
        let mut encoded = Vec::new();
        for primitive in primitives {
            let mut attributes = json!({ "POSITION": self.positions_accessor(&primitive.positions) });
            if let Some(normals) = &primitive.normals {
                let accessor = json!({ "componentType": FLOAT, "count": normals.len(), "type": "VEC3" });
                attributes["NORMAL"] = json!(self.push_accessor(accessor, bytemuck::cast_slice(normals), ARRAY_BUFFER));
            }
            if let Some(uvs) = &primitive.uvs {
                let accessor = json!({ "componentType": FLOAT, "count": uvs.len(), "type": "VEC2" });
                attributes["TEXCOORD_0"] = json!(self.push_accessor(accessor, bytemuck::cast_slice(uvs), ARRAY_BUFFER));
            }

            let mut entry = json!({ "attributes": attributes });
            if let Some(indices) = &primitive.indices {
                let accessor = json!({ "componentType": UNSIGNED_INT, "count": indices.len(), "type": "SCALAR" });
                entry["indices"] = json!(self.push_accessor(
                    accessor,
                    bytemuck::cast_slice(indices),
                    ELEMENT_ARRAY_BUFFER
                ));
            }
            encoded.push(entry);
        }

        let mut mesh = json!({ "primitives": encoded });
        if let Some(name) = name {
            mesh["name"] = json!(name);
        }
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Adds a raw node object and returns its index
    pub fn node(&mut self, node: Value) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Writes `<stem>.gltf` and `<stem>.bin` into `dir`, returning the `.gltf` path
    pub fn write(&self, dir: &Path, stem: &str) -> PathBuf {
        let bin_name = format!("{stem}.bin");
        fs::write(dir.join(&bin_name), &self.buffer).expect("write gltf buffer");

        let mut document = json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "uri": bin_name, "byteLength": self.buffer.len() }],
            "bufferViews": self.views,
            "accessors": self.accessors,
            "meshes": self.meshes,
            "nodes": self.nodes,
        });
        if self.views.is_empty() {
            document["buffers"] = json!([]);
        }

        let path = dir.join(format!("{stem}.gltf"));
        fs::write(&path, serde_json::to_string_pretty(&document).expect("encode gltf"))
            .expect("write gltf document");
        path
    }
}
