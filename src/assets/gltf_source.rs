//! glTF 2.0 source
//!
//! Loads `.gltf` and `.glb` files with `gltf::import`, which also resolves
//! external and embedded buffers. Only triangle primitives are kept.

use std::path::Path;

use cgmath::{Matrix4, SquareMatrix};
use futures::{future::BoxFuture, FutureExt};
use log::{debug, info};

use super::{Asset, AssetNode, AssetSource, MeshNode, SourceError};
use crate::{
    animation::AnimationClip,
    gfx::{resources::material::Material, scene::Mesh},
};

/// glTF 2.0 source
pub struct GltfSource {
    /// Whether to read animation clips
    pub load_animations: bool,
}

impl GltfSource {
    pub fn new() -> Self {
        Self {
            load_animations: true,
        }
    }

    /// Set whether to read animation clips
    pub fn with_animations(mut self, load: bool) -> Self {
        self.load_animations = load;
        self
    }

    fn parse(&self, path: &Path) -> Result<Asset, SourceError> {
        let (document, buffers, _images) = gltf::import(path)?;

        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| SourceError::Unsupported(format!("{} has no scene", path.display())))?;

        let children = scene
            .nodes()
            .map(|node| convert_node(&node, &buffers))
            .collect();

        let animations = if self.load_animations {
            document
                .animations()
                .map(|animation| convert_animation(&animation, &buffers))
                .collect()
        } else {
            Vec::new()
        };

        info!(
            "{}: {} meshes, {} animations",
            path.display(),
            document.meshes().count(),
            document.animations().count()
        );

        Ok(Asset {
            root: AssetNode::group(scene.name().map(str::to_string), children),
            animations,
        })
    }
}

impl Default for GltfSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for GltfSource {
    fn load<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<Asset, SourceError>> {
        async move { self.parse(path) }.boxed()
    }
}

/// Converts a node and its subtree.
///
/// A node holding a single primitive and no children becomes a mesh node
/// carrying the node's transform; everything else becomes a group.
fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> AssetNode {
    let transform = Matrix4::from(node.transform().matrix());
    let name = node
        .name()
        .or_else(|| node.mesh().and_then(|mesh| mesh.name()))
        .map(str::to_string);

    let mut children: Vec<AssetNode> = Vec::new();
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(converted) = convert_primitive(&primitive, buffers) {
                children.push(AssetNode::Mesh(MeshNode {
                    name: name.clone(),
                    mesh: converted,
                    transform: Matrix4::identity(),
                    material: convert_material(&primitive.material()),
                }));
            }
        }
    }

    if children.len() == 1 && node.children().next().is_none() {
        if let Some(AssetNode::Mesh(mut mesh)) = children.pop() {
            mesh.transform = transform;
            return AssetNode::Mesh(mesh);
        }
    }

    children.extend(node.children().map(|child| convert_node(&child, buffers)));

    AssetNode::Group {
        name,
        transform,
        children,
    }
}

fn convert_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<Mesh> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        debug!("skipping {:?} primitive", primitive.mode());
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    if positions.is_empty() {
        return None;
    }

    let indices: Vec<u32> = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect())
        .unwrap_or_else(|| (0..positions.len() as u32).collect());

    let flat_positions: Vec<f32> = positions.iter().flatten().copied().collect();

    match reader.read_normals() {
        Some(normals) => {
            let normals: Vec<f32> = normals.flatten().collect();
            Some(Mesh::new(flat_positions, normals, indices))
        }
        None => Some(Mesh::from_positions(flat_positions, indices)),
    }
}

/// The glTF default material (no index) maps to no material at all.
fn convert_material(material: &gltf::Material) -> Option<Material> {
    let index = material.index()?;
    let pbr = material.pbr_metallic_roughness();
    let name = material
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("material_{}", index));

    let [r, g, b] = material.emissive_factor();
    Some(
        Material::new(
            &name,
            pbr.base_color_factor(),
            pbr.metallic_factor(),
            pbr.roughness_factor(),
        )
        .with_emission(r, g, b),
    )
}

/// Clip duration is the latest keyframe time over all channels.
fn convert_animation(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> AnimationClip {
    let duration = animation
        .channels()
        .filter_map(|channel| {
            let reader =
                channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
            reader.read_inputs().map(|inputs| inputs.fold(0.0_f32, f32::max))
        })
        .fold(0.0_f32, f32::max);

    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));

    AnimationClip::new(name, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf};

    /// One triangle under a translated node, one material and a 2.5s
    /// translation clip. Buffer layout: positions (36 bytes), key times
    /// (8 bytes), translations (24 bytes).
    const TRIANGLE_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [ { "name": "Stage", "nodes": [0] } ],
  "nodes": [ { "name": "Tri", "mesh": 0, "translation": [0.0, 2.0, 0.0] } ],
  "meshes": [ { "name": "TriMesh", "primitives": [ { "attributes": { "POSITION": 0 }, "material": 0 } ] } ],
  "materials": [ { "name": "Red", "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0], "metallicFactor": 0.25, "roughnessFactor": 0.75 } } ],
  "animations": [ {
    "name": "Bob",
    "channels": [ { "sampler": 0, "target": { "node": 0, "path": "translation" } } ],
    "samplers": [ { "input": 1, "output": 2, "interpolation": "LINEAR" } ]
  } ],
  "buffers": [ { "uri": "triangle.bin", "byteLength": 68 } ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
    { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [2.5] },
    { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
  ]
}"#;

    fn write_fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sceneview-gltf-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let floats: [f32; 17] = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // positions
            0.0, 2.5, // key times
            0.0, 2.0, 0.0, 0.0, 3.0, 0.0, // translations
        ];
        let bytes: Vec<u8> = floats.iter().flat_map(|f| f.to_le_bytes()).collect();
        fs::write(dir.join("triangle.bin"), bytes).unwrap();
        fs::write(dir.join("triangle.gltf"), TRIANGLE_GLTF).unwrap();
        dir.join("triangle.gltf")
    }

    #[test]
    fn test_import_triangle() {
        let path = write_fixture("triangle");
        let asset = futures::executor::block_on(GltfSource::new().load(&path)).unwrap();

        assert_eq!(asset.animations, vec![AnimationClip::new("Bob", 2.5)]);

        let (meshes, lights) = asset.root.flatten();
        assert!(lights.is_empty());
        assert_eq!(meshes.len(), 1);

        let tri = &meshes[0];
        assert_eq!(tri.name.as_deref(), Some("Tri"));
        assert_eq!(tri.mesh.triangle_count(), 1);
        assert_eq!(tri.transform.w.y, 2.0);

        let material = tri.material.as_ref().unwrap();
        assert_eq!(material.name, "Red");
        assert_eq!(material.base_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(material.metallic, 0.25);
        assert_eq!(material.roughness, 0.75);
    }

    #[test]
    fn test_skip_animations() {
        let path = write_fixture("no-animations");
        let asset =
            futures::executor::block_on(GltfSource::new().with_animations(false).load(&path))
                .unwrap();
        assert!(asset.animations.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("sceneview-gltf-missing.gltf");
        let result = futures::executor::block_on(GltfSource::new().load(&path));
        assert!(matches!(result, Err(SourceError::Gltf(_))));
    }
}
