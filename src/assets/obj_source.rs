use std::path::Path;

use cgmath::{Matrix4, SquareMatrix};
use futures::{future::BoxFuture, FutureExt};
use log::{debug, warn};

use super::{Asset, AssetNode, AssetSource, MeshNode, SourceError};
use crate::gfx::{resources::material::Material, scene::Mesh};

/// Wavefront OBJ/MTL source.
///
/// Faces are triangulated and every vertex gets a single index. Missing
/// normals are computed from the faces. A missing or broken MTL file is not
/// an error; the meshes just come without materials.
pub struct ObjSource {
    options: tobj::LoadOptions,
}

impl ObjSource {
    pub fn new() -> Self {
        Self {
            options: tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        }
    }

    fn parse(&self, path: &Path) -> Result<Asset, SourceError> {
        let (models, materials) = tobj::load_obj(path, &self.options)?;

        let materials = materials.unwrap_or_else(|err| {
            warn!("no materials for {}: {}", path.display(), err);
            Vec::new()
        });

        debug!(
            "{}: {} models, {} materials",
            path.display(),
            models.len(),
            materials.len()
        );

        let children = models
            .into_iter()
            .map(|model| {
                let mesh = model.mesh;

                let normals =
                    if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
                        mesh.normals
                    } else {
                        Mesh::calculate_face_normals(&mesh.positions, &mesh.indices)
                    };

                let material = mesh
                    .material_id
                    .and_then(|index| materials.get(index))
                    .map(convert_material);

                AssetNode::Mesh(MeshNode {
                    name: Some(model.name),
                    mesh: Mesh::new(mesh.positions, normals, mesh.indices),
                    transform: Matrix4::identity(),
                    material,
                })
            })
            .collect();

        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_string);

        Ok(Asset {
            root: AssetNode::group(name, children),
            animations: Vec::new(),
        })
    }
}

impl Default for ObjSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetSource for ObjSource {
    fn load<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<Asset, SourceError>> {
        async move { self.parse(path) }.boxed()
    }
}

fn convert_material(source: &tobj::Material) -> Material {
    let [r, g, b] = source.diffuse.unwrap_or([0.8, 0.8, 0.8]);
    let alpha = source.dissolve.unwrap_or(1.0);
    // Phong exponent 0..1000 mapped onto roughness 1..0
    let roughness = 1.0 - (source.shininess.unwrap_or(0.0) / 1000.0).clamp(0.0, 1.0);

    Material::new(&source.name, [r, g, b, alpha], 0.0, roughness)
}
