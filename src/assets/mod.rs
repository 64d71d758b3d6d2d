//! # Asset Loading
//!
//! Asset sources turn a file into an [`Asset`]: a tree of [`AssetNode`]s
//! plus the animation clips that came with it. Parsing is delegated to
//! `tobj` ([`ObjSource`]) and `gltf` ([`GltfSource`]).
//!
//! Sources only parse. Turning the parsed meshes into scene objects and
//! registry entities is done by the [`loader`] when the viewer installs the
//! asset.
//!
//! ```no_run
//! use sceneview::assets::{AssetSource, ObjSource};
//! use std::path::Path;
//!
//! let asset = futures::executor::block_on(ObjSource::new().load(Path::new("crate.obj")))?;
//! println!("{} meshes", asset.mesh_count());
//! # Ok::<(), sceneview::assets::SourceError>(())
//! ```

pub mod gltf_source;
pub mod loader;
pub mod obj_source;

pub use gltf_source::GltfSource;
pub use loader::{LoadedAsset, MeshSetup};
pub use obj_source::ObjSource;

use std::path::{Path, PathBuf};

use cgmath::{Matrix4, SquareMatrix};
use futures::future::BoxFuture;
use thiserror::Error;

use crate::{
    animation::AnimationClip,
    gfx::{resources::material::Material, scene::light::Light, scene::Mesh},
};

/// Failure inside an asset source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("unsupported asset: {0}")]
    Unsupported(String),
}

/// A load that failed, with the path it was asked for
#[derive(Debug, Error)]
#[error("failed to load {}: {cause}", path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub cause: SourceError,
}

/// A parsed mesh with its local transform and optional material
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: Option<String>,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    pub material: Option<Material>,
}

#[derive(Debug, Clone)]
pub enum AssetNode {
    Mesh(MeshNode),
    Group {
        name: Option<String>,
        transform: Matrix4<f32>,
        children: Vec<AssetNode>,
    },
    Light(Light),
}

impl AssetNode {
    pub fn group(name: Option<String>, children: Vec<AssetNode>) -> Self {
        AssetNode::Group {
            name,
            transform: Matrix4::identity(),
            children,
        }
    }

    /// Flattens the tree depth-first. Group transforms are multiplied into
    /// the meshes below them.
    pub fn flatten(self) -> (Vec<MeshNode>, Vec<Light>) {
        let mut meshes = Vec::new();
        let mut lights = Vec::new();
        self.flatten_into(Matrix4::identity(), &mut meshes, &mut lights);
        (meshes, lights)
    }

    fn flatten_into(
        self,
        parent: Matrix4<f32>,
        meshes: &mut Vec<MeshNode>,
        lights: &mut Vec<Light>,
    ) {
        match self {
            AssetNode::Mesh(mut node) => {
                node.transform = parent * node.transform;
                meshes.push(node);
            }
            AssetNode::Group {
                transform,
                children,
                ..
            } => {
                let world = parent * transform;
                for child in children {
                    child.flatten_into(world, meshes, lights);
                }
            }
            AssetNode::Light(light) => lights.push(light),
        }
    }

    fn mesh_count(&self) -> usize {
        match self {
            AssetNode::Mesh(_) => 1,
            AssetNode::Group { children, .. } => children.iter().map(AssetNode::mesh_count).sum(),
            AssetNode::Light(_) => 0,
        }
    }
}

/// A parsed file
#[derive(Debug, Clone)]
pub struct Asset {
    pub root: AssetNode,
    pub animations: Vec<AnimationClip>,
}

impl Asset {
    pub fn mesh_count(&self) -> usize {
        self.root.mesh_count()
    }
}

/// Asynchronous parser for one asset format
pub trait AssetSource {
    fn load<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, Result<Asset, SourceError>>;
}

/// Picks a source by file extension (`obj`, `gltf`, `glb`)
pub fn source_for_path(path: &Path) -> Result<Box<dyn AssetSource>, SourceError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("obj") => Ok(Box::new(ObjSource::new())),
        Some("gltf") | Some("glb") => Ok(Box::new(GltfSource::new())),
        _ => Err(SourceError::Unsupported(format!(
            "no asset source for {}",
            path.display()
        ))),
    }
}
