//! # Data Center Example
//!
//! Loads the data center scene (floor, windmill, building and the glTF
//! props), sweeps a pointer across the view for a few frames and prints the
//! composed scene as JSON.
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=debug cargo run --example data_center -- assets/3d/data_center [config.json]
//! ```
//!
//! Missing asset files are logged and skipped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use env_logger::Env;
use log::{info, warn};
use sceneview::{
    assets::MeshSetup,
    gfx::{
        picking::{PickOutcome, PointerEvent},
        resources::material::Material,
        scene::EntityMeta,
    },
    Viewer, ViewerConfig,
};

fn lambert(setup: &mut MeshSetup<'_>, name: &str, color: u32) {
    let id = setup.materials.add_material(Material::from_hex(name, color));
    setup.object.set_material(id);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let asset_dir = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "assets/3d/data_center".to_string()),
    );
    let config = match args.next() {
        Some(path) => ViewerConfig::from_path(Path::new(&path))
            .with_context(|| format!("loading viewer config {}", path))?,
        None => ViewerConfig::default(),
    };

    let mut viewer = Viewer::new(config);

    let loads = [
        viewer.load_blocking(
            &sceneview::assets::ObjSource::new(),
            asset_dir.join("floor.obj"),
            None,
            |setup| {
                setup.object.cast_shadow = true;
                setup.object.receive_shadow = true;
                lambert(setup, "floor", 0xeaeaea);
            },
        ),
        viewer.load_blocking(
            &sceneview::assets::ObjSource::new(),
            asset_dir.join("windmill.obj"),
            Some(EntityMeta::named("Windmill")),
            |setup| {
                setup.object.cast_shadow = true;
                lambert(setup, "windmill", 0xfcba2a);
                setup.entity.set_selectable(true);
            },
        ),
        viewer.load_blocking(
            &sceneview::assets::ObjSource::new(),
            asset_dir.join("data_center.obj"),
            Some(EntityMeta::named("Data Center")),
            |setup| {
                setup.object.cast_shadow = true;
                lambert(setup, "data_center", 0xfcba2a);
                setup.entity.set_selectable(true);
            },
        ),
        pollster::block_on(viewer.load_file(asset_dir.join("scene.glb"), None, |setup| {
            setup.object.cast_shadow = true;
        })),
    ];

    for result in loads {
        if let Err(err) = result {
            warn!("{:#}", anyhow::Error::new(err));
        }
    }

    let stats = viewer.scene().get_statistics();
    info!(
        "scene: {} objects, {} triangles, {} entities",
        stats.object_count,
        stats.total_triangles,
        viewer.registry().len()
    );

    // Sweep the pointer left to right through the middle of the view
    let (width, height) = (
        viewer.config().surface_width as f32,
        viewer.config().surface_height as f32,
    );
    for frame in 0..=60 {
        let x = width * frame as f32 / 60.0;
        viewer.pointer_moved(PointerEvent::new(x, height * 0.5));

        match viewer.advance(1.0 / 60.0) {
            PickOutcome::Selected(id) => {
                let name = viewer
                    .registry()
                    .lookup(id)
                    .and_then(|entity| entity.name())
                    .unwrap_or("unnamed");
                info!("frame {}: hovering {} ({})", frame, name, id);
            }
            PickOutcome::Cleared => info!("frame {}: nothing under the pointer", frame),
            PickOutcome::Unchanged => {}
        }
    }

    viewer
        .export_json(std::io::stdout().lock())
        .context("writing scene JSON")?;
    println!();

    Ok(())
}
