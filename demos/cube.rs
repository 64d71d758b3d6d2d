//! # Cube Example
//!
//! Loads `assets/3d/cube/cube.glb` when it exists, otherwise adds a
//! procedural cube, then moves the pointer on and off it.
//!
//! The cube is marked selectable, so the pointer pass has something to
//! highlight. Drop the `set_selectable` calls for a cube that only casts a
//! shadow.
//!
//! ## Usage:
//! ```bash
//! cargo run --example cube
//! ```

use std::path::Path;

use env_logger::Env;
use log::info;
use sceneview::{
    gfx::{
        geometry::generate_cube,
        picking::PointerEvent,
        scene::{EntityMeta, Object},
    },
    Viewer, ViewerConfig,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut viewer = Viewer::new(ViewerConfig {
        rotation_speed: 0.0,
        ..ViewerConfig::default()
    });

    let cube_path = Path::new("assets/3d/cube/cube.glb");
    if cube_path.exists() {
        let loaded = pollster::block_on(viewer.load_file(cube_path, None, |setup| {
            setup.object.cast_shadow = true;
            setup.entity.set_selectable(true);
        }))?;
        info!("cube.glb gave {} entities", loaded.entities.len());
    } else {
        let mut cube = Object::from_geometry("cube", &generate_cube());
        cube.set_scale(4.0);
        viewer.add_mesh(cube, EntityMeta::named("Cube"), |setup| {
            setup.object.cast_shadow = true;
            setup.entity.set_selectable(true);
        });
    }

    viewer.on_pointer_move(|event, selection| {
        info!(
            "pointer at ({}, {}), highlighted: {:?}",
            event.client_x,
            event.client_y,
            selection.selected()
        );
    });

    let center = PointerEvent::new(
        viewer.config().surface_width as f32 / 2.0,
        viewer.config().surface_height as f32 / 2.0,
    );
    for event in [center, PointerEvent::new(0.0, 0.0), center] {
        viewer.pointer_moved(event);
        let outcome = viewer.advance(1.0 / 60.0);
        info!("{:?}", outcome);
    }

    Ok(())
}
